//! Version parsing and precedence

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version \"{version}\": {reason}")]
    Invalid { version: String, reason: String },
}

/// A semantic version as the npm registry understands it.
///
/// A leading `v` or `=` is accepted on input. Build metadata is kept for
/// display but never takes part in comparisons.
#[derive(Debug, Clone)]
pub struct Version {
    inner: semver::Version,
}

impl Version {
    /// Create a release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// Create a version carrying a prerelease tag (e.g. `0` or `beta.2`)
    pub fn with_prerelease(
        major: u64,
        minor: u64,
        patch: u64,
        pre: &str,
    ) -> Result<Self, VersionError> {
        let pre = Prerelease::new(pre).map_err(|e| VersionError::Invalid {
            version: format!("{major}.{minor}.{patch}-{pre}"),
            reason: e.to_string(),
        })?;

        Ok(Self {
            inner: semver::Version {
                major,
                minor,
                patch,
                pre,
                build: BuildMetadata::EMPTY,
            },
        })
    }

    /// Parse a version string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let stripped = input.trim().trim_start_matches(['=', 'v']);

        semver::Version::parse(stripped)
            .map(|inner| Self { inner })
            .map_err(|e| VersionError::Invalid {
                version: input.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Get the prerelease tag, empty for releases
    pub fn prerelease(&self) -> &str {
        self.inner.pre.as_str()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.inner.pre.is_empty()
    }

    /// Whether both versions share the same `major.minor.patch` tuple
    pub fn same_release(&self, other: &Version) -> bool {
        self.inner.major == other.inner.major
            && self.inner.minor == other.inner.minor
            && self.inner.patch == other.inner.patch
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner
            .major
            .cmp(&other.inner.major)
            .then(self.inner.minor.cmp(&other.inner.minor))
            .then(self.inner.patch.cmp(&other.inner.patch))
            .then_with(|| self.inner.pre.cmp(&other.inner.pre))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Order two version strings highest first.
///
/// Strings that are not valid versions sort after every valid version and
/// fall back to byte order among themselves, so the ordering stays total.
pub fn compare_descending(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(va), Ok(vb)) => vb.cmp(&va),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
