//! npm-compatible semantic versioning.
//!
//! Provides the three capabilities lockfile tooling needs from a version
//! library: checking that a range is well formed, testing a version against
//! a range, and ordering versions.
//!
//! ```
//! use yarnx_semver::{satisfies, valid_range, RangeOptions};
//!
//! let options = RangeOptions::default();
//! assert!(valid_range("^1.2.0 || 2.x", options));
//! assert!(satisfies("1.4.2", "^1.2.0", options));
//! assert!(!satisfies("2.0.0-rc.1", "^1.2.0 || 2.x", options));
//! ```

pub mod constraint;
mod parser;
mod version;

pub use constraint::{Comparator, ComparatorSet, Operator, Range};
pub use parser::{RangeError, RangeParser};
pub use version::{compare_descending, Version, VersionError};

/// Options that change how ranges are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Let prerelease versions satisfy ranges that do not name them
    pub include_prerelease: bool,
}

impl RangeOptions {
    pub fn include_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }
}

/// Check whether a range string parses
pub fn valid_range(range: &str, options: RangeOptions) -> bool {
    Range::parse(range, options).is_ok()
}

/// Check whether a version satisfies a range.
///
/// Returns false when either side fails to parse.
pub fn satisfies(version: &str, range: &str, options: RangeOptions) -> bool {
    let Ok(version) = Version::parse(version) else {
        return false;
    };
    Range::parse(range, options)
        .map(|range| range.satisfies(&version))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: RangeOptions = RangeOptions {
        include_prerelease: false,
    };
    const WITH_PRERELEASE: RangeOptions = RangeOptions {
        include_prerelease: true,
    };

    #[test]
    fn test_valid_range() {
        assert!(valid_range("^1.1.0", DEFAULT));
        assert!(valid_range(">=1.0.0", DEFAULT));
        assert!(valid_range("^1.0.2 || 2 || 3 || 4", DEFAULT));
        assert!(valid_range("*", DEFAULT));
        assert!(!valid_range("next", DEFAULT));
        assert!(!valid_range("string-width@^4.2.0", DEFAULT));
    }

    #[test]
    fn test_satisfies_caret() {
        assert!(satisfies("1.2.0", "^1.1.0", DEFAULT));
        assert!(satisfies("1.3.0", "^1.1.0", DEFAULT));
        assert!(!satisfies("1.2.0", "^1.3.0", DEFAULT));
        assert!(!satisfies("2.0.0", "^1.1.0", DEFAULT));
    }

    #[test]
    fn test_satisfies_open_ranges() {
        assert!(satisfies("3.0.0", ">=1.0.0", DEFAULT));
        assert!(satisfies("2.1.0", ">=1.1.0", DEFAULT));
        assert!(!satisfies("3.0.0", "^2.0.0", DEFAULT));
    }

    #[test]
    fn test_prerelease_gating() {
        assert!(!satisfies("4.1.0-beta", "^4.0.3", DEFAULT));
        assert!(satisfies("4.1.0-beta", "^4.0.3", WITH_PRERELEASE));
        assert!(satisfies("4.1.0-beta", "^4.1.0-beta", DEFAULT));
        assert!(!satisfies("4.0.3", "^4.1.0-beta", WITH_PRERELEASE));
        assert!(!satisfies("1.0.0-rc.1", "*", DEFAULT));
        assert!(satisfies("1.0.0-rc.1", "*", WITH_PRERELEASE));
    }

    #[test]
    fn test_caret_lower_bound_excludes_own_prereleases() {
        assert!(!satisfies("1.2.3-beta", "^1.2.3", WITH_PRERELEASE));
        assert!(satisfies("1.3.0-beta", "^1.2.3", WITH_PRERELEASE));
        assert!(satisfies("0.2.3-beta", "^0.2.3", WITH_PRERELEASE));
    }

    #[test]
    fn test_satisfies_invalid_inputs() {
        assert!(!satisfies("not-a-version", "*", DEFAULT));
        assert!(!satisfies("1.0.0", "next", DEFAULT));
    }

    #[test]
    fn test_compare_descending_sorts_highest_first() {
        let mut versions = vec!["1.2.0", "1.10.0", "1.3.0-beta", "1.3.0"];
        versions.sort_by(|a, b| compare_descending(a, b));
        assert_eq!(versions, vec!["1.10.0", "1.3.0", "1.3.0-beta", "1.2.0"]);
    }
}
