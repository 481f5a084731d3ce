//! Single comparator implementation

use std::cmp::Ordering;
use std::fmt;

use super::Operator;
use crate::version::Version;

/// A single comparator (e.g., ">=1.0.0")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    operator: Operator,
    version: Version,
}

impl Comparator {
    /// Create a new comparator
    pub fn new(operator: Operator, version: Version) -> Self {
        Comparator { operator, version }
    }

    /// Get the version
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Get the operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Test a version against this comparator, ignoring prerelease gating
    pub fn matches(&self, version: &Version) -> bool {
        let cmp = version.cmp(&self.version);

        match self.operator {
            Operator::Equal => cmp == Ordering::Equal,
            Operator::LessThan => cmp == Ordering::Less,
            Operator::LessThanOrEqual => cmp != Ordering::Greater,
            Operator::GreaterThan => cmp == Ordering::Greater,
            Operator::GreaterThanOrEqual => cmp != Ordering::Less,
        }
    }

    /// Whether this comparator opts prereleases of `version`'s release in.
    ///
    /// npm only lets a prerelease through when some comparator names a
    /// prerelease on the same `major.minor.patch` tuple.
    pub fn allows_prerelease_of(&self, version: &Version) -> bool {
        self.version.is_prerelease() && self.version.same_release(version)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

#[cfg(test)]
impl Comparator {
    /// Build a comparator from its written operator and version
    pub(crate) fn from_parts(operator: &str, version: &str) -> Self {
        Self::new(operator.parse().unwrap(), Version::parse(version).unwrap())
    }
}
