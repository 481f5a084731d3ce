//! Conjunctive comparator sets and disjunctive ranges

use std::fmt;

use super::Comparator;
use crate::parser::{RangeError, RangeParser};
use crate::version::Version;
use crate::RangeOptions;

/// Comparators that must all hold (e.g. `>=1.2.0 <2.0.0-0`).
///
/// An empty set matches any release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparatorSet {
    comparators: Vec<Comparator>,
}

impl ComparatorSet {
    pub fn new(comparators: Vec<Comparator>) -> Self {
        Self { comparators }
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    /// Whether this set matches anything at all
    pub fn is_any(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Test a version against every comparator, applying npm's prerelease rule
    pub fn test(&self, version: &Version, include_prerelease: bool) -> bool {
        if !self.comparators.iter().all(|c| c.matches(version)) {
            return false;
        }

        if version.is_prerelease() && !include_prerelease {
            return self
                .comparators
                .iter()
                .any(|c| c.allows_prerelease_of(version));
        }

        true
    }
}

impl fmt::Display for ComparatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comparators.is_empty() {
            return f.write_str("*");
        }

        let parts: Vec<String> = self.comparators.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(" "))
    }
}

/// A parsed version range: comparator sets joined by `||`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    sets: Vec<ComparatorSet>,
    include_prerelease: bool,
}

impl Range {
    /// Parse a range under the given options
    pub fn parse(input: &str, options: RangeOptions) -> Result<Self, RangeError> {
        RangeParser::new(options).parse(input)
    }

    pub(crate) fn from_sets(sets: Vec<ComparatorSet>, include_prerelease: bool) -> Self {
        Self {
            sets,
            include_prerelease,
        }
    }

    pub fn sets(&self) -> &[ComparatorSet] {
        &self.sets
    }

    /// Check whether a version satisfies any of the comparator sets
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets
            .iter()
            .any(|set| set.test(version, self.include_prerelease))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.sets.iter().map(|s| s.to_string()).collect();
        f.write_str(&parts.join(" || "))
    }
}
