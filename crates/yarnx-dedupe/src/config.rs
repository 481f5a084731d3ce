//! Deduplication options.
//!
//! Options can be built in code with the setter methods or deserialized from
//! JSON using the camelCase names (`includeScopes`, `strategy`, ...). Every
//! field is optional.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use yarnx_semver::RangeOptions;

use crate::descriptor::Ident;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown strategy \"{name}\", expected one of: {expected}")]
    UnknownStrategy { name: String, expected: String },
}

/// Which compatible version a requester should prefer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Legacy name of `MostCommon`
    Fewer,
    /// The version satisfying the most requesters
    MostCommon,
    /// `MostCommon`, then steer every requester towards a shared set
    #[default]
    FewerHighest,
    /// The highest compatible version
    Highest,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Fewer,
        Strategy::MostCommon,
        Strategy::FewerHighest,
        Strategy::Highest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fewer => "fewer",
            Strategy::MostCommon => "mostCommon",
            Strategy::FewerHighest => "fewerHighest",
            Strategy::Highest => "highest",
        }
    }

    /// Whether candidates are ranked by how many requesters they satisfy
    pub fn ranks_by_popularity(&self) -> bool {
        !matches!(self, Strategy::Highest)
    }

    /// Whether the cross-requester convergence pass runs
    pub fn converges(&self) -> bool {
        matches!(self, Strategy::FewerHighest)
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownStrategy {
                name: s.to_string(),
                expected: Strategy::ALL.map(|s| s.as_str()).join(", "),
            })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for extraction and resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DedupeOptions {
    /// Only these scopes participate (e.g. `@babel`)
    pub include_scopes: Vec<String>,
    /// Only these packages participate
    pub include_packages: Vec<String>,
    /// These packages never participate
    pub exclude_packages: Vec<String>,
    /// These scopes never participate
    pub exclude_scopes: Vec<String>,
    pub strategy: Strategy,
    /// Let prerelease versions satisfy ranges that do not name them
    pub include_prerelease: bool,
}

impl DedupeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn include_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Options forwarded to range satisfaction
    pub fn range_options(&self) -> RangeOptions {
        RangeOptions::default().include_prerelease(self.include_prerelease)
    }

    /// Whether the scope and name filters keep this package out of resolution.
    ///
    /// Scope filters are checked before name filters; a non-empty include
    /// list admits only what it names.
    pub fn is_filtered_out(&self, ident: &Ident) -> bool {
        if !self.include_scopes.is_empty()
            && !self.include_scopes.iter().any(|scope| ident.in_scope(scope))
        {
            return true;
        }

        if self.exclude_scopes.iter().any(|scope| ident.in_scope(scope)) {
            return true;
        }

        let name = ident.to_string();

        if !self.include_packages.is_empty() && !self.include_packages.contains(&name) {
            return true;
        }

        self.exclude_packages.contains(&name)
    }
}
