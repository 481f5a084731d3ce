//! Package idents, descriptors and range specifiers.
//!
//! A descriptor is what a requester writes (`@scope/name@npm:^1.2.0`): an
//! ident plus a range. The range itself is split into a protocol and a
//! selector, with optional source and parameters
//! (`protocol:source#selector::params`).

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref DESCRIPTOR: Regex = Regex::new(r"^(?:@([^/]+?)/)?([^@/]+?)@(.+)$").unwrap();
    static ref RANGE: Regex =
        Regex::new(r"^(?:([^#:]*):)?(?:([^#]*)#)?(.*?)(?:::(.*))?$").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Invalid descriptor \"{0}\"")]
    Invalid(String),
}

/// Package identity: optional scope plus name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    /// Scope without the leading `@`
    pub scope: Option<String>,
    pub name: String,
}

impl Ident {
    pub fn new(scope: Option<&str>, name: &str) -> Self {
        Self {
            scope: scope.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Whether this ident lives in the given scope (written `@scope`)
    pub fn in_scope(&self, scope: &str) -> bool {
        match &self.scope {
            Some(own) => scope.strip_prefix('@') == Some(own.as_str()),
            None => false,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "@{}/{}", scope, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// An ident paired with the range a requester asked for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub ident: Ident,
    pub range: String,
}

impl Descriptor {
    pub fn new(ident: Ident, range: impl Into<String>) -> Self {
        Self {
            ident,
            range: range.into(),
        }
    }

    /// Parse a descriptor string; the range part is required
    pub fn parse(input: &str) -> Result<Self, DescriptorError> {
        Self::try_parse(input).ok_or_else(|| DescriptorError::Invalid(input.to_string()))
    }

    /// Parse a descriptor string, returning `None` when it is not one
    pub fn try_parse(input: &str) -> Option<Self> {
        let caps = DESCRIPTOR.captures(input)?;
        let scope = caps.get(1).map(|m| m.as_str());
        let name = caps.get(2)?.as_str();
        let range = caps.get(3)?.as_str();

        Some(Self::new(Ident::new(scope, name), range))
    }

    pub fn range_spec(&self) -> RangeSpec {
        RangeSpec::parse(&self.range)
    }
}

impl FromStr for Descriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ident, self.range)
    }
}

/// A range broken into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    /// Protocol without the trailing colon (`npm`, `workspace`, `patch`, ...)
    pub protocol: Option<String>,
    pub source: Option<String>,
    pub selector: String,
    pub params: Option<String>,
}

impl RangeSpec {
    pub fn parse(range: &str) -> Self {
        let Some(caps) = RANGE.captures(range) else {
            return Self {
                protocol: None,
                source: None,
                selector: range.to_string(),
                params: None,
            };
        };

        let part = |index: usize| caps.get(index).map(|m| m.as_str().to_string());

        Self {
            protocol: part(1),
            source: part(2),
            selector: part(3).unwrap_or_default(),
            params: part(4),
        }
    }

    pub fn is_protocol(&self, protocol: &str) -> bool {
        self.protocol.as_deref() == Some(protocol)
    }
}
