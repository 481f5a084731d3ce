//! Range parser
//!
//! Turns npm range syntax into [`Range`] values. Caret, tilde, x-range and
//! hyphen forms are desugared into plain comparators the same way the npm
//! client does, so `^1.2.3` becomes `>=1.2.3 <2.0.0-0`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::constraint::{Comparator, ComparatorSet, Operator, Range};
use crate::version::{Version, VersionError};
use crate::RangeOptions;

lazy_static! {
    static ref OR_SEPARATOR: Regex = Regex::new(r"\s*\|\|\s*").unwrap();
    static ref HYPHEN_RANGE: Regex = Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap();
    static ref OPERATOR_GAP: Regex = Regex::new(r"(<=|>=|~>|<|>|=|~|\^)\s+").unwrap();
    static ref PARTIAL: Regex = Regex::new(
        r"^(?P<op><=|>=|~>|<|>|=|~|\^)?v?(?P<major>0|[1-9][0-9]*|[xX*])(?:\.(?P<minor>0|[1-9][0-9]*|[xX*])(?:\.(?P<patch>0|[1-9][0-9]*|[xX*])(?:-(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?)?)?$"
    )
    .unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid comparator \"{comparator}\"")]
    InvalidComparator { comparator: String },

    #[error("Invalid hyphen range bound \"{bound}\"")]
    InvalidHyphenBound { bound: String },

    #[error("Version component overflow in \"{comparator}\"")]
    Overflow { comparator: String },

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// A possibly incomplete version; `None` components are wildcards.
#[derive(Debug, Clone, Default)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Option<String>,
}

impl Partial {
    fn from_captures(caps: &Captures<'_>, token: &str) -> Result<Self, RangeError> {
        let component = |name: &str| -> Result<Option<u64>, RangeError> {
            match caps.name(name).map(|m| m.as_str()) {
                None | Some("x") | Some("X") | Some("*") => Ok(None),
                Some(digits) => digits.parse().map(Some).map_err(|_| RangeError::Overflow {
                    comparator: token.to_string(),
                }),
            }
        };

        let mut partial = Partial {
            major: component("major")?,
            minor: component("minor")?,
            patch: component("patch")?,
            pre: caps.name("pre").map(|m| m.as_str().to_string()),
        };

        // Anything after a wildcard is a wildcard too
        if partial.major.is_none() {
            partial.minor = None;
        }
        if partial.minor.is_none() {
            partial.patch = None;
        }
        if partial.patch.is_none() {
            partial.pre = None;
        }

        Ok(partial)
    }

    fn has_wildcard(&self) -> bool {
        self.patch.is_none()
    }
}

/// Parser for npm version ranges
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeParser {
    options: RangeOptions,
}

impl RangeParser {
    /// Create a new parser
    pub fn new(options: RangeOptions) -> Self {
        Self { options }
    }

    /// Parse a full range string (`||`-separated comparator sets)
    pub fn parse(&self, input: &str) -> Result<Range, RangeError> {
        let sets = OR_SEPARATOR
            .split(input.trim())
            .map(|part| self.parse_set(part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Range::from_sets(sets, self.options.include_prerelease))
    }

    fn parse_set(&self, input: &str) -> Result<ComparatorSet, RangeError> {
        let input = input.trim();

        if let Some(caps) = HYPHEN_RANGE.captures(input) {
            return self.parse_hyphen(&caps[1], &caps[2]);
        }

        let collapsed = OPERATOR_GAP.replace_all(input, "$1");
        let mut comparators = Vec::new();
        for token in collapsed.split_whitespace() {
            comparators.extend(self.parse_comparator(token)?);
        }

        Ok(ComparatorSet::new(comparators))
    }

    fn parse_comparator(&self, token: &str) -> Result<Vec<Comparator>, RangeError> {
        let caps = PARTIAL
            .captures(token)
            .ok_or_else(|| RangeError::InvalidComparator {
                comparator: token.to_string(),
            })?;
        let partial = Partial::from_captures(&caps, token)?;
        let op = caps.name("op").map(|m| m.as_str()).unwrap_or("");

        match op {
            "~" | "~>" => self.desugar_tilde(&partial, token),
            "^" => self.desugar_caret(&partial, token),
            _ if partial.has_wildcard() => self.desugar_x_range(op, &partial, token),
            _ => {
                let operator = op.parse::<Operator>().map_err(|_| RangeError::InvalidComparator {
                    comparator: token.to_string(),
                })?;
                Ok(vec![Comparator::new(operator, exact(&partial)?)])
            }
        }
    }

    fn lower_pre(&self) -> Option<&'static str> {
        self.options.include_prerelease.then_some("0")
    }

    // ~1.2.3 := >=1.2.3 <1.3.0-0, ~1 := >=1.0.0 <2.0.0-0
    fn desugar_tilde(&self, p: &Partial, token: &str) -> Result<Vec<Comparator>, RangeError> {
        let Some(major) = p.major else {
            return Ok(Vec::new());
        };
        let Some(minor) = p.minor else {
            return Ok(vec![
                gte(major, 0, 0, None)?,
                lt(bump(major, token)?, 0, 0, Some("0"))?,
            ]);
        };
        let upper = lt(major, bump(minor, token)?, 0, Some("0"))?;
        let Some(patch) = p.patch else {
            return Ok(vec![gte(major, minor, 0, None)?, upper]);
        };

        Ok(vec![gte(major, minor, patch, p.pre.as_deref())?, upper])
    }

    // ^1.2.3 := >=1.2.3 <2.0.0-0, ^0.2.3 := >=0.2.3 <0.3.0-0, ^0.0.3 := >=0.0.3 <0.0.4-0
    fn desugar_caret(&self, p: &Partial, token: &str) -> Result<Vec<Comparator>, RangeError> {
        let z = self.lower_pre();

        let Some(major) = p.major else {
            return Ok(Vec::new());
        };
        let Some(minor) = p.minor else {
            return Ok(vec![
                gte(major, 0, 0, z)?,
                lt(bump(major, token)?, 0, 0, Some("0"))?,
            ]);
        };
        let Some(patch) = p.patch else {
            let upper = if major == 0 {
                lt(major, bump(minor, token)?, 0, Some("0"))?
            } else {
                lt(bump(major, token)?, 0, 0, Some("0"))?
            };
            return Ok(vec![gte(major, minor, 0, z)?, upper]);
        };

        let upper = match (major, minor) {
            (0, 0) => lt(0, 0, bump(patch, token)?, Some("0"))?,
            (0, _) => lt(0, bump(minor, token)?, 0, Some("0"))?,
            _ => lt(bump(major, token)?, 0, 0, Some("0"))?,
        };

        // Only 0.x carets let prereleases of the lower bound itself in
        let lower_pre = match p.pre.as_deref() {
            Some(pre) => Some(pre),
            None if major == 0 => z,
            None => None,
        };
        Ok(vec![gte(major, minor, patch, lower_pre)?, upper])
    }

    // 1.x := >=1.0.0 <2.0.0-0, >1.2 := >=1.3.0, <=1 := <2.0.0-0
    fn desugar_x_range(
        &self,
        op: &str,
        p: &Partial,
        token: &str,
    ) -> Result<Vec<Comparator>, RangeError> {
        let z = self.lower_pre();
        let op = if op == "=" { "" } else { op };

        let Some(major) = p.major else {
            return Ok(match op {
                // Nothing can be above or below every version
                ">" | "<" => vec![lt(0, 0, 0, Some("0"))?],
                _ => Vec::new(),
            });
        };

        if !op.is_empty() {
            let minor_is_x = p.minor.is_none();
            let (mut major, mut minor) = (major, p.minor.unwrap_or(0));
            let operator = match op {
                ">" => {
                    if minor_is_x {
                        major = bump(major, token)?;
                        minor = 0;
                    } else {
                        minor = bump(minor, token)?;
                    }
                    Operator::GreaterThanOrEqual
                }
                "<=" => {
                    if minor_is_x {
                        major = bump(major, token)?;
                    } else {
                        minor = bump(minor, token)?;
                    }
                    Operator::LessThan
                }
                ">=" => Operator::GreaterThanOrEqual,
                "<" => Operator::LessThan,
                _ => {
                    return Err(RangeError::InvalidComparator {
                        comparator: token.to_string(),
                    })
                }
            };
            let pre = if operator == Operator::LessThan {
                Some("0")
            } else {
                z
            };
            return Ok(vec![Comparator::new(operator, version(major, minor, 0, pre)?)]);
        }

        match p.minor {
            None => Ok(vec![
                gte(major, 0, 0, z)?,
                lt(bump(major, token)?, 0, 0, Some("0"))?,
            ]),
            Some(minor) => Ok(vec![
                gte(major, minor, 0, z)?,
                lt(major, bump(minor, token)?, 0, Some("0"))?,
            ]),
        }
    }

    // 1.2 - 2.3.4 := >=1.2.0 <=2.3.4, 1.2.3 - 2.3 := >=1.2.3 <2.4.0-0
    fn parse_hyphen(&self, from: &str, to: &str) -> Result<ComparatorSet, RangeError> {
        let z = self.lower_pre();
        let from = hyphen_bound(from)?;
        let to_token = to;
        let to = hyphen_bound(to)?;

        let mut comparators = Vec::new();

        if let Some(major) = from.major {
            let lower = match (from.minor, from.patch) {
                (None, _) => gte(major, 0, 0, z)?,
                (Some(minor), None) => gte(major, minor, 0, z)?,
                (Some(minor), Some(patch)) => match from.pre.as_deref() {
                    Some(pre) => gte(major, minor, patch, Some(pre))?,
                    None => gte(major, minor, patch, z)?,
                },
            };
            comparators.push(lower);
        }

        if let Some(major) = to.major {
            let upper = match (to.minor, to.patch) {
                (None, _) => lt(bump(major, to_token)?, 0, 0, Some("0"))?,
                (Some(minor), None) => lt(major, bump(minor, to_token)?, 0, Some("0"))?,
                (Some(minor), Some(patch)) => match to.pre.as_deref() {
                    Some(pre) => Comparator::new(
                        Operator::LessThanOrEqual,
                        version(major, minor, patch, Some(pre))?,
                    ),
                    None if self.options.include_prerelease => {
                        lt(major, minor, bump(patch, to_token)?, Some("0"))?
                    }
                    None => Comparator::new(
                        Operator::LessThanOrEqual,
                        version(major, minor, patch, None)?,
                    ),
                },
            };
            comparators.push(upper);
        }

        Ok(ComparatorSet::new(comparators))
    }
}

fn hyphen_bound(token: &str) -> Result<Partial, RangeError> {
    let caps = PARTIAL
        .captures(token)
        .filter(|caps| caps.name("op").is_none())
        .ok_or_else(|| RangeError::InvalidHyphenBound {
            bound: token.to_string(),
        })?;
    Partial::from_captures(&caps, token)
}

fn bump(n: u64, token: &str) -> Result<u64, RangeError> {
    n.checked_add(1).ok_or_else(|| RangeError::Overflow {
        comparator: token.to_string(),
    })
}

fn version(major: u64, minor: u64, patch: u64, pre: Option<&str>) -> Result<Version, RangeError> {
    Ok(match pre {
        Some(pre) => Version::with_prerelease(major, minor, patch, pre)?,
        None => Version::new(major, minor, patch),
    })
}

fn exact(p: &Partial) -> Result<Version, RangeError> {
    version(
        p.major.unwrap_or(0),
        p.minor.unwrap_or(0),
        p.patch.unwrap_or(0),
        p.pre.as_deref(),
    )
}

fn gte(major: u64, minor: u64, patch: u64, pre: Option<&str>) -> Result<Comparator, RangeError> {
    Ok(Comparator::new(
        Operator::GreaterThanOrEqual,
        version(major, minor, patch, pre)?,
    ))
}

fn lt(major: u64, minor: u64, patch: u64, pre: Option<&str>) -> Result<Comparator, RangeError> {
    Ok(Comparator::new(
        Operator::LessThan,
        version(major, minor, patch, pre)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desugar(range: &str) -> String {
        RangeParser::default().parse(range).unwrap().to_string()
    }

    fn desugar_pre(range: &str) -> String {
        RangeParser::new(RangeOptions {
            include_prerelease: true,
        })
        .parse(range)
        .unwrap()
        .to_string()
    }

    #[test]
    fn test_caret() {
        assert_eq!(desugar("^1.2.3"), ">=1.2.3 <2.0.0-0");
        assert_eq!(desugar("^0.2.3"), ">=0.2.3 <0.3.0-0");
        assert_eq!(desugar("^0.0.3"), ">=0.0.3 <0.0.4-0");
        assert_eq!(desugar("^1.2"), ">=1.2.0 <2.0.0-0");
        assert_eq!(desugar("^0.2"), ">=0.2.0 <0.3.0-0");
        assert_eq!(desugar("^1"), ">=1.0.0 <2.0.0-0");
        assert_eq!(desugar("^4.1.0-beta"), ">=4.1.0-beta <5.0.0-0");
        assert_eq!(desugar("^*"), "*");
    }

    #[test]
    fn test_caret_with_prerelease_lower_bounds() {
        assert_eq!(desugar_pre("^1.2"), ">=1.2.0-0 <2.0.0-0");
        assert_eq!(desugar_pre("^1.2.3"), ">=1.2.3 <2.0.0-0");
        assert_eq!(desugar_pre("^0.2.3"), ">=0.2.3-0 <0.3.0-0");
        assert_eq!(desugar_pre("^0.0.3"), ">=0.0.3-0 <0.0.4-0");
        assert_eq!(desugar_pre("^1.2.3-beta"), ">=1.2.3-beta <2.0.0-0");
    }

    #[test]
    fn test_tilde() {
        assert_eq!(desugar("~1.2.3"), ">=1.2.3 <1.3.0-0");
        assert_eq!(desugar("~1.2"), ">=1.2.0 <1.3.0-0");
        assert_eq!(desugar("~1"), ">=1.0.0 <2.0.0-0");
        assert_eq!(desugar("~>1.2.3"), ">=1.2.3 <1.3.0-0");
        assert_eq!(desugar("~ 1.2.3"), ">=1.2.3 <1.3.0-0");
    }

    #[test]
    fn test_x_ranges() {
        assert_eq!(desugar("*"), "*");
        assert_eq!(desugar(""), "*");
        assert_eq!(desugar("x"), "*");
        assert_eq!(desugar("1.x"), ">=1.0.0 <2.0.0-0");
        assert_eq!(desugar("1.2.*"), ">=1.2.0 <1.3.0-0");
        assert_eq!(desugar("2"), ">=2.0.0 <3.0.0-0");
        assert_eq!(desugar(">1.2"), ">=1.3.0");
        assert_eq!(desugar(">1"), ">=2.0.0");
        assert_eq!(desugar("<=1.2"), "<1.3.0-0");
        assert_eq!(desugar("<1"), "<1.0.0-0");
        assert_eq!(desugar(">*"), "<0.0.0-0");
        assert_eq!(desugar_pre("1.x"), ">=1.0.0-0 <2.0.0-0");
    }

    #[test]
    fn test_primitive_comparators() {
        assert_eq!(desugar(">=1.0.0"), ">=1.0.0");
        assert_eq!(desugar(">= 1.0.0 < 2.0.0"), ">=1.0.0 <2.0.0");
        assert_eq!(desugar("1.2.3"), "=1.2.3");
        assert_eq!(desugar("=1.2.3"), "=1.2.3");
        assert_eq!(desugar("v1.2.3"), "=1.2.3");
    }

    #[test]
    fn test_hyphen() {
        assert_eq!(desugar("1.2.3 - 2.3.4"), ">=1.2.3 <=2.3.4");
        assert_eq!(desugar("1.2 - 2.3.4"), ">=1.2.0 <=2.3.4");
        assert_eq!(desugar("1.2.3 - 2.3"), ">=1.2.3 <2.4.0-0");
        assert_eq!(desugar("1.2.3 - 2"), ">=1.2.3 <3.0.0-0");
        assert_eq!(desugar_pre("1.2.3 - 2.3.4"), ">=1.2.3-0 <2.3.5-0");
    }

    #[test]
    fn test_disjunction() {
        assert_eq!(
            desugar("^1.0.2 || 2 || 3 || 4"),
            ">=1.0.2 <2.0.0-0 || >=2.0.0 <3.0.0-0 || >=3.0.0 <4.0.0-0 || >=4.0.0 <5.0.0-0"
        );
    }

    #[test]
    fn test_invalid_ranges() {
        let parser = RangeParser::default();
        assert!(matches!(
            parser.parse("next"),
            Err(RangeError::InvalidComparator { .. })
        ));
        assert!(parser.parse("latest").is_err());
        assert!(parser.parse("string-width@^4.2.0").is_err());
        assert!(parser.parse("^1.0.0 || beta").is_err());
        assert!(parser.parse("=> 1.0.0").is_err());
        assert!(matches!(
            parser.parse(">1.0.0 - 2.0.0"),
            Err(RangeError::InvalidHyphenBound { .. })
        ));
    }
}
