use yarnx_semver::{Range, RangeOptions, Version};

/// Outcome of testing a version against a requested range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfaction {
    Satisfies,
    DoesNotSatisfy,
    /// The requested range is not a valid semver range (a dist-tag, an
    /// alias, ...); only the installed version can serve it
    InvalidRange,
}

impl Satisfaction {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Satisfaction::Satisfies)
    }
}

/// A requested range, parsed once and tested against many versions
#[derive(Debug, Clone)]
pub struct RangeCheck {
    range: Option<Range>,
}

impl RangeCheck {
    pub fn new(requested: &str, options: RangeOptions) -> Self {
        Self {
            range: Range::parse(requested, options).ok(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.range.is_some()
    }

    pub fn check(&self, version: &str) -> Satisfaction {
        let Some(range) = &self.range else {
            return Satisfaction::InvalidRange;
        };

        match Version::parse(version) {
            Ok(version) if range.satisfies(&version) => Satisfaction::Satisfies,
            _ => Satisfaction::DoesNotSatisfy,
        }
    }
}
