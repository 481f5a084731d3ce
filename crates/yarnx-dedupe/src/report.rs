use std::fmt;

use crate::extract::PackageInstance;

/// A requester that could share a version with its siblings but does not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub package_name: String,
    pub descriptor: String,
    pub requested_version: String,
    pub installed_version: String,
    pub best_version: String,
}

impl From<&PackageInstance> for Duplicate {
    fn from(instance: &PackageInstance) -> Self {
        Self {
            package_name: instance.package_name.clone(),
            descriptor: instance.descriptor_string.clone(),
            requested_version: instance.requested_version.clone(),
            installed_version: instance.installed_version.clone(),
            best_version: instance.best_version.clone(),
        }
    }
}

impl fmt::Display for Duplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Package \"{}\" wants {} and could get {}, but got {}",
            self.package_name, self.requested_version, self.best_version, self.installed_version
        )
    }
}
