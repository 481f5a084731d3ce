//! Flatten lockfile entries into package instances.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::config::DedupeOptions;
use crate::descriptor::{Descriptor, DescriptorError};
use crate::lockfile::{split_key, LockEntry, Lockfile, METADATA_KEY};

/// The protocol whose selectors are version ranges
pub const NPM_PROTOCOL: &str = "npm";

/// One requester of a package: a single descriptor of a lockfile key.
#[derive(Debug, Clone)]
pub struct PackageInstance {
    /// Group this instance is resolved with
    pub package_key: String,
    /// Logical package name, taken from the aliased descriptor if any
    pub package_name: String,
    /// Descriptor string exactly as it appears in the lockfile key
    pub descriptor_string: String,
    pub descriptor: Descriptor,
    pub requested_protocol: Option<String>,
    pub requested_version: String,
    pub installed_version: String,
    /// The entry this descriptor resolved to, shared with its siblings
    pub entry: Arc<LockEntry>,
    /// Excluded from resolution; its best version is its installed version
    pub ignored: bool,
    /// Versions this instance accepts, own installed version first
    pub satisfied_by: IndexSet<String>,
    /// `satisfied_by` ranked best first, set once resolution ran
    pub candidate_versions: Option<Vec<String>>,
    pub best_version: String,
}

impl PackageInstance {
    /// Whether resolution picked a version other than the installed one
    pub fn is_changed(&self) -> bool {
        self.best_version != self.installed_version
    }
}

/// Package instances grouped by package key, in lockfile order
pub type Packages = IndexMap<String, Vec<PackageInstance>>;

/// Build the package table from lockfile entries.
///
/// Every descriptor of a compound key yields its own instance; descriptors
/// that cannot be parsed abort extraction.
pub fn extract_packages(
    lockfile: &Lockfile,
    options: &DedupeOptions,
) -> Result<Packages, DescriptorError> {
    let mut packages = Packages::new();

    for (entry_key, entry) in &lockfile.entries {
        if entry_key == METADATA_KEY {
            continue;
        }

        let entry = Arc::new(entry.clone());

        for descriptor_string in split_key(entry_key) {
            let instance = extract_instance(entry_key, descriptor_string, &entry, options)?;
            packages
                .entry(instance.package_key.clone())
                .or_default()
                .push(instance);
        }
    }

    log::debug!(
        "Extracted {} package groups from {} lockfile entries",
        packages.len(),
        lockfile.len()
    );

    Ok(packages)
}

fn extract_instance(
    entry_key: &str,
    descriptor_string: &str,
    entry: &Arc<LockEntry>,
    options: &DedupeOptions,
) -> Result<PackageInstance, DescriptorError> {
    let descriptor = Descriptor::parse(descriptor_string)?;
    let range = descriptor.range_spec();

    // `foo@npm:bar@^1.0.0` installs bar under the name foo
    let actual = Descriptor::try_parse(&range.selector).unwrap_or_else(|| descriptor.clone());
    let package_name = actual.ident.to_string();

    let ignored = !range.is_protocol(NPM_PROTOCOL)
        || entry.is_soft_link()
        || options.is_filtered_out(&actual.ident);

    let package_key = match (&range.protocol, ignored) {
        (Some(protocol), false) => format!("{}@{}", package_name, protocol),
        _ => entry_key.to_string(),
    };

    Ok(PackageInstance {
        package_key,
        package_name,
        descriptor_string: descriptor_string.to_string(),
        descriptor,
        requested_protocol: range.protocol,
        requested_version: range.selector,
        installed_version: entry.version.clone(),
        entry: Arc::clone(entry),
        ignored,
        satisfied_by: IndexSet::new(),
        candidate_versions: None,
        best_version: entry.version.clone(),
    })
}
