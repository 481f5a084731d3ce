use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::extract::PackageInstance;
use crate::lockfile::LockEntry;

/// A distinct installed version of a package group
#[derive(Debug, Clone)]
pub struct VersionRecord {
    /// Entry of the first instance found installed at this version
    pub entry: Arc<LockEntry>,
    /// Indices (within the group) of the instances this version satisfies
    pub satisfies: IndexSet<usize>,
}

impl VersionRecord {
    pub fn new(entry: Arc<LockEntry>) -> Self {
        Self {
            entry,
            satisfies: IndexSet::new(),
        }
    }

    /// Number of requesters accepting this version
    pub fn popularity(&self) -> usize {
        self.satisfies.len()
    }
}

/// Installed versions of one group, in first-seen order
pub type VersionTable = IndexMap<String, VersionRecord>;

/// Collect the version universe of a group from its non-ignored instances
pub fn build_version_table(instances: &[PackageInstance]) -> VersionTable {
    let mut table = VersionTable::new();

    for instance in instances.iter().filter(|i| !i.ignored) {
        table
            .entry(instance.installed_version.clone())
            .or_insert_with(|| VersionRecord::new(Arc::clone(&instance.entry)));
    }

    table
}
