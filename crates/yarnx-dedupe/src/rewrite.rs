//! Rebuild lockfile entries from resolved instances.
//!
//! Instances that resolve to the same package at the same version collapse
//! into one entry whose key lists every descriptor it replaces.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::extract::PackageInstance;
use crate::lockfile::{join_key, LockEntry};
use crate::resolver::Resolution;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("No entry installed at the resolved version for \"{key}\"")]
    MissingRepresentative { key: String },
}

/// Descriptors merged under one final key, plus the entry they share
#[derive(Debug)]
struct Merged<'a> {
    package_key: &'a str,
    best_version: &'a str,
    descriptors: Vec<&'a str>,
    entry: Option<&'a Arc<LockEntry>>,
}

/// Key identifying the entry an instance ends up in.
///
/// Ignored instances keep their group key; the others are keyed by their
/// package name and resolved version. An alias such as
/// `foo-alias@npm:foo@^1` is keyed by `foo` rather than by its own ident, so
/// it lands in the same entry as `foo@npm:^1` when both resolve alike.
pub fn final_key(instance: &PackageInstance) -> String {
    if instance.ignored {
        return instance.package_key.clone();
    }

    match &instance.requested_protocol {
        Some(protocol) => format!(
            "{}@{}:{}",
            instance.package_name, protocol, instance.best_version
        ),
        None => format!("{}@{}", instance.package_name, instance.best_version),
    }
}

/// Produce the new lockfile entries, keyed by compound descriptor keys.
///
/// The entry of a merged key comes from the first instance that kept its
/// installed version. When every instance moved, the entry recorded for the
/// resolved version in the group's version table is used instead.
pub fn rewrite(resolution: &Resolution) -> Result<IndexMap<String, LockEntry>, RewriteError> {
    let mut merged: IndexMap<String, Merged<'_>> = IndexMap::new();

    for instance in resolution.instances() {
        let slot = merged.entry(final_key(instance)).or_insert_with(|| Merged {
            package_key: &instance.package_key,
            best_version: &instance.best_version,
            descriptors: Vec::new(),
            entry: None,
        });

        slot.descriptors.push(&instance.descriptor_string);
        if slot.entry.is_none() && !instance.is_changed() {
            slot.entry = Some(&instance.entry);
        }
    }

    let mut entries = IndexMap::with_capacity(merged.len());

    for (key, slot) in merged {
        let entry = match slot.entry {
            Some(entry) => entry,
            None => resolution
                .versions(slot.package_key)
                .and_then(|table| table.get(slot.best_version))
                .map(|record| &record.entry)
                .ok_or_else(|| RewriteError::MissingRepresentative { key: key.clone() })?,
        };

        let compound = join_key(&slot.descriptors);
        if slot.descriptors.len() > 1 {
            log::debug!("Merged {} descriptors into {}", slot.descriptors.len(), key);
        }
        entries.insert(compound, LockEntry::clone(entry));
    }

    Ok(entries)
}
