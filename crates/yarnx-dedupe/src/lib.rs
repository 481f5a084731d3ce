//! Yarn lockfile deduplication.
//!
//! A lockfile often pins the same package at several versions because each
//! requester was resolved at a different time. This crate finds, for every
//! requester, a version that is already installed elsewhere in the lockfile
//! and still satisfies its range, then merges the entries that end up on the
//! same version.
//!
//! The work is split into three stages:
//!
//! - [`extract`]: flatten lockfile entries into package instances grouped by
//!   logical package
//! - [`resolver`]: rank the compatible versions of every instance and pick
//!   the best one under a [`Strategy`]
//! - [`rewrite`]: rebuild the lockfile entries from the picks
//!
//! # Example
//!
//! ```
//! use yarnx_dedupe::{fix_duplicates, list_duplicates, DedupeOptions, LockEntry, Lockfile};
//!
//! let mut lockfile = Lockfile::new();
//! lockfile.insert("library@npm:^1.1.0", LockEntry::new("1.2.0"));
//! lockfile.insert("library@npm:^1.3.0", LockEntry::new("1.3.0"));
//!
//! let options = DedupeOptions::default();
//! let duplicates = list_duplicates(&lockfile, &options).unwrap();
//! assert_eq!(
//!     duplicates[0].to_string(),
//!     "Package \"library\" wants ^1.1.0 and could get 1.3.0, but got 1.2.0"
//! );
//!
//! let fixed = fix_duplicates(&lockfile, &options).unwrap();
//! assert_eq!(fixed.len(), 1);
//! assert!(fixed.get("library@npm:^1.1.0, library@npm:^1.3.0").is_some());
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod lockfile;
pub mod report;
pub mod resolver;
pub mod rewrite;

pub use config::{ConfigError, DedupeOptions, Strategy};
pub use descriptor::{Descriptor, DescriptorError, Ident, RangeSpec};
pub use error::{Error, Result};
pub use extract::{extract_packages, PackageInstance, Packages};
pub use lockfile::{LinkType, LockEntry, Lockfile, MULTI_KEY_SEPARATOR};
pub use report::Duplicate;
pub use resolver::{find_changed_instances, resolve, Resolution, Resolver};
pub use rewrite::{rewrite, RewriteError};

/// Extract and resolve a lockfile
pub fn resolve_lockfile(lockfile: &Lockfile, options: &DedupeOptions) -> Result<Resolution> {
    let packages = extract_packages(lockfile, options)?;
    Ok(resolve(packages, options))
}

/// Report every requester that could move to a shared version
pub fn list_duplicates(lockfile: &Lockfile, options: &DedupeOptions) -> Result<Vec<Duplicate>> {
    let resolution = resolve_lockfile(lockfile, options)?;

    Ok(resolution
        .changed()
        .into_iter()
        .map(Duplicate::from)
        .collect())
}

/// Rewrite a lockfile so that requesters share versions where they can.
///
/// The metadata record is carried over unchanged.
pub fn fix_duplicates(lockfile: &Lockfile, options: &DedupeOptions) -> Result<Lockfile> {
    let resolution = resolve_lockfile(lockfile, options)?;
    let entries = rewrite(&resolution)?;

    log::info!(
        "Deduplicated {} entries into {} ({} requesters moved)",
        lockfile.len(),
        entries.len(),
        resolution.changed().len()
    );

    Ok(Lockfile {
        metadata: lockfile.metadata.clone(),
        entries,
    })
}
