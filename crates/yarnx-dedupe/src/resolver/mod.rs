//! Version resolution for extracted package groups.
//!
//! Resolution runs in explicit passes over an owned package table:
//!
//! 1. **Ranking**: every group gets a [`VersionTable`] of its installed
//!    versions; each requester collects the versions it accepts and ranks
//!    them with the [`Policy`] of the configured strategy.
//! 2. **Convergence** (only for [`Strategy::FewerHighest`]): the picks of
//!    pass one are gathered per group and every requester moves to the
//!    highest of them it accepts.
//!
//! [`Strategy::FewerHighest`]: crate::config::Strategy::FewerHighest

mod consensus;
mod policy;
mod satisfaction;
mod version_table;


use indexmap::IndexMap;
use yarnx_semver::RangeOptions;

pub use consensus::{converge, selected_versions, SelectedVersions};
pub use policy::Policy;
pub use satisfaction::{RangeCheck, Satisfaction};
pub use version_table::{build_version_table, VersionRecord, VersionTable};

use crate::config::{DedupeOptions, Strategy};
use crate::extract::{PackageInstance, Packages};

/// Resolved instances plus the version table of every group
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    packages: Packages,
    versions: IndexMap<String, VersionTable>,
}

impl Resolution {
    /// Assemble a resolution from resolved packages and their version tables
    pub fn from_parts(packages: Packages, versions: IndexMap<String, VersionTable>) -> Self {
        Self { packages, versions }
    }

    /// Resolved instances grouped by package key
    pub fn packages(&self) -> &Packages {
        &self.packages
    }

    /// Every resolved instance, group by group
    pub fn instances(&self) -> impl Iterator<Item = &PackageInstance> {
        self.packages.values().flatten()
    }

    /// Version table of a group
    pub fn versions(&self, package_key: &str) -> Option<&VersionTable> {
        self.versions.get(package_key)
    }

    /// Instances whose best version differs from the installed one
    pub fn changed(&self) -> Vec<&PackageInstance> {
        find_changed_instances(self.instances())
    }

    pub fn into_packages(self) -> Packages {
        self.packages
    }
}

/// Picks a best version for every package instance
#[derive(Debug, Clone)]
pub struct Resolver {
    strategy: Strategy,
    policy: Policy,
    range_options: RangeOptions,
}

impl Resolver {
    pub fn new(options: &DedupeOptions) -> Self {
        Self {
            strategy: options.strategy,
            policy: Policy::new(options.strategy),
            range_options: options.range_options(),
        }
    }

    /// Run every pass of the configured strategy
    pub fn resolve(&self, packages: Packages) -> Resolution {
        let Resolution { packages, versions } = self.rank(packages);

        let packages = if self.strategy.converges() {
            let selected = selected_versions(&packages);
            converge(packages, &selected)
        } else {
            packages
        };

        let resolution = Resolution::from_parts(packages, versions);
        log::debug!(
            "Resolved {} groups with strategy {}, {} instances changed",
            resolution.packages.len(),
            self.strategy,
            resolution.changed().len()
        );

        resolution
    }

    /// First pass: rank the candidates of every group independently
    pub fn rank(&self, mut packages: Packages) -> Resolution {
        let mut versions = IndexMap::with_capacity(packages.len());

        for (key, instances) in packages.iter_mut() {
            let table = self.rank_group(instances);
            log::debug!("{}: {} installed versions", key, table.len());
            versions.insert(key.clone(), table);
        }

        Resolution { packages, versions }
    }

    fn rank_group(&self, instances: &mut [PackageInstance]) -> VersionTable {
        let mut table = build_version_table(instances);

        for (index, instance) in instances.iter_mut().enumerate() {
            instance.satisfied_by.insert(instance.installed_version.clone());

            let check = RangeCheck::new(&instance.requested_version, self.range_options);
            if !check.is_valid() {
                log::trace!(
                    "{}: \"{}\" is not a valid range, keeping {}",
                    instance.descriptor_string,
                    instance.requested_version,
                    instance.installed_version
                );
                continue;
            }

            for (version, record) in table.iter_mut() {
                if check.check(version).is_satisfied() {
                    instance.satisfied_by.insert(version.clone());
                    record.satisfies.insert(index);
                }
            }
        }

        for instance in instances.iter_mut() {
            if instance.ignored {
                instance.best_version = instance.installed_version.clone();
                continue;
            }

            let candidates = self.policy.select_preferred(&table, &instance.satisfied_by);
            if let Some(best) = candidates.first() {
                instance.best_version = best.clone();
            }

            log::trace!(
                "{}: candidates {:?}",
                instance.descriptor_string,
                candidates
            );
            instance.candidate_versions = Some(candidates);
        }

        table
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&DedupeOptions::default())
    }
}

/// Resolve every group of `packages` under `options`
pub fn resolve(packages: Packages, options: &DedupeOptions) -> Resolution {
    Resolver::new(options).resolve(packages)
}

/// Keep the instances whose best version differs from the installed one
pub fn find_changed_instances<'a, I>(instances: I) -> Vec<&'a PackageInstance>
where
    I: IntoIterator<Item = &'a PackageInstance>,
{
    instances.into_iter().filter(|i| i.is_changed()).collect()
}
