//! Convergence pass over first-round picks.
//!
//! Requesters of one group can land on different first-round versions when
//! their ranges overlap only partially. This pass restricts every requester
//! to the versions its group already picked, then takes the highest of them.

use indexmap::{IndexMap, IndexSet};
use yarnx_semver::compare_descending;

use crate::extract::Packages;

/// Versions picked by the requesters of each group
pub type SelectedVersions = IndexMap<String, IndexSet<String>>;

/// Gather the best versions chosen so far, per package key
pub fn selected_versions(packages: &Packages) -> SelectedVersions {
    packages
        .iter()
        .map(|(key, instances)| {
            let picks = instances.iter().map(|i| i.best_version.clone()).collect();
            (key.clone(), picks)
        })
        .collect()
}

/// Move every requester to the highest selected version it accepts.
///
/// `candidate_versions` keeps the ranking from the first pass; only
/// `best_version` changes.
pub fn converge(mut packages: Packages, selected: &SelectedVersions) -> Packages {
    for (key, instances) in packages.iter_mut() {
        let Some(picks) = selected.get(key) else {
            continue;
        };

        for instance in instances.iter_mut().filter(|i| !i.ignored) {
            let Some(candidates) = &instance.candidate_versions else {
                continue;
            };

            let best = candidates
                .iter()
                .filter(|v| picks.contains(*v))
                .min_by(|a, b| compare_descending(a.as_str(), b.as_str()))
                .cloned();

            if let Some(best) = best {
                if best != instance.best_version {
                    log::trace!(
                        "{} converges from {} to {}",
                        instance.descriptor_string,
                        instance.best_version,
                        best
                    );
                }
                instance.best_version = best;
            }
        }
    }

    packages
}
