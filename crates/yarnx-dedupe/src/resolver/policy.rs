use std::cmp::Ordering;

use yarnx_semver::compare_descending;

use super::version_table::VersionTable;
use crate::config::Strategy;

/// Ranks the candidate versions of a requester.
///
/// Popularity counts how many requesters of the group a version satisfies;
/// versions missing from the table count as zero.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    /// Rank by popularity before semver order
    pub prefer_popular: bool,
}

impl Policy {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            prefer_popular: strategy.ranks_by_popularity(),
        }
    }

    /// Compare two candidates, best first
    pub fn compare(&self, table: &VersionTable, a: &str, b: &str) -> Ordering {
        if self.prefer_popular {
            let popularity = |v: &str| table.get(v).map_or(0, |r| r.popularity());
            let popularity_cmp = popularity(b).cmp(&popularity(a));
            if popularity_cmp != Ordering::Equal {
                return popularity_cmp;
            }
        }

        compare_descending(a, b)
    }

    /// Sort candidates by preference (best first)
    pub fn select_preferred<'a, I>(&self, table: &VersionTable, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut sorted: Vec<String> = candidates.into_iter().cloned().collect();
        sorted.sort_by(|a, b| self.compare(table, a, b));
        sorted
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::lockfile::LockEntry;
    use crate::resolver::version_table::VersionRecord;

    /// Table of `(version, number of requesters it satisfies)`
    fn table(entries: &[(&str, usize)]) -> VersionTable {
        entries
            .iter()
            .map(|&(version, popularity)| {
                let mut record = VersionRecord::new(Arc::new(LockEntry::new(version)));
                record.satisfies.extend(0..popularity);
                (version.to_string(), record)
            })
            .collect()
    }

    fn versions(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_popularity_first() {
        let table = table(&[("3.0.0", 2), ("2.1.0", 3)]);
        let policy = Policy::new(Strategy::MostCommon);

        let sorted = policy.select_preferred(&table, &versions(&["3.0.0", "2.1.0"]));
        assert_eq!(sorted, vec!["2.1.0", "3.0.0"]);
    }

    #[test]
    fn test_popularity_ties_prefer_highest() {
        let table = table(&[("1.2.0", 2), ("1.3.0", 2)]);
        let policy = Policy::new(Strategy::Fewer);

        let sorted = policy.select_preferred(&table, &versions(&["1.2.0", "1.3.0"]));
        assert_eq!(sorted, vec!["1.3.0", "1.2.0"]);
    }

    #[test]
    fn test_highest_ignores_popularity() {
        let table = table(&[("3.0.0", 2), ("2.1.0", 3)]);
        let policy = Policy::new(Strategy::Highest);

        let sorted = policy.select_preferred(&table, &versions(&["2.1.0", "3.0.0"]));
        assert_eq!(sorted, vec!["3.0.0", "2.1.0"]);
    }

    #[test]
    fn test_unknown_versions_rank_last() {
        let table = table(&[("1.0.0", 1)]);
        let policy = Policy::default();

        let sorted = policy.select_preferred(&table, &versions(&["2.0.0", "1.0.0"]));
        assert_eq!(sorted, vec!["1.0.0", "2.0.0"]);
    }
}
