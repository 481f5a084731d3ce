//! Lockfile entity model.
//!
//! This is the structured form exchanged with whatever reads and writes the
//! textual `yarn.lock`. Keys are compound: one entry may be shared by several
//! descriptors joined with [`MULTI_KEY_SEPARATOR`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Separator between descriptors sharing one lockfile entry
pub const MULTI_KEY_SEPARATOR: &str = ", ";

/// Key of the housekeeping record
pub const METADATA_KEY: &str = "__metadata";

/// How an entry is linked into the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Regular package fetched into the cache
    Hard,
    /// Workspace or portal link
    Soft,
}

/// One installed entry of the lockfile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockEntry {
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    #[serde(rename = "linkType", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,

    /// Fields this tool does not interpret, kept in file order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl LockEntry {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn with_link_type(mut self, link_type: LinkType) -> Self {
        self.link_type = Some(link_type);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Whether the entry is a soft link (workspace, portal, ...)
    pub fn is_soft_link(&self) -> bool {
        matches!(self.link_type, Some(LinkType::Soft))
    }
}

/// A whole lockfile: the metadata record plus every entry in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(rename = "__metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    #[serde(flatten)]
    pub entries: IndexMap<String, LockEntry>,
}

impl Lockfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry under a (possibly compound) key
    pub fn insert(&mut self, key: impl Into<String>, entry: LockEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&LockEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the JSON form of a lockfile
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Render the lockfile as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Split a compound key into its descriptor strings
pub fn split_key(key: &str) -> impl Iterator<Item = &str> {
    key.split(MULTI_KEY_SEPARATOR)
}

/// Join descriptor strings into a compound key
pub fn join_key<S: AsRef<str>>(descriptors: &[S]) -> String {
    descriptors
        .iter()
        .map(|d| d.as_ref())
        .collect::<Vec<_>>()
        .join(MULTI_KEY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCKFILE: &str = r#"{
        "__metadata": { "version": 6, "cacheKey": "8" },
        "a-package@npm:^2.0.0": {
            "version": "2.0.1",
            "resolution": "a-package@npm:2.0.1",
            "dependencies": { "a-second-package": "^2.0.0" },
            "checksum": "abc",
            "languageName": "node",
            "linkType": "hard"
        },
        "my-workspace@workspace:.": {
            "version": "0.0.0-use.local",
            "linkType": "soft"
        }
    }"#;

    #[test]
    fn test_parse_lockfile() {
        let lockfile = Lockfile::from_json(LOCKFILE).unwrap();

        assert!(lockfile.metadata.is_some());
        assert_eq!(lockfile.len(), 2);

        let entry = lockfile.get("a-package@npm:^2.0.0").unwrap();
        assert_eq!(entry.version, "2.0.1");
        assert_eq!(entry.resolution.as_deref(), Some("a-package@npm:2.0.1"));
        assert_eq!(entry.dependencies["a-second-package"], "^2.0.0");
        assert_eq!(entry.link_type, Some(LinkType::Hard));
        assert_eq!(entry.extra["languageName"], "node");
        assert!(!entry.is_soft_link());

        assert!(lockfile.get("my-workspace@workspace:.").unwrap().is_soft_link());
    }

    #[test]
    fn test_entries_keep_file_order() {
        let lockfile = Lockfile::from_json(LOCKFILE).unwrap();
        let keys: Vec<_> = lockfile.entries.keys().collect();
        assert_eq!(keys, vec!["a-package@npm:^2.0.0", "my-workspace@workspace:."]);
    }

    #[test]
    fn test_json_roundtrip_keeps_metadata_first() {
        let lockfile = Lockfile::from_json(LOCKFILE).unwrap();
        let json = lockfile.to_json().unwrap();

        assert!(json.find("__metadata").unwrap() < json.find("a-package").unwrap());
        assert_eq!(Lockfile::from_json(&json).unwrap(), lockfile);
    }

    #[test]
    fn test_split_and_join_key() {
        let key = "lodash@npm:>=1.0.0, lodash@npm:>=2.0.0";
        let parts: Vec<_> = split_key(key).collect();
        assert_eq!(parts, vec!["lodash@npm:>=1.0.0", "lodash@npm:>=2.0.0"]);
        assert_eq!(join_key(&parts), key);
    }

    #[test]
    fn test_entry_builder() {
        let entry = LockEntry::new("1.0.0")
            .with_resolution("lib@npm:1.0.0")
            .with_link_type(LinkType::Hard)
            .with_field("resolved", "https://example.net/lib-1.0.0.tgz");

        assert_eq!(entry.version, "1.0.0");
        assert_eq!(entry.extra["resolved"], "https://example.net/lib-1.0.0.tgz");
    }
}
