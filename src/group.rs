//! Group records as reported by the directory.
//!
//! A [`GroupRecord`] is authoritative: it is only ever obtained from a
//! [`GroupDirectory`](crate::directory::GroupDirectory) search and is never
//! kept beyond the lifetime of one cached snapshot.

use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Opaque group identifier assigned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Wrap a raw directory key.
    pub fn new(raw: impl Into<String>) -> Self {
        GroupKey(raw.into())
    }

    /// The underlying key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupKey {
    fn from(raw: &str) -> Self {
        GroupKey(raw.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(raw: String) -> Self {
        GroupKey(raw)
    }
}

/// One group as reported by the directory for a given search.
///
/// `assignable` reflects the directory's verdict for the scope the search ran
/// in; it is not a global property of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Directory-assigned key.
    pub key: GroupKey,
    /// Display name.
    pub name: String,
    /// The scope the group itself lives in.
    pub scope: Scope,
    /// Whether the group may be assigned to subjects in the searched scope.
    pub assignable: bool,
}

impl GroupRecord {
    /// Convenience constructor, mainly for fixtures and tests.
    pub fn new(
        key: impl Into<GroupKey>,
        name: impl Into<String>,
        scope: Scope,
        assignable: bool,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            scope,
            assignable,
        }
    }
}
