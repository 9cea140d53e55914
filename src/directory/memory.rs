//! In-memory group directory.
//!
//! Interprets the structured [`Predicate`] directly against a fixed set of
//! group records, with the same assignability, sorting and paging rules as
//! the remote service: a group is assignable within a searched scope when
//! its flag is set and its own scope is an ancestor of (or equal to) the
//! searched scope. Used by tests, benchmarks and the CLI's `--groups`
//! fixture mode.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::DirectoryError;
use crate::group::GroupRecord;
use crate::query::{Field, Predicate};
use crate::scope::Scope;

use super::{DirectoryResult, GroupDirectory, GroupPage, PageLimit, Paging, SortBy, SortField};

/// A local, predicate-interpreting [`GroupDirectory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    groups: Vec<GroupRecord>,
}

impl InMemoryDirectory {
    pub fn new(groups: Vec<GroupRecord>) -> Self {
        Self { groups }
    }

    /// Load a group fixture: a JSON array of group records.
    pub fn from_json_file(path: &Path) -> DirectoryResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DirectoryError::Unavailable {
                message: format!("cannot read group fixture {}: {e}", path.display()),
            })?;
        let groups: Vec<GroupRecord> =
            serde_json::from_str(&content).map_err(|e| DirectoryError::Protocol {
                message: format!("invalid group fixture {}: {e}", path.display()),
            })?;
        Ok(Self::new(groups))
    }

    /// Number of groups in the directory.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn matches(record: &GroupRecord, scope: &Scope, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Assignable => record.assignable && record.scope.contains(scope),
            Predicate::Equals {
                field: Field::Key,
                value,
            } => record.key.as_str() == value,
            Predicate::Equals {
                field: Field::Name,
                value,
            } => record.name == *value,
            Predicate::And(parts) => parts.iter().all(|p| Self::matches(record, scope, p)),
            Predicate::Or(parts) => parts.iter().any(|p| Self::matches(record, scope, p)),
        }
    }

    fn compare(a: &GroupRecord, b: &GroupRecord, sort: SortBy) -> Ordering {
        let order = match sort.field {
            SortField::Name => a
                .name
                .to_ascii_lowercase()
                .cmp(&b.name.to_ascii_lowercase())
                .then_with(|| a.key.cmp(&b.key)),
            SortField::Key => a.key.cmp(&b.key),
        };
        if sort.ascending { order } else { order.reverse() }
    }
}

impl GroupDirectory for InMemoryDirectory {
    fn search(
        &self,
        scope: &Scope,
        predicate: &Predicate,
        paging: Paging,
        sort: SortBy,
    ) -> DirectoryResult<GroupPage> {
        let mut records: Vec<GroupRecord> = self
            .groups
            .iter()
            .filter(|g| Self::matches(g, scope, predicate))
            .cloned()
            .collect();
        records.sort_by(|a, b| Self::compare(a, b, sort));

        let total = records.len();
        let records = match paging.limit {
            PageLimit::All => records,
            PageLimit::Max(limit) => {
                let start = paging.page.saturating_sub(1) as usize * limit as usize;
                records
                    .into_iter()
                    .skip(start)
                    .take(limit as usize)
                    .collect()
            }
        };
        Ok(GroupPage { records, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupKey;
    use crate::query;

    fn scope(path: &str) -> Scope {
        Scope::new(path).unwrap()
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new(vec![
            GroupRecord::new("g-1", "beta", scope("/org"), true),
            GroupRecord::new("g-2", "Alpha", scope("/"), true),
            GroupRecord::new("g-3", "gamma", scope("/org/sub"), true),
            GroupRecord::new("g-4", "delta", scope("/org"), false),
            GroupRecord::new("g-5", "epsilon", scope("/other"), true),
        ])
    }

    #[test]
    fn assignable_requires_flag_and_scope_containment() {
        let page = directory()
            .search(
                &scope("/org"),
                &query::candidates(),
                Paging::all(),
                SortBy::name_ascending(),
            )
            .unwrap();

        // g-3 lives below /org, g-4 is flagged off, g-5 is another branch.
        let names: Vec<&str> = page.records.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn key_disjunction_matches_without_assignability() {
        let keys = vec![GroupKey::new("g-4"), GroupKey::new("g-5")];
        let predicate = query::dynamic_resolution(&keys).unwrap();
        let page = directory()
            .search(
                &Scope::root(),
                &predicate,
                Paging::all(),
                SortBy::name_ascending(),
            )
            .unwrap();
        let names: Vec<&str> = page.records.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["delta", "epsilon"]);
    }

    #[test]
    fn name_sort_is_case_insensitive_with_key_tiebreak() {
        let dir = InMemoryDirectory::new(vec![
            GroupRecord::new("g-2", "same", scope("/"), true),
            GroupRecord::new("g-1", "same", scope("/"), true),
            GroupRecord::new("g-3", "aardvark", scope("/"), true),
        ]);
        let page = dir
            .search(
                &Scope::root(),
                &query::candidates(),
                Paging::all(),
                SortBy::name_ascending(),
            )
            .unwrap();
        let keys: Vec<&str> = page.records.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["g-3", "g-1", "g-2"]);
    }

    #[test]
    fn paging_slices_but_total_counts_all_matches() {
        let dir = InMemoryDirectory::new(
            (0..7)
                .map(|i| GroupRecord::new(format!("g-{i}"), format!("group-{i}"), scope("/"), true))
                .collect(),
        );

        let first = dir
            .search(
                &Scope::root(),
                &query::candidates(),
                Paging::first(3),
                SortBy::name_ascending(),
            )
            .unwrap();
        assert_eq!(first.records.len(), 3);
        assert_eq!(first.total, 7);

        let third = dir
            .search(
                &Scope::root(),
                &query::candidates(),
                Paging {
                    page: 3,
                    limit: PageLimit::Max(3),
                },
                SortBy::name_ascending(),
            )
            .unwrap();
        assert_eq!(third.records.len(), 1);
        assert_eq!(third.records[0].name, "group-6");
    }

    #[test]
    fn fixture_file_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("groups.json");

        let groups = vec![
            GroupRecord::new("g-1", "Admins", scope("/org"), true),
            GroupRecord::new("g-2", "Ops", scope("/"), true),
        ];
        std::fs::write(&path, serde_json::to_string_pretty(&groups).unwrap()).unwrap();

        let dir = InMemoryDirectory::from_json_file(&path).unwrap();
        assert_eq!(dir.len(), 2);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            InMemoryDirectory::from_json_file(&path),
            Err(DirectoryError::Protocol { .. })
        ));
        assert!(matches!(
            InMemoryDirectory::from_json_file(&tmp.path().join("missing.json")),
            Err(DirectoryError::Unavailable { .. })
        ));
    }
}
