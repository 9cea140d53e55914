//! The group directory collaborator.
//!
//! [`GroupDirectory`] is the narrow interface this crate consumes: a remote,
//! predicate-based, paginated group search. Reconciliation issues at most one
//! call per resolution category and batches key lookups into a single
//! OR-combined query, so directory round-trips stay bounded regardless of
//! how many groups a subject references.
//!
//! Two implementations ship with the crate:
//!
//! - [`rest::RestGroupDirectory`]: synchronous HTTP client for the remote
//!   directory service
//! - [`memory::InMemoryDirectory`]: local predicate interpreter used by
//!   tests, benchmarks and the CLI's fixture mode

pub mod memory;
pub mod rest;

use crate::error::DirectoryError;
use crate::group::GroupRecord;
use crate::query::Predicate;
use crate::scope::Scope;

/// Result type for directory operations.
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// One page of search results, plus the total match count across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPage {
    pub records: Vec<GroupRecord>,
    pub total: usize,
}

/// How many matches a search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    /// Every match, unpaged. Used for batched key resolution, where the
    /// result is bounded by the number of distinct keys requested rather
    /// than by display concerns. Rendered as the wire's `-1` sentinel.
    All,
    /// At most this many records per page.
    Max(u32),
}

/// Page selection for a search. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub limit: PageLimit,
}

impl Paging {
    /// The first page, capped at `limit` records.
    pub fn first(limit: u32) -> Self {
        Self {
            page: 1,
            limit: PageLimit::Max(limit),
        }
    }

    /// All matches, unpaged.
    pub fn all() -> Self {
        Self {
            page: 1,
            limit: PageLimit::All,
        }
    }
}

/// A sortable group field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Key,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Key => "key",
        }
    }
}

/// Sort order of returned records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub field: SortField,
    pub ascending: bool,
}

impl SortBy {
    /// Name ascending, the order every reconciliation query uses.
    pub fn name_ascending() -> Self {
        Self {
            field: SortField::Name,
            ascending: true,
        }
    }
}

/// Remote, predicate-based, paginated group search.
///
/// `scope` names the realm the search runs in; how the predicate constrains
/// results within that scope (in particular, what "assignable" means) is the
/// directory's business. Calls are synchronous blocking round-trips with an
/// implementation-configured timeout; this crate never retries on its own.
pub trait GroupDirectory {
    fn search(
        &self,
        scope: &Scope,
        predicate: &Predicate,
        paging: Paging,
        sort: SortBy,
    ) -> DirectoryResult<GroupPage>;
}

impl<D: GroupDirectory + ?Sized> GroupDirectory for &D {
    fn search(
        &self,
        scope: &Scope,
        predicate: &Predicate,
        paging: Paging,
        sort: SortBy,
    ) -> DirectoryResult<GroupPage> {
        (**self).search(scope, predicate, paging, sort)
    }
}

impl<D: GroupDirectory + ?Sized> GroupDirectory for Box<D> {
    fn search(
        &self,
        scope: &Scope,
        predicate: &Predicate,
        paging: Paging,
        sort: SortBy,
    ) -> DirectoryResult<GroupPage> {
        (**self).search(scope, predicate, paging, sort)
    }
}

impl<D: GroupDirectory + ?Sized> GroupDirectory for std::sync::Arc<D> {
    fn search(
        &self,
        scope: &Scope,
        predicate: &Predicate,
        paging: Paging,
        sort: SortBy,
    ) -> DirectoryResult<GroupPage> {
        (**self).search(scope, predicate, paging, sort)
    }
}
