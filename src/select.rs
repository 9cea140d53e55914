//! Candidate search over the assignable-group sampling.
//!
//! A [`CandidateSelector`] answers interactive "which groups could this
//! subject join" lookups. The unfiltered case (`"*"` or an empty string) is
//! answered purely from the reconciliation cache, so repeated wildcard
//! lookups cost nothing. Any concrete name filter is validated locally and
//! then always sent to the directory; the cached sampling is capped and is
//! not a complete index of assignable names.

use crate::cache::ReconciliationCache;
use crate::config::SessionConfig;
use crate::directory::{GroupDirectory, Paging, SortBy};
use crate::error::RollcallResult;
use crate::group::GroupRecord;
use crate::query;
use crate::scope::Scope;

/// Filtered candidate lookup sharing a reconciler's cached snapshot.
pub struct CandidateSelector<D> {
    directory: D,
    config: SessionConfig,
}

impl<D: GroupDirectory> CandidateSelector<D> {
    pub fn new(directory: D, config: SessionConfig) -> Self {
        Self { directory, config }
    }

    /// Look up assignable groups whose name matches `filter`.
    ///
    /// `"*"` and the empty string mean "no filter": the cached candidate
    /// sampling for the subject's scope is returned as-is, without touching
    /// the directory, and a cold cache yields an empty list rather than an
    /// implicit reload. Anything else is validated, then queried fresh with
    /// the same cap and ordering the candidate sampling uses.
    pub fn search(
        &self,
        subject_scope: &Scope,
        cache: &ReconciliationCache,
        filter: &str,
    ) -> RollcallResult<Vec<GroupRecord>> {
        let scope = self.config.effective_scope(subject_scope);

        if query::is_unfiltered(filter) {
            let candidates = cache
                .get(scope)
                .map(|view| view.candidates.clone())
                .unwrap_or_default();
            tracing::debug!(
                scope = %scope,
                candidates = candidates.len(),
                "wildcard search answered from cache"
            );
            return Ok(candidates);
        }

        let predicate = query::name_filter(filter)?;
        let page = self.directory.search(
            scope,
            &predicate,
            Paging::first(self.config.candidate_cap),
            SortBy::name_ascending(),
        )?;
        let mut records = page.records;
        records.truncate(self.config.candidate_cap as usize);
        tracing::debug!(
            scope = %scope,
            filter,
            matched = records.len(),
            total = page.total,
            "filtered candidate search"
        );
        Ok(records)
    }
}
