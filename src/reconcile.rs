//! Membership reconciliation: the orchestration core.
//!
//! [`MembershipReconciler::reconcile`] refreshes the three views of a
//! subject's group association (candidate sampling, static memberships and
//! dynamic membership names) against the authoritative directory, in at
//! most one batched directory call per view:
//!
//! 1. **Candidates**: assignable groups within the subject's scope, first
//!    page, capped, name ascending.
//! 2. **Static resolution**: one query combining the assignability filter
//!    with an OR over every referenced key. References the directory does
//!    not report back are removed from the subject; this pruning is the only
//!    persistent mutation this crate performs.
//! 3. **Dynamic resolution**: one query at the root scope, OR over the
//!    dynamic keys, no assignability filter. The subject's dynamic list is
//!    owned by whatever computed it and is never mutated here.
//!
//! Snapshots are cached keyed by scope; a matching scope returns the cached
//! view with zero directory calls. A failed candidates or static call fails
//! the pass as a whole, leaving both the previous snapshot and the subject
//! untouched. A failed dynamic call only degrades the view: static results
//! are still returned, with the failure carried in
//! [`MembershipView::dynamic_failure`].

use std::collections::HashMap;

use crate::cache::{CacheEntry, ReconciliationCache};
use crate::config::SessionConfig;
use crate::directory::{GroupDirectory, GroupPage, Paging, SortBy};
use crate::error::{DirectoryError, ReconcileError};
use crate::group::{GroupKey, GroupRecord};
use crate::query;
use crate::scope::Scope;
use crate::subject::HasGroupMemberships;

/// Result type for reconciliation.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;

/// One resolved static membership: the reference's key plus the display
/// name the directory reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMembership {
    pub key: GroupKey,
    pub name: String,
}

/// The reconciled triple of membership views.
#[derive(Debug, Clone, Default)]
pub struct MembershipView {
    /// Bounded sampling of assignable groups, sorted by name ascending.
    pub candidates: Vec<GroupRecord>,
    /// Resolved static memberships, in the subject's stored order.
    pub static_memberships: Vec<ResolvedMembership>,
    /// Display names of resolved dynamic memberships, name ascending.
    pub dynamic_names: Vec<String>,
    /// Set when dynamic resolution failed and `dynamic_names` is therefore
    /// empty. Dynamic names are advisory display data, so this does not fail
    /// the pass.
    pub dynamic_failure: Option<DirectoryError>,
}

/// Orchestrates reload, batched resolution and pruning for one subject
/// context.
pub struct MembershipReconciler<D> {
    directory: D,
    config: SessionConfig,
    cache: ReconciliationCache,
}

impl<D: GroupDirectory> MembershipReconciler<D> {
    pub fn new(directory: D, config: SessionConfig) -> Self {
        Self {
            directory,
            config,
            cache: ReconciliationCache::new(),
        }
    }

    /// The live cache, for selectors sharing this session's snapshot.
    pub fn cache(&self) -> &ReconciliationCache {
        &self.cache
    }

    /// Drop the cached snapshot, forcing the next call to resolve afresh.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Refresh the subject's membership views, pruning stale static
    /// references from the subject itself.
    ///
    /// Returns the cached snapshot without any directory call when the
    /// subject's scope (case-insensitively) matches the cached one.
    pub fn reconcile<S>(&mut self, subject: &mut S) -> ReconcileResult<MembershipView>
    where
        S: HasGroupMemberships + ?Sized,
    {
        let scope = self.config.effective_scope(subject.scope()).clone();
        if let Some(view) = self.cache.get(&scope) {
            tracing::debug!(
                subject = subject.subject_key(),
                scope = %scope,
                "membership views served from cache"
            );
            return Ok(view.clone());
        }

        tracing::info!(
            subject = subject.subject_key(),
            scope = %scope,
            "reconciling membership views"
        );

        let candidates = self.resolve_candidates(&scope)?;
        let static_memberships = self.resolve_static(subject, &scope)?;
        let (dynamic_names, dynamic_failure) = match self.resolve_dynamic(subject) {
            Ok(names) => (names, None),
            Err(ReconcileError::Directory(err)) => {
                tracing::warn!(
                    subject = subject.subject_key(),
                    error = %err,
                    "dynamic membership resolution failed, continuing with empty view"
                );
                (Vec::new(), Some(err))
            }
            Err(err) => return Err(err),
        };

        let view = MembershipView {
            candidates,
            static_memberships,
            dynamic_names,
            dynamic_failure,
        };
        self.cache.put(CacheEntry {
            scope,
            view: view.clone(),
        });
        Ok(view)
    }

    /// Candidate sampling: first page of assignable groups in scope.
    fn resolve_candidates(&self, scope: &Scope) -> ReconcileResult<Vec<GroupRecord>> {
        let GroupPage { mut records, total } = self.directory.search(
            scope,
            &query::candidates(),
            Paging::first(self.config.candidate_cap),
            SortBy::name_ascending(),
        )?;
        records.truncate(self.config.candidate_cap as usize);
        tracing::debug!(
            sampled = records.len(),
            total,
            "fetched assignable candidate sampling"
        );
        Ok(records)
    }

    /// Resolve every static reference in one batched call, fill display
    /// names, and remove references the directory no longer reports
    /// assignable in this scope.
    fn resolve_static<S>(
        &self,
        subject: &mut S,
        scope: &Scope,
    ) -> ReconcileResult<Vec<ResolvedMembership>>
    where
        S: HasGroupMemberships + ?Sized,
    {
        let keys: Vec<GroupKey> = subject
            .static_memberships()
            .iter()
            .map(|membership| membership.group_key.clone())
            .collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let predicate = query::static_resolution(&keys)?;
        let page =
            self.directory
                .search(scope, &predicate, Paging::all(), SortBy::name_ascending())?;
        let names: HashMap<GroupKey, String> = page
            .records
            .into_iter()
            .map(|group| (group.key, group.name))
            .collect();

        let mut resolved = Vec::with_capacity(keys.len());
        let references = subject.static_memberships_mut();
        references.retain_mut(|membership| match names.get(&membership.group_key) {
            Some(name) => {
                membership.group_name = Some(name.clone());
                resolved.push(ResolvedMembership {
                    key: membership.group_key.clone(),
                    name: name.clone(),
                });
                true
            }
            None => false,
        });
        let pruned = keys.len() - references.len();

        if pruned > 0 {
            tracing::info!(
                subject = subject.subject_key(),
                pruned,
                "pruned static references to groups not assignable in scope"
            );
        }
        Ok(resolved)
    }

    /// Resolve dynamic membership names in one batched call at root scope.
    fn resolve_dynamic<S>(&self, subject: &S) -> ReconcileResult<Vec<String>>
    where
        S: HasGroupMemberships + ?Sized,
    {
        let keys: Vec<GroupKey> = subject
            .dynamic_memberships()
            .iter()
            .map(|membership| membership.group_key.clone())
            .collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let predicate = query::dynamic_resolution(&keys)?;
        let page = self.directory.search(
            &self.config.root_scope,
            &predicate,
            Paging::all(),
            SortBy::name_ascending(),
        )?;
        Ok(page.records.into_iter().map(|group| group.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::memory::InMemoryDirectory;
    use crate::subject::SubjectProfile;

    fn scope(path: &str) -> Scope {
        Scope::new(path).unwrap()
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new(vec![
            GroupRecord::new("k-ops", "Ops", scope("/org"), true),
            GroupRecord::new("k-admins", "Admins", scope("/org"), true),
            GroupRecord::new("k-root", "Root Watchers", scope("/"), true),
            GroupRecord::new("k-dyn", "Compliance", scope("/org/audit"), true),
        ])
    }

    #[test]
    fn static_views_keep_the_subject_order() {
        let mut reconciler =
            MembershipReconciler::new(directory(), SessionConfig::default());
        let mut subject = SubjectProfile::new("u-1", scope("/org"))
            .with_static_membership("k-ops")
            .with_static_membership("k-admins");

        let view = reconciler.reconcile(&mut subject).unwrap();
        let names: Vec<&str> = view
            .static_memberships
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        // Subject order, not the directory's name-ascending order.
        assert_eq!(names, vec!["Ops", "Admins"]);
    }

    #[test]
    fn resolved_names_are_written_onto_the_subject() {
        let mut reconciler =
            MembershipReconciler::new(directory(), SessionConfig::default());
        let mut subject = SubjectProfile::new("u-1", scope("/org"))
            .with_static_membership("k-admins")
            .with_static_membership("k-gone");

        reconciler.reconcile(&mut subject).unwrap();

        assert_eq!(subject.static_memberships.len(), 1);
        assert_eq!(
            subject.static_memberships[0].group_name.as_deref(),
            Some("Admins")
        );
    }

    #[test]
    fn dynamic_names_resolve_from_root_without_assignability() {
        let mut reconciler =
            MembershipReconciler::new(directory(), SessionConfig::default());
        // k-dyn lives in /org/audit, outside the subject's own branch.
        let mut subject = SubjectProfile::new("u-1", scope("/org"))
            .with_dynamic_membership("k-dyn")
            .with_dynamic_membership("k-root")
            .with_dynamic_membership("k-vanished");

        let view = reconciler.reconcile(&mut subject).unwrap();
        assert_eq!(view.dynamic_names, vec!["Compliance", "Root Watchers"]);
        assert!(view.dynamic_failure.is_none());
        // The dynamic reference list itself is never touched.
        assert_eq!(subject.dynamic_memberships.len(), 3);
    }

    #[test]
    fn duplicate_static_references_all_resolve() {
        let mut reconciler =
            MembershipReconciler::new(directory(), SessionConfig::default());
        let mut subject = SubjectProfile::new("u-1", scope("/org"))
            .with_static_membership("k-ops")
            .with_static_membership("k-ops");

        let view = reconciler.reconcile(&mut subject).unwrap();
        assert_eq!(view.static_memberships.len(), 2);
        assert_eq!(subject.static_memberships.len(), 2);
    }

    #[test]
    fn pinned_scope_overrides_the_subjects_scope() {
        let config = SessionConfig::default().pinned_to_root();
        let mut reconciler = MembershipReconciler::new(directory(), config);
        let mut subject = SubjectProfile::new("u-1", scope("/org"));

        let view = reconciler.reconcile(&mut subject).unwrap();
        // Only groups assignable at the root itself qualify.
        let names: Vec<&str> = view.candidates.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Root Watchers"]);
    }
}
