//! Thread-safe session façade over reconciler and selector.
//!
//! A [`MembershipSession`] is the shared entry point a server or UI holds
//! for one editing context. The reconciler (and with it the cache) sits
//! behind a mutex that is held across the whole resolution pass, so
//! concurrent reconciliations for the same scope collapse into one
//! directory round and cache readers never observe a half-written snapshot.

use std::sync::{Arc, Mutex};

use crate::config::SessionConfig;
use crate::directory::GroupDirectory;
use crate::error::RollcallResult;
use crate::group::GroupRecord;
use crate::reconcile::{MembershipReconciler, MembershipView, ReconcileResult};
use crate::scope::Scope;
use crate::select::CandidateSelector;
use crate::subject::HasGroupMemberships;

/// Shared membership session: one cache, one directory handle, any number
/// of callers.
pub struct MembershipSession<D> {
    reconciler: Mutex<MembershipReconciler<Arc<D>>>,
    selector: CandidateSelector<Arc<D>>,
}

impl<D: GroupDirectory> MembershipSession<D> {
    pub fn new(directory: D, config: SessionConfig) -> Self {
        let directory = Arc::new(directory);
        let selector = CandidateSelector::new(Arc::clone(&directory), config.clone());
        let reconciler = Mutex::new(MembershipReconciler::new(directory, config));
        Self {
            reconciler,
            selector,
        }
    }

    /// Reconcile the subject's membership views.
    ///
    /// See [`MembershipReconciler::reconcile`]. The lock is held for the
    /// full pass, including the directory calls.
    pub fn reconcile<S>(&self, subject: &mut S) -> ReconcileResult<MembershipView>
    where
        S: HasGroupMemberships + ?Sized,
    {
        self.reconciler.lock().unwrap().reconcile(subject)
    }

    /// Search candidates by name filter. See [`CandidateSelector::search`].
    pub fn search(
        &self,
        subject_scope: &Scope,
        filter: &str,
    ) -> RollcallResult<Vec<GroupRecord>> {
        let reconciler = self.reconciler.lock().unwrap();
        self.selector
            .search(subject_scope, reconciler.cache(), filter)
    }

    /// Drop the cached snapshot.
    pub fn invalidate(&self) {
        self.reconciler.lock().unwrap().invalidate();
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

    #[test]
    fn wildcard_search_sees_the_reconciled_snapshot() {
        let directory = InMemoryDirectory::new(vec![GroupRecord::new(
            "k-ops",
            "Ops",
            scope("/org"),
            true,
        )]);
        let session = MembershipSession::new(directory, SessionConfig::default());
        let mut subject = SubjectProfile::new("u-1", scope("/org"));

        // Cold cache: the wildcard has nothing to show yet.
        assert!(session.search(&scope("/org"), "*").unwrap().is_empty());

        session.reconcile(&mut subject).unwrap();
        let hits = session.search(&scope("/org"), "*").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ops");
    }

    #[test]
    fn invalidate_empties_the_wildcard_view() {
        let directory = InMemoryDirectory::new(vec![GroupRecord::new(
            "k-ops",
            "Ops",
            scope("/org"),
            true,
        )]);
        let session = MembershipSession::new(directory, SessionConfig::default());
        let mut subject = SubjectProfile::new("u-1", scope("/org"));

        session.reconcile(&mut subject).unwrap();
        session.invalidate();
        assert!(session.search(&scope("/org"), "*").unwrap().is_empty());
    }
}
