//! Scope-keyed memoization of reconciled membership views.
//!
//! One [`CacheEntry`] lives at a time: the cached snapshot is valid exactly
//! while the subject's scope matches the entry's recorded scope
//! (ASCII-case-insensitively), and any scope change discards the whole
//! entry. Invalidation is deliberately coarse: the scope determines the
//! entire assignability predicate, so no part of an old snapshot can be
//! trusted in a new scope.

use crate::reconcile::MembershipView;
use crate::scope::Scope;

/// A reconciled snapshot together with the scope it is valid in.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub scope: Scope,
    pub view: MembershipView,
}

/// Single-slot, scope-keyed cache of the last reconciled snapshot.
#[derive(Debug, Default)]
pub struct ReconciliationCache {
    entry: Option<CacheEntry>,
}

impl ReconciliationCache {
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// The stored view, if it is still valid for `scope`.
    pub fn get(&self, scope: &Scope) -> Option<&MembershipView> {
        self.entry
            .as_ref()
            .filter(|entry| entry.scope.matches(scope))
            .map(|entry| &entry.view)
    }

    /// Store a fresh snapshot, discarding any previous entry unconditionally.
    pub fn put(&mut self, entry: CacheEntry) {
        self.entry = Some(entry);
    }

    /// Drop the live entry, forcing the next reconciliation to resolve.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Scope of the live entry, if any.
    pub fn live_scope(&self) -> Option<&Scope> {
        self.entry.as_ref().map(|entry| &entry.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(path: &str) -> Scope {
        Scope::new(path).unwrap()
    }

    fn entry(path: &str) -> CacheEntry {
        CacheEntry {
            scope: scope(path),
            view: MembershipView::default(),
        }
    }

    #[test]
    fn empty_cache_misses() {
        let cache = ReconciliationCache::new();
        assert!(cache.get(&scope("/org")).is_none());
        assert!(cache.live_scope().is_none());
    }

    #[test]
    fn hit_requires_a_matching_scope() {
        let mut cache = ReconciliationCache::new();
        cache.put(entry("/org/a"));

        assert!(cache.get(&scope("/org/a")).is_some());
        assert!(cache.get(&scope("/org/b")).is_none());
        assert_eq!(cache.live_scope().unwrap().as_str(), "/org/a");
    }

    #[test]
    fn scope_comparison_ignores_ascii_case() {
        let mut cache = ReconciliationCache::new();
        cache.put(entry("/Org/Accounting"));
        assert!(cache.get(&scope("/org/accounting")).is_some());
    }

    #[test]
    fn put_replaces_the_previous_entry_unconditionally() {
        let mut cache = ReconciliationCache::new();
        cache.put(entry("/org/a"));
        cache.put(entry("/org/b"));

        assert!(cache.get(&scope("/org/a")).is_none());
        assert!(cache.get(&scope("/org/b")).is_some());
    }

    #[test]
    fn invalidate_clears_the_slot() {
        let mut cache = ReconciliationCache::new();
        cache.put(entry("/org/a"));
        cache.invalidate();
        assert!(cache.get(&scope("/org/a")).is_none());
    }
}
