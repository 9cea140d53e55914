//! Subjects and their membership reference lists.
//!
//! A subject (a user record being edited, say) is owned by the caller and
//! outlives this crate's session. Subject variants that support group
//! relationships implement [`HasGroupMemberships`]; variants that do not
//! simply never expose reconciliation. The reconciler reads identity and
//! scope through the trait and mutates only the static reference list, and
//! only by pruning.

use serde::{Deserialize, Serialize};

use crate::group::GroupKey;
use crate::scope::Scope;

/// An explicit group membership persisted on the subject.
///
/// The display name is advisory and filled in during reconciliation; only the
/// key is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticMembershipRef {
    pub group_key: GroupKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

impl StaticMembershipRef {
    /// Reference a group by key, with no resolved name yet.
    pub fn new(group_key: impl Into<GroupKey>) -> Self {
        Self {
            group_key: group_key.into(),
            group_name: None,
        }
    }
}

/// A group membership computed by the directory from attribute-matching
/// rules. Never persisted back to the subject and never pruned by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicMembershipRef {
    pub group_key: GroupKey,
}

impl DynamicMembershipRef {
    /// Reference a dynamically computed membership by group key.
    pub fn new(group_key: impl Into<GroupKey>) -> Self {
        Self {
            group_key: group_key.into(),
        }
    }
}

/// Capability interface for subjects that carry group memberships.
///
/// Implementations hand out their static reference list mutably; the
/// reconciler uses that access exclusively to fill display names and to
/// remove references the directory no longer reports as assignable.
pub trait HasGroupMemberships {
    /// Stable identifier of the subject, used in log events.
    fn subject_key(&self) -> &str;

    /// The scope the subject currently lives in.
    fn scope(&self) -> &Scope;

    /// Explicit memberships recorded on the subject, in their stored order.
    fn static_memberships(&self) -> &[StaticMembershipRef];

    /// Mutable access to the static reference list, for pruning and name
    /// resolution.
    fn static_memberships_mut(&mut self) -> &mut Vec<StaticMembershipRef>;

    /// Directory-computed memberships. Read-only here.
    fn dynamic_memberships(&self) -> &[DynamicMembershipRef];
}

/// A plain, serializable subject record.
///
/// This is the concrete subject type used by the CLI and by tests; callers
/// with their own subject representation implement [`HasGroupMemberships`]
/// directly instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub key: String,
    pub scope: Scope,
    #[serde(default)]
    pub static_memberships: Vec<StaticMembershipRef>,
    #[serde(default)]
    pub dynamic_memberships: Vec<DynamicMembershipRef>,
}

impl SubjectProfile {
    /// Create a subject with no membership references.
    pub fn new(key: impl Into<String>, scope: Scope) -> Self {
        Self {
            key: key.into(),
            scope,
            static_memberships: Vec::new(),
            dynamic_memberships: Vec::new(),
        }
    }

    /// Append a static membership reference (fixture helper).
    pub fn with_static_membership(mut self, group_key: impl Into<GroupKey>) -> Self {
        self.static_memberships.push(StaticMembershipRef::new(group_key));
        self
    }

    /// Append a dynamic membership reference (fixture helper).
    pub fn with_dynamic_membership(mut self, group_key: impl Into<GroupKey>) -> Self {
        self.dynamic_memberships.push(DynamicMembershipRef::new(group_key));
        self
    }
}

impl HasGroupMemberships for SubjectProfile {
    fn subject_key(&self) -> &str {
        &self.key
    }

    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn static_memberships(&self) -> &[StaticMembershipRef] {
        &self.static_memberships
    }

    fn static_memberships_mut(&mut self) -> &mut Vec<StaticMembershipRef> {
        &mut self.static_memberships
    }

    fn dynamic_memberships(&self) -> &[DynamicMembershipRef] {
        &self.dynamic_memberships
    }
}

/// Whether two static membership lists refer to different groups.
///
/// Compares group keys in order, ignoring resolved display names, so a
/// reconciliation that only filled in names does not count as a change.
/// Callers use this to flag edited membership lists.
pub fn memberships_changed(current: &[StaticMembershipRef], previous: &[StaticMembershipRef]) -> bool {
    if current.len() != previous.len() {
        return true;
    }
    current
        .iter()
        .zip(previous)
        .any(|(c, p)| c.group_key != p.group_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> SubjectProfile {
        SubjectProfile::new("u-1", Scope::new("/org").unwrap())
            .with_static_membership("g-1")
            .with_dynamic_membership("g-9")
    }

    #[test]
    fn profile_implements_the_capability_trait() {
        let mut s = subject();
        assert_eq!(s.subject_key(), "u-1");
        assert_eq!(s.scope().as_str(), "/org");
        assert_eq!(s.static_memberships().len(), 1);
        assert_eq!(s.dynamic_memberships().len(), 1);

        s.static_memberships_mut().clear();
        assert!(s.static_memberships().is_empty());
    }

    #[test]
    fn missing_reference_lists_default_to_empty() {
        let s: SubjectProfile =
            serde_json::from_str(r#"{"key": "u-2", "scope": "/"}"#).unwrap();
        assert!(s.static_memberships.is_empty());
        assert!(s.dynamic_memberships.is_empty());
    }

    #[test]
    fn change_detection_ignores_display_names() {
        let before = vec![StaticMembershipRef::new("g-1")];
        let mut after = before.clone();
        after[0].group_name = Some("Admins".into());
        assert!(!memberships_changed(&after, &before));
    }

    #[test]
    fn change_detection_sees_additions_and_reordering() {
        let a = vec![StaticMembershipRef::new("g-1"), StaticMembershipRef::new("g-2")];
        let b = vec![StaticMembershipRef::new("g-2"), StaticMembershipRef::new("g-1")];
        let c = vec![StaticMembershipRef::new("g-1")];

        assert!(memberships_changed(&a, &b));
        assert!(memberships_changed(&a, &c));
        assert!(!memberships_changed(&a, &a.clone()));
    }
}
