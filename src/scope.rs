//! Hierarchical scope (realm) identifiers.
//!
//! A [`Scope`] names the realm a subject currently lives in, e.g. `/` or
//! `/org/accounting`. The scope determines which groups are assignable to
//! the subject, so the reconciliation cache is keyed by it. Comparison for
//! cache validity is ASCII-case-insensitive, matching the directory's realm
//! semantics.

use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from scope construction.
#[derive(Debug, Error, Diagnostic)]
pub enum ScopeError {
    #[error("invalid scope path: \"{path}\"")]
    #[diagnostic(
        code(rollcall::scope::invalid_path),
        help(
            "Scopes are absolute realm paths: \"/\" for the root, or \
             \"/segment/segment\" with no trailing slash."
        )
    )]
    InvalidPath { path: String },

    #[error("invalid segment \"{segment}\" in scope path \"{path}\"")]
    #[diagnostic(
        code(rollcall::scope::invalid_segment),
        help(
            "Scope segments may contain only letters, digits, dots, \
             underscores and dashes."
        )
    )]
    InvalidSegment { path: String, segment: String },
}

/// Result type for scope operations.
pub type ScopeResult<T> = std::result::Result<T, ScopeError>;

static RE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap()
});

/// An absolute realm path, e.g. `/` or `/org/accounting`.
///
/// Construction validates the path; a `Scope` value is therefore always
/// well-formed. Derived equality is exact; use [`Scope::matches`] where the
/// directory's case-insensitive realm comparison is wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope(String);

impl Scope {
    /// The root scope, `/`, from which every group is reachable.
    pub fn root() -> Self {
        Scope("/".to_string())
    }

    /// Parse and validate an absolute realm path.
    pub fn new(path: impl Into<String>) -> ScopeResult<Self> {
        let path = path.into();
        if path == "/" {
            return Ok(Scope(path));
        }
        if !path.starts_with('/') || path.ends_with('/') {
            return Err(ScopeError::InvalidPath { path });
        }
        for segment in path[1..].split('/') {
            if !RE_SEGMENT.is_match(segment) {
                return Err(ScopeError::InvalidSegment {
                    path: path.clone(),
                    segment: segment.to_string(),
                });
            }
        }
        Ok(Scope(path))
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root scope.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Case-insensitive scope equality, as used for cache validity.
    pub fn matches(&self, other: &Scope) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Whether this scope is an ancestor of (or equal to) `other`.
    ///
    /// The root contains every scope. Segment comparison is
    /// case-insensitive, like [`Scope::matches`].
    pub fn contains(&self, other: &Scope) -> bool {
        if self.is_root() {
            return true;
        }
        let mut ancestors = self.segments();
        let mut descendants = other.segments();
        loop {
            match (ancestors.next(), descendants.next()) {
                (None, _) => return true,
                (Some(_), None) => return false,
                (Some(a), Some(d)) => {
                    if !a.eq_ignore_ascii_case(d) {
                        return false;
                    }
                }
            }
        }
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Scope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::new(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = ScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Scope::new(value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}
