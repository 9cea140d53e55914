//! Diagnostic error types for the rollcall crate.
//!
//! Each subsystem defines its own error enum with miette `#[diagnostic]`
//! derives, providing error codes and help text. Remote failures and local
//! validation failures are kept distinct so callers can tell "the directory
//! is down" apart from "you sent me garbage" without string matching.

use miette::Diagnostic;
use thiserror::Error;

use crate::scope::ScopeError;

/// Top-level error type for the rollcall crate.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, sources) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum RollcallError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Convenience alias for functions returning rollcall results.
pub type RollcallResult<T> = std::result::Result<T, RollcallError>;

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Errors raised while building directory predicates. Always detected before
/// any network call is made.
#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("invalid name filter: \"{filter}\"")]
    #[diagnostic(
        code(rollcall::query::invalid_filter),
        help(
            "Name filters may contain only letters, digits, spaces, dots, \
             underscores, dashes and '@'. Use \"*\" (or an empty filter) for \
             the unfiltered candidate list."
        )
    )]
    InvalidFilter { filter: String },

    #[error("cannot build a key predicate from an empty key list")]
    #[diagnostic(
        code(rollcall::query::empty_key_list),
        help(
            "Key-resolution predicates OR together one equality clause per \
             key; provide at least one key, or skip the directory call \
             entirely when there is nothing to resolve."
        )
    )]
    EmptyKeyList,
}

// ---------------------------------------------------------------------------
// Directory errors
// ---------------------------------------------------------------------------

/// Errors surfaced by a [`GroupDirectory`](crate::directory::GroupDirectory)
/// implementation.
///
/// `Clone` because a dynamic-resolution failure is carried inside the cached
/// membership view and handed out with each snapshot clone.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum DirectoryError {
    #[error("directory unavailable: {message}")]
    #[diagnostic(
        code(rollcall::directory::unavailable),
        help(
            "The remote directory could not be reached or did not answer in \
             time. Check the base URL and the service's health; rollcall does \
             not retry on its own."
        )
    )]
    Unavailable { message: String },

    #[error("unexpected directory response: {message}")]
    #[diagnostic(
        code(rollcall::directory::protocol),
        help(
            "The directory answered, but the response could not be decoded. \
             This usually means a version mismatch between rollcall and the \
             directory service."
        )
    )]
    Protocol { message: String },
}

// ---------------------------------------------------------------------------
// Reconciliation errors
// ---------------------------------------------------------------------------

/// Errors from a reconciliation pass.
///
/// A failed candidates or static-resolution call fails the whole pass; the
/// previously cached snapshot (if any) and the subject are left untouched.
/// Dynamic-resolution failures never appear here: they degrade the returned
/// view instead (see
/// [`MembershipView::dynamic_failure`](crate::reconcile::MembershipView)).
#[derive(Debug, Error, Diagnostic)]
pub enum ReconcileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),
}
