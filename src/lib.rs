// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # rollcall
//!
//! Membership reconciliation and candidate caching against an external
//! group directory.
//!
//! ## Architecture
//!
//! - **Scopes** (`scope`): hierarchical realm paths, compared case-insensitively
//! - **Directory access** (`directory`): one `GroupDirectory` trait with REST and in-memory backends
//! - **Predicates** (`query`): typed search filters, rendered to FIQL on the wire
//! - **Reconciliation** (`reconcile`): batched resolution of the candidate, static and dynamic views
//! - **Caching** (`cache`): single-slot, scope-keyed snapshot reuse
//! - **Sessions** (`session`): mutex-guarded shared entry point for servers and UIs
//!
//! ## Library usage
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use rollcall::config::SessionConfig;
//! use rollcall::directory::rest::RestGroupDirectory;
//! use rollcall::scope::Scope;
//! use rollcall::session::MembershipSession;
//! use rollcall::subject::SubjectProfile;
//!
//! let directory = RestGroupDirectory::new("http://localhost:8080", Duration::from_secs(30));
//! let session = MembershipSession::new(directory, SessionConfig::default());
//!
//! let scope = Scope::new("/org/engineering").unwrap();
//! let mut subject = SubjectProfile::new("u-100", scope).with_static_membership("g-42");
//! let view = session.reconcile(&mut subject).unwrap();
//! println!("{} static memberships", view.static_memberships.len());
//! ```

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod group;
pub mod query;
pub mod reconcile;
pub mod scope;
pub mod select;
pub mod session;
pub mod subject;
