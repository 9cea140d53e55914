//! Crate configuration, loadable from TOML.
//!
//! ```toml
//! [directory]
//! base_url = "http://127.0.0.1:8080"
//! timeout_secs = 30
//!
//! [session]
//! candidate_cap = 30
//! root_scope = "/"
//! ```
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Values that serde cannot reject on its own are
//! checked by [`RollcallConfig::validate`] at load time.

use std::path::Path;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scope::Scope;

/// Errors from configuration loading and validation.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(rollcall::config::read),
        help("Ensure the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}")]
    #[diagnostic(
        code(rollcall::config::parse),
        help("Check the TOML syntax and the scope paths in the file.")
    )]
    Parse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(rollcall::config::invalid),
        help("Fix the offending value; see the field docs on RollcallConfig.")
    )]
    Invalid { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration: one `[directory]` and one `[session]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollcallConfig {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Connection settings for the remote group directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the directory service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-call timeout for directory round-trips, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Settings for one reconciliation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum candidate-list cardinality. The candidate view is a sampling
    /// of assignable groups, not an enumeration.
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: u32,
    /// The scope dynamic membership is resolved from.
    #[serde(default = "default_root_scope")]
    pub root_scope: Scope,
    /// When set, reconciliation and selection ignore the subject's scope and
    /// use this one. Template editing pins the root scope this way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_scope: Option<Scope>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_candidate_cap() -> u32 {
    30
}
fn default_root_scope() -> Scope {
    Scope::root()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            candidate_cap: default_candidate_cap(),
            root_scope: default_root_scope(),
            pinned_scope: None,
        }
    }
}

impl SessionConfig {
    /// Pin reconciliation to the root scope (template editing).
    pub fn pinned_to_root(mut self) -> Self {
        self.pinned_scope = Some(self.root_scope.clone());
        self
    }

    /// The scope a reconciliation or selection pass actually runs in.
    pub fn effective_scope<'a>(&'a self, subject_scope: &'a Scope) -> &'a Scope {
        self.pinned_scope.as_ref().unwrap_or(subject_scope)
    }
}

impl RollcallConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: RollcallConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the serde defaults cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.directory.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "directory.base_url must not be empty".into(),
            });
        }
        if self.directory.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "directory.timeout_secs must be at least 1".into(),
            });
        }
        if self.session.candidate_cap == 0 {
            return Err(ConfigError::Invalid {
                message: "session.candidate_cap must be at least 1".into(),
            });
        }
        Ok(())
    }
}
