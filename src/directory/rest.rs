//! REST client for a remote group directory.
//!
//! Rollcall does not own the wire protocol; this client renders searches
//! onto the directory's HTTP form: `GET {base}/groups` with `realm`, `fiql`,
//! `page`, `size` and `orderBy` query parameters, answered by a JSON page
//! `{"result": [...], "totalCount": n}`. Unpaged key-resolution requests are
//! rendered as `page=-1&size=-1`.

use std::time::Duration;

use serde::Deserialize;

use crate::config::DirectoryConfig;
use crate::error::DirectoryError;
use crate::group::GroupRecord;
use crate::query::Predicate;
use crate::scope::Scope;

use super::{DirectoryResult, GroupDirectory, GroupPage, PageLimit, Paging, SortBy};

/// Synchronous HTTP [`GroupDirectory`] client.
///
/// Every search is one blocking round-trip bounded by the agent's timeout.
/// Transport failures and non-2xx answers surface as
/// [`DirectoryError::Unavailable`]; answers that cannot be decoded as a
/// group page surface as [`DirectoryError::Protocol`]. No retries.
pub struct RestGroupDirectory {
    base_url: String,
    agent: ureq::Agent,
}

impl RestGroupDirectory {
    /// Connect to the directory at `base_url` with the given call timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// Build a client from the `[directory]` config table.
    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct WirePage {
    result: Vec<GroupRecord>,
    #[serde(rename = "totalCount")]
    total_count: usize,
}

fn wire_paging(paging: Paging) -> (i64, i64) {
    match paging.limit {
        PageLimit::All => (-1, -1),
        PageLimit::Max(limit) => (i64::from(paging.page), i64::from(limit)),
    }
}

fn wire_order(sort: SortBy) -> String {
    format!(
        "{} {}",
        sort.field.as_str(),
        if sort.ascending { "ASC" } else { "DESC" }
    )
}

impl GroupDirectory for RestGroupDirectory {
    fn search(
        &self,
        scope: &Scope,
        predicate: &Predicate,
        paging: Paging,
        sort: SortBy,
    ) -> DirectoryResult<GroupPage> {
        let url = format!("{}/groups", self.base_url);
        let (page, size) = wire_paging(paging);
        let fiql = predicate.to_fiql();
        tracing::debug!(realm = %scope, %fiql, page, size, "directory search");

        let response = self
            .agent
            .get(&url)
            .query("realm", scope.as_str())
            .query("fiql", &fiql)
            .query("page", &page.to_string())
            .query("size", &size.to_string())
            .query("orderBy", &wire_order(sort))
            .call()
            .map_err(|e| DirectoryError::Unavailable {
                message: e.to_string(),
            })?;

        let body: WirePage = response.into_json().map_err(|e| DirectoryError::Protocol {
            message: format!("failed to decode group page: {e}"),
        })?;
        Ok(GroupPage {
            records: body.result,
            total: body.total_count,
        })
    }
}
