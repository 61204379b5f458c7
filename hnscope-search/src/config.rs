//! Search and thumbnail configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the remote search API request, and
//! [`ThumbnailConfig`] controls the proxy fetch, favicon fallback, and
//! cache bound. Both deserialize with `serde(default)` so a partial
//! config file only overrides what it names.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;

/// Default number of hits requested per query.
pub const DEFAULT_HITS_PER_PAGE: usize = 15;

/// Default byte cap for a proxied page fetch.
pub const DEFAULT_MAX_FETCH_BYTES: usize = 6144;

/// Largest accepted `max_fetch_bytes`. Only the page head is needed.
pub const MAX_FETCH_BYTES_LIMIT: usize = 1024 * 1024;

/// Default number of thumbnail entries retained across sessions.
pub const DEFAULT_MAX_CACHED_ENTRIES: usize = 50;

/// Configuration for queries against the search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the search API; `search_by_date` is appended.
    pub api_base_url: String,
    /// Number of hits requested per query.
    pub hits_per_page: usize,
    /// HTTP request timeout in seconds. `None` leaves the client default.
    pub timeout_seconds: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://hn.algolia.com/api/v1".into(),
            hits_per_page: DEFAULT_HITS_PER_PAGE,
            timeout_seconds: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.hits_per_page == 0 {
            return Err(SearchError::Config(
                "hits_per_page must be greater than 0".into(),
            ));
        }
        validate_timeout(self.timeout_seconds)?;
        validate_base_url("api_base_url", &self.api_base_url)
    }
}

/// Configuration for thumbnail resolution and caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Relay that fetches the target URL appended to it verbatim.
    pub proxy_base_url: String,
    /// Favicon service prefix; the page hostname is appended.
    pub favicon_base_url: String,
    /// Upper bound on bytes read from a proxied page.
    pub max_fetch_bytes: usize,
    /// Number of entries the persisted thumbnail map may hold.
    pub max_cached_entries: usize,
    /// HTTP request timeout in seconds. `None` leaves the client default,
    /// so one hanging fetch stalls the rest of its batch.
    pub timeout_seconds: Option<u64>,
    /// Custom User-Agent string. If `None`, one is picked from a built-in
    /// list of browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: "https://corsproxy.basdanny.workers.dev/".into(),
            favicon_base_url: "https://icon.horse/icon/".into(),
            max_fetch_bytes: DEFAULT_MAX_FETCH_BYTES,
            max_cached_entries: DEFAULT_MAX_CACHED_ENTRIES,
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

impl ThumbnailConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_fetch_bytes` must be in `1..=MAX_FETCH_BYTES_LIMIT`
    /// - `max_cached_entries` must be greater than 0
    /// - `timeout_seconds`, when set, must be greater than 0
    /// - both base URLs must parse as absolute URLs
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_fetch_bytes == 0 {
            return Err(SearchError::Config(
                "max_fetch_bytes must be greater than 0".into(),
            ));
        }
        if self.max_fetch_bytes > MAX_FETCH_BYTES_LIMIT {
            return Err(SearchError::Config(format!(
                "max_fetch_bytes must be at most {MAX_FETCH_BYTES_LIMIT}"
            )));
        }
        if self.max_cached_entries == 0 {
            return Err(SearchError::Config(
                "max_cached_entries must be greater than 0".into(),
            ));
        }
        validate_timeout(self.timeout_seconds)?;
        validate_base_url("proxy_base_url", &self.proxy_base_url)?;
        validate_base_url("favicon_base_url", &self.favicon_base_url)
    }

    /// The `Range` header value asking for the first `max_fetch_bytes` bytes.
    pub fn range_header(&self) -> String {
        format!("bytes=0-{}", self.max_fetch_bytes.saturating_sub(1))
    }
}

fn validate_timeout(timeout_seconds: Option<u64>) -> Result<(), SearchError> {
    if timeout_seconds == Some(0) {
        return Err(SearchError::Config(
            "timeout_seconds must be greater than 0 when set".into(),
        ));
    }
    Ok(())
}

fn validate_base_url(field: &str, value: &str) -> Result<(), SearchError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| SearchError::Config(format!("{field} is not a valid URL: {e}")))
}
