//! Client for the Hacker News search API (Algolia).
//!
//! Queries `search_by_date`, restricted to stories, newest first, with a
//! fixed page size. There is no pagination and no retry.

use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::tags::TagList;
use crate::types::{Hit, SearchResponse};

/// Search API client.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the config is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(config.timeout_seconds, None)?;
        Ok(Self { client, config })
    }

    /// Query the index with all `tags` ANDed together.
    ///
    /// An empty tag list returns no hits without a request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] on transport failure or a non-2xx
    /// status, and [`SearchError::Parse`] if the body is not the expected JSON.
    pub async fn search(&self, tags: &TagList) -> Result<Vec<Hit>, SearchError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let query = tags.query();
        let url = build_search_url(&self.config, &query)?;
        tracing::debug!(query = %query, "search request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("search request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("search HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("search response read failed: {e}")))?;

        let hits = parse_search_response(&body)?;
        tracing::debug!(count = hits.len(), "search hits parsed");
        Ok(hits)
    }
}

/// Build the `search_by_date` URL for `query`.
pub(crate) fn build_search_url(config: &SearchConfig, query: &str) -> Result<Url, SearchError> {
    let base = config.api_base_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}/search_by_date"))
        .map_err(|e| SearchError::Config(format!("invalid api_base_url: {e}")))?;
    url.query_pairs_mut()
        .append_pair("query", query)
        .append_pair("tags", "story")
        .append_pair("hitsPerPage", &config.hits_per_page.to_string());
    Ok(url)
}

/// Parse a search API response body into hits.
///
/// Extracted as a separate function for testability with fixture JSON.
pub(crate) fn parse_search_response(body: &str) -> Result<Vec<Hit>, SearchError> {
    serde_json::from_str::<SearchResponse>(body)
        .map(|response| response.hits)
        .map_err(|e| SearchError::Parse(format!("invalid search response: {e}")))
}
