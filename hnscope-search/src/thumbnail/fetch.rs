//! Size-capped page fetching through the relay proxy.
//!
//! Only the head of a page is wanted: the request asks for the first
//! `max_fetch_bytes` bytes with a `Range` header, and the body reader
//! stops at the same cap in case the proxy ignores the header.

use crate::config::ThumbnailConfig;
use crate::error::SearchError;
use crate::http;

/// Starting body buffer size; larger caps grow the buffer as chunks arrive.
const INITIAL_BODY_CAPACITY: usize = 8 * 1024;

/// Something that can fetch the leading bytes of a page.
///
/// [`ProxyFetcher`] is the production implementation. Tests substitute
/// canned HTML or failures.
pub trait PageFetcher: Send + Sync {
    /// Fetch the beginning of the page at `url`, decoded as text.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the request fails, the status is
    /// not 2xx, or the body cannot be read.
    fn fetch_head(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, SearchError>> + Send;
}

/// Fetches pages through the configured relay proxy.
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: reqwest::Client,
    proxy_base_url: String,
    max_fetch_bytes: usize,
    range_header: String,
}

impl ProxyFetcher {
    /// Build a fetcher for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the config is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ThumbnailConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(config.timeout_seconds, config.user_agent.as_deref())?;
        Ok(Self {
            client,
            proxy_base_url: config.proxy_base_url.clone(),
            max_fetch_bytes: config.max_fetch_bytes,
            range_header: config.range_header(),
        })
    }

    /// The proxied request URL: the target appended verbatim to the proxy base.
    pub fn proxied_url(&self, url: &str) -> String {
        format!("{}{}", self.proxy_base_url, url)
    }
}

impl PageFetcher for ProxyFetcher {
    async fn fetch_head(&self, url: &str) -> Result<String, SearchError> {
        tracing::trace!(url, "proxy fetch");

        let mut response = self
            .client
            .get(self.proxied_url(url))
            .header(reqwest::header::RANGE, &self.range_header)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("proxy request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("proxy HTTP error: {e}")))?;

        let mut body: Vec<u8> =
            Vec::with_capacity(self.max_fetch_bytes.min(INITIAL_BODY_CAPACITY));
        while body.len() < self.max_fetch_bytes {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| SearchError::Http(format!("proxy response read failed: {e}")))?;
            let Some(chunk) = chunk else {
                break;
            };
            let remaining = self.max_fetch_bytes - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
        }

        tracing::trace!(bytes = body.len(), "proxy response received");

        // The cut may land inside a multi-byte character.
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
