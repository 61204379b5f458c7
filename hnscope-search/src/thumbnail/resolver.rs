//! Single-URL thumbnail resolution.
//!
//! Fallback chain, first match wins:
//!
//! 1. `og:image` meta tag
//! 2. `twitter:image` meta tag
//! 3. favicon service URL built from the page hostname
//!
//! Every failure along the way (fetch error, non-2xx, URL without a
//! hostname) is logged and turns into "no thumbnail". Nothing is retried.

use url::Url;

use crate::config::ThumbnailConfig;
use crate::error::SearchError;
use crate::types::{Thumbnail, ThumbnailSource};

use super::fetch::{PageFetcher, ProxyFetcher};
use super::meta::extract_meta_image;

/// Resolves a page URL to an image URL, or nothing.
///
/// Implementations never fail; "no image" and "could not tell" are both
/// `None`. The cache manager depends on this trait rather than on
/// [`ThumbnailResolver`] directly.
pub trait ThumbnailLookup: Send + Sync {
    /// Resolve `url` to an image URL.
    fn resolve(&self, url: &str) -> impl std::future::Future<Output = Option<String>> + Send;
}

/// Fetch-parse-fallback resolver. Holds no per-URL state.
#[derive(Debug, Clone)]
pub struct ThumbnailResolver<F = ProxyFetcher> {
    fetcher: F,
    favicon_base_url: String,
}

impl ThumbnailResolver<ProxyFetcher> {
    /// Build a resolver that fetches through the configured proxy.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid config, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ThumbnailConfig) -> Result<Self, SearchError> {
        Ok(Self::with_fetcher(
            ProxyFetcher::new(config)?,
            config.favicon_base_url.clone(),
        ))
    }
}

impl<F: PageFetcher> ThumbnailResolver<F> {
    /// Build a resolver around any [`PageFetcher`].
    pub fn with_fetcher(fetcher: F, favicon_base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            favicon_base_url: favicon_base_url.into(),
        }
    }

    /// Resolve `url`, keeping track of which fallback step matched.
    ///
    /// Blank input returns `None` without touching the network. Otherwise
    /// exactly one fetch is made.
    pub async fn resolve_thumbnail(&self, url: &str) -> Option<Thumbnail> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }

        match self.try_resolve(url).await {
            Ok(thumbnail) => {
                tracing::debug!(url, source = %thumbnail.source, "thumbnail resolved");
                Some(thumbnail)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "thumbnail lookup failed");
                None
            }
        }
    }

    async fn try_resolve(&self, url: &str) -> Result<Thumbnail, SearchError> {
        let html = self.fetcher.fetch_head(url).await?;

        if let Some(image) = extract_meta_image(&html) {
            return Ok(Thumbnail {
                url: image.url,
                source: image.source,
            });
        }

        Ok(Thumbnail {
            url: favicon_url(&self.favicon_base_url, url)?,
            source: ThumbnailSource::Favicon,
        })
    }
}

impl<F: PageFetcher> ThumbnailLookup for ThumbnailResolver<F> {
    async fn resolve(&self, url: &str) -> Option<String> {
        self.resolve_thumbnail(url).await.map(|thumbnail| thumbnail.url)
    }
}

/// Favicon service URL for the hostname of `page_url`.
///
/// # Errors
///
/// Returns [`SearchError::InvalidUrl`] if `page_url` is not an absolute
/// URL or has no hostname.
pub fn favicon_url(favicon_base_url: &str, page_url: &str) -> Result<String, SearchError> {
    let parsed = Url::parse(page_url)
        .map_err(|e| SearchError::InvalidUrl(format!("{page_url}: {e}")))?;
    let host = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| SearchError::InvalidUrl(format!("{page_url}: no hostname")))?;
    Ok(format!("{favicon_base_url}{host}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FAVICON_BASE: &str = "https://icon.horse/icon/";

    /// Serves canned bodies per URL; unknown URLs fail like a dead proxy.
    #[derive(Default)]
    struct CannedFetcher {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl CannedFetcher {
        fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_owned(), html.to_owned());
            self
        }
    }

    impl PageFetcher for CannedFetcher {
        async fn fetch_head(&self, url: &str) -> Result<String, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| SearchError::Http(format!("connection reset: {url}")))
        }
    }

    fn resolver(fetcher: CannedFetcher) -> ThumbnailResolver<CannedFetcher> {
        ThumbnailResolver::with_fetcher(fetcher, FAVICON_BASE)
    }

    #[tokio::test]
    async fn blank_url_makes_no_request() {
        let r = resolver(CannedFetcher::default());
        for input in ["", "   ", "\t\n"] {
            assert!(r.resolve(input).await.is_none());
        }
        assert_eq!(r.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn og_image_preferred() {
        let r = resolver(CannedFetcher::default().with_page(
            "https://a.example/post",
            r#"<meta name="twitter:image" content="https://img/tw.png">
               <meta property="og:image" content="https://img/og.png">"#,
        ));
        let thumb = r
            .resolve_thumbnail("https://a.example/post")
            .await
            .expect("resolved");
        assert_eq!(thumb.url, "https://img/og.png");
        assert_eq!(thumb.source, ThumbnailSource::OpenGraph);
        assert_eq!(r.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn twitter_image_when_no_og() {
        let r = resolver(CannedFetcher::default().with_page(
            "https://a.example/post",
            r#"<meta name="twitter:image" content="https://img/tw.png">"#,
        ));
        assert_eq!(
            r.resolve("https://a.example/post").await.as_deref(),
            Some("https://img/tw.png")
        );
    }

    #[tokio::test]
    async fn favicon_when_no_meta() {
        let r = resolver(
            CannedFetcher::default()
                .with_page("https://blog.example.org/2024/post", "<title>x</title>"),
        );
        let thumb = r
            .resolve_thumbnail("https://blog.example.org/2024/post")
            .await
            .expect("resolved");
        assert_eq!(thumb.url, "https://icon.horse/icon/blog.example.org");
        assert_eq!(thumb.source, ThumbnailSource::Favicon);
    }

    #[tokio::test]
    async fn fetch_failure_yields_none() {
        let r = resolver(CannedFetcher::default());
        assert!(r.resolve("https://down.example/").await.is_none());
        assert_eq!(r.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_url_at_favicon_step_yields_none() {
        let r = resolver(
            CannedFetcher::default()
                .with_page("not a url", "<html></html>")
                .with_page("mailto:someone@example.com", "<html></html>"),
        );
        assert!(r.resolve("not a url").await.is_none());
        assert!(r.resolve("mailto:someone@example.com").await.is_none());
    }

    #[tokio::test]
    async fn surrounding_whitespace_trimmed_before_fetch() {
        let r = resolver(CannedFetcher::default().with_page(
            "https://a.example/",
            r#"<meta property="og:image" content="x.png">"#,
        ));
        assert_eq!(r.resolve("  https://a.example/ ").await.as_deref(), Some("x.png"));
    }

    #[test]
    fn favicon_url_uses_hostname_only() {
        assert_eq!(
            favicon_url(FAVICON_BASE, "https://Sub.Example.com:8443/a/b?c=d#e").expect("url"),
            "https://icon.horse/icon/sub.example.com"
        );
    }

    #[test]
    fn favicon_url_rejects_relative_and_hostless() {
        assert!(matches!(
            favicon_url(FAVICON_BASE, "/item?id=1"),
            Err(SearchError::InvalidUrl(_))
        ));
        assert!(matches!(
            favicon_url(FAVICON_BASE, "data:text/plain,hi"),
            Err(SearchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThumbnailResolver>();
    }

    #[tokio::test]
    #[ignore] // Live test: run with `cargo test -- --ignored`
    async fn live_resolve() {
        let r = ThumbnailResolver::new(&ThumbnailConfig::default()).expect("resolver");
        let thumb = r.resolve("https://www.rust-lang.org/").await;
        assert!(thumb.is_some());
    }
}
