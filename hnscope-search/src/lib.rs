//! # hnscope-search
//!
//! Hacker News story search with best-effort thumbnails for result links.
//!
//! ## Design
//!
//! - [`SearchClient`] queries the Algolia HN API with the user's tags ANDed
//!   together, newest stories first
//! - [`ThumbnailResolver`] fetches only the first few KB of a linked page
//!   through a relay proxy and picks `og:image`, then `twitter:image`, then
//!   a favicon-service URL for the page host
//! - [`CacheManager`] keeps a bounded, insertion-ordered URL → image map in
//!   a [`KeyValueStore`] and only resolves URLs it has not seen before
//! - Failures degrade to "no results" or "no thumbnail"; the resolver and
//!   cache manager never return errors
//!
//! ## Privacy
//!
//! - Page URLs and queries are logged only at debug/trace level
//! - Nothing is sent anywhere except the search API and the fetch proxy

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod search;
pub mod storage;
pub mod tags;
pub mod thumbnail;
pub mod types;

pub use cache::{CacheManager, ThumbnailMap};
pub use config::{SearchConfig, ThumbnailConfig};
pub use error::{Result, SearchError};
pub use search::SearchClient;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use tags::TagList;
pub use thumbnail::{ThumbnailLookup, ThumbnailResolver};
pub use types::{Hit, Thumbnail, ThumbnailSource};

/// Resolve one page URL to a thumbnail with the default configuration.
///
/// Convenience wrapper around [`ThumbnailResolver::resolve_thumbnail`].
/// Returns `None` for blank input, fetch failures, and URLs without a
/// hostname.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// if let Some(thumb) = hnscope_search::resolve_thumbnail("https://www.rust-lang.org/").await {
///     println!("{} ({})", thumb.url, thumb.source);
/// }
/// # }
/// ```
pub async fn resolve_thumbnail(url: &str) -> Option<Thumbnail> {
    match ThumbnailResolver::new(&ThumbnailConfig::default()) {
        Ok(resolver) => resolver.resolve_thumbnail(url).await,
        Err(e) => {
            tracing::warn!(error = %e, "cannot build thumbnail resolver");
            None
        }
    }
}
