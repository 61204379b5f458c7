//! Error types for the hnscope-search crate.
//!
//! These errors stay inside the crate's fallible helpers. The thumbnail
//! resolver and cache manager absorb them at their boundary and log them,
//! so callers of those two only ever see degraded results.

/// Errors that can occur while searching, fetching, or persisting.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to the search API or the fetch proxy failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A URL could not be parsed or has no hostname.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Reading or writing the key-value store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for hnscope-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
