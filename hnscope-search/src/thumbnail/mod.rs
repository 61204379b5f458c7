//! Thumbnail resolution: size-capped fetch, metadata extraction, fallback.

pub mod fetch;
pub mod meta;
pub mod resolver;
pub mod url_normalize;

pub use fetch::{PageFetcher, ProxyFetcher};
pub use meta::{extract_meta_image, MetaImage};
pub use resolver::{favicon_url, ThumbnailLookup, ThumbnailResolver};
