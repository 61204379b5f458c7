//! Persistent, bounded URL → thumbnail cache and batch enrichment.
//!
//! The cache is an insertion-ordered map persisted as one JSON object under
//! [`THUMBNAILS_KEY`]. Order is resolution order, not access order, and
//! eviction drops the oldest-inserted entries first. A `null` value records
//! a URL that was consulted without finding an image; it is not retried
//! until it is evicted.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{load_json_or_default, save_json, KeyValueStore};
use crate::thumbnail::url_normalize::normalize_url;
use crate::thumbnail::ThumbnailLookup;
use crate::types::{Hit, PLACEHOLDER_IMAGE};

/// Store key holding the thumbnail map.
pub const THUMBNAILS_KEY: &str = "thumbnails";

/// Insertion-ordered map from normalised page URL to image URL (or `None`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThumbnailMap(IndexMap<String, Option<String>>);

impl ThumbnailMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `url` has been consulted, with or without finding an image.
    pub fn contains(&self, url: &str) -> bool {
        self.0.contains_key(&normalize_url(url))
    }

    /// The image URL recorded for `url`, if one was found.
    pub fn get(&self, url: &str) -> Option<&str> {
        self.0.get(&normalize_url(url)).and_then(|v| v.as_deref())
    }

    /// The image to render for `hit`: its thumbnail, or [`PLACEHOLDER_IMAGE`].
    pub fn image_for(&self, hit: &Hit) -> &str {
        hit.link()
            .and_then(|url| self.get(url))
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Record `image` for `url`. An existing entry is replaced and moves
    /// to the newest position.
    pub fn insert(&mut self, url: &str, image: Option<String>) {
        let key = normalize_url(url);
        self.0.shift_remove(&key);
        self.0.insert(key, image);
    }

    /// Keep only the `max` most recently inserted entries.
    pub fn retain_newest(&mut self, max: usize) {
        let len = self.0.len();
        if len > max {
            self.0.drain(..len - max);
        }
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Load the persisted map. Absent or corrupt data yields an empty map.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_json_or_default(store, THUMBNAILS_KEY)
    }

    /// Persist the map.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Storage`] if the store write fails.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        save_json(store, THUMBNAILS_KEY, self)
    }
}

/// Resolves thumbnails for result batches, skipping URLs already cached.
///
/// Callers must not run two batches concurrently against the same store:
/// the map is read, modified and written back without locking.
pub struct CacheManager<L> {
    lookup: L,
    store: Arc<dyn KeyValueStore>,
    max_entries: usize,
}

impl<L: ThumbnailLookup> CacheManager<L> {
    pub fn new(lookup: L, store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            lookup,
            store,
            max_entries,
        }
    }

    /// The currently persisted map.
    pub fn load(&self) -> ThumbnailMap {
        ThumbnailMap::load(&*self.store)
    }

    /// Drop every cached entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Storage`] if the store cannot be updated.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(THUMBNAILS_KEY)
    }

    /// Resolve thumbnails for `hits` and return the updated map.
    ///
    /// # Pipeline
    ///
    /// 1. Load the persisted map (empty if absent or corrupt)
    /// 2. Keep hits with a thumbnail slot whose URL is not yet a key;
    ///    repeated URLs in the batch are resolved once
    /// 3. Resolve them one at a time, in hit order
    /// 4. Append the results, then evict oldest entries down to the bound
    /// 5. Persist once, after every resolution has finished
    ///
    /// Never fails. A failed write is logged and the merged map is still
    /// returned.
    pub async fn enrich_batch(&self, hits: &[Hit]) -> ThumbnailMap {
        let mut map = self.load();

        let mut queued = HashSet::new();
        let work: Vec<&str> = hits
            .iter()
            .filter(|hit| hit.has_thumbnail_slot())
            .filter_map(Hit::link)
            .filter(|url| !map.contains(url) && queued.insert(normalize_url(url)))
            .collect();

        tracing::debug!(
            hits = hits.len(),
            to_resolve = work.len(),
            cached = map.len(),
            "thumbnail batch started"
        );

        let resolved: Vec<(&str, Option<String>)> = futures::stream::iter(work)
            .then(|url| async move { (url, self.lookup.resolve(url).await) })
            .collect()
            .await;

        let found = resolved.iter().filter(|(_, image)| image.is_some()).count();
        for (url, image) in resolved {
            map.insert(url, image);
        }
        map.retain_newest(self.max_entries);

        if let Err(e) = map.save(&*self.store) {
            tracing::warn!(error = %e, "failed to persist thumbnail cache");
        }

        tracing::debug!(found, entries = map.len(), "thumbnail batch finished");
        map
    }
}
