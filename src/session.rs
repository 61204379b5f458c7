//! Session driver: tags → search → thumbnails.
//!
//! Changes propagate explicitly. A tag change persists the tags and re-runs
//! the query; a new result set runs one thumbnail enrichment batch. Only one
//! batch runs at a time because every step takes `&mut self`.

use std::sync::Arc;

use hnscope_search::{
    CacheManager, FileStore, Hit, KeyValueStore, SearchClient, TagList, ThumbnailLookup,
    ThumbnailMap, ThumbnailResolver,
};

use crate::config::AppConfig;
use crate::error::Result;

/// Search state for one user: tags, the current hits, and their thumbnails.
pub struct Session<L> {
    store: Arc<dyn KeyValueStore>,
    search: SearchClient,
    thumbnails: CacheManager<L>,
    tags: TagList,
    results: Vec<Hit>,
    images: ThumbnailMap,
}

impl Session<ThumbnailResolver> {
    /// Build a session backed by the on-disk store named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or an HTTP client cannot
    /// be built.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let data_dir = config.storage.resolved_data_dir();
        tracing::debug!(data_dir = %data_dir.display(), "opening store");

        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(data_dir));
        let search = SearchClient::new(config.search.clone())?;
        let resolver = ThumbnailResolver::new(&config.thumbnails)?;
        let thumbnails =
            CacheManager::new(resolver, store.clone(), config.thumbnails.max_cached_entries);
        Ok(Self::open(store, search, thumbnails))
    }
}

impl<L: ThumbnailLookup> Session<L> {
    /// Restore saved tags and thumbnails from `store`. No query is made.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        search: SearchClient,
        thumbnails: CacheManager<L>,
    ) -> Self {
        let tags = TagList::load(&*store);
        let images = thumbnails.load();
        tracing::debug!(tags = tags.len(), thumbnails = images.len(), "session opened");
        Self {
            store,
            search,
            thumbnails,
            tags,
            results: Vec::new(),
            images,
        }
    }

    pub fn tags(&self) -> &TagList {
        &self.tags
    }

    pub fn results(&self) -> &[Hit] {
        &self.results
    }

    pub fn thumbnails(&self) -> &ThumbnailMap {
        &self.images
    }

    /// The image to render for `hit`, or the transparent placeholder.
    pub fn image_for(&self, hit: &Hit) -> &str {
        self.images.image_for(hit)
    }

    /// Add a tag and refresh. Returns `false` (and does nothing) for blank
    /// or already present input.
    pub async fn add_tag(&mut self, input: &str) -> bool {
        self.add_tags([input]).await > 0
    }

    /// Add several tags, then refresh once. Returns how many were added.
    pub async fn add_tags<I, S>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = inputs
            .into_iter()
            .filter(|input| self.tags.add(input.as_ref()))
            .count();
        if added > 0 {
            self.on_tags_changed().await;
        }
        added
    }

    /// Remove a tag and refresh. Returns `false` if it was not present.
    pub async fn remove_tag(&mut self, tag: &str) -> bool {
        self.remove_tags([tag]).await > 0
    }

    /// Remove several tags, then refresh once. Returns how many were removed.
    pub async fn remove_tags<I, S>(&mut self, tags: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = tags
            .into_iter()
            .filter(|tag| self.tags.remove(tag.as_ref()))
            .count();
        if removed > 0 {
            self.on_tags_changed().await;
        }
        removed
    }

    /// Re-run the query for the current tags without changing them.
    pub async fn refresh(&mut self) {
        self.run_query().await;
    }

    async fn on_tags_changed(&mut self) {
        if let Err(e) = self.tags.save(&*self.store) {
            tracing::warn!(error = %e, "failed to persist search tags");
        }
        self.run_query().await;
    }

    async fn run_query(&mut self) {
        if self.tags.is_empty() {
            self.results.clear();
            return;
        }

        match self.search.search(&self.tags).await {
            Ok(hits) => {
                tracing::info!(count = hits.len(), "search results updated");
                self.results = hits;
                self.on_results_changed().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed, keeping previous results");
            }
        }
    }

    async fn on_results_changed(&mut self) {
        if self.results.is_empty() {
            return;
        }
        self.images = self.thumbnails.enrich_batch(&self.results).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hnscope_search::{MemoryStore, SearchConfig};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Answers every lookup with a derived image URL.
    struct EchoLookup;

    impl ThumbnailLookup for EchoLookup {
        async fn resolve(&self, url: &str) -> Option<String> {
            Some(format!("{url}#thumb"))
        }
    }

    const TWO_HITS: &str = r#"{"hits": [
        {"title": "One", "url": "https://one.example/"},
        {"title": "Two", "url": "https://two.example/"}
    ]}"#;

    fn session_for(server: &MockServer, store: Arc<dyn KeyValueStore>) -> Session<EchoLookup> {
        let search = SearchClient::new(SearchConfig {
            api_base_url: server.uri(),
            ..Default::default()
        })
        .expect("client");
        let thumbnails = CacheManager::new(EchoLookup, store.clone(), 50);
        Session::open(store, search, thumbnails)
    }

    #[tokio::test]
    async fn adding_tag_queries_and_enriches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search_by_date"))
            .and(query_param("query", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_HITS))
            .expect(1)
            .mount(&server)
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = session_for(&server, store.clone());

        assert!(session.add_tag(" rust ").await);
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.thumbnails().len(), 2);
        let first = session.results()[0].clone();
        assert_eq!(session.image_for(&first), "https://one.example/#thumb");
        assert_eq!(TagList::load(&*store).query(), "rust");
    }

    #[tokio::test]
    async fn duplicate_tag_does_not_requery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_HITS))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        assert!(session.add_tag("rust").await);
        assert!(!session.add_tag("rust").await);
        assert!(!session.add_tag("   ").await);
    }

    #[tokio::test]
    async fn removing_last_tag_clears_results_without_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_HITS))
            .expect(1)
            .mount(&server)
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = session_for(&server, store.clone());
        session.add_tag("rust").await;
        assert!(session.remove_tag("rust").await);
        assert!(session.results().is_empty());
        assert!(TagList::load(&*store).is_empty());
        // Thumbnails outlive the result set.
        assert_eq!(session.thumbnails().len(), 2);
    }

    #[tokio::test]
    async fn failed_search_keeps_previous_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("query", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_HITS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("query", "rust wasm"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        session.add_tag("rust").await;
        session.add_tag("wasm").await;
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.tags().query(), "rust wasm");
    }

    #[tokio::test]
    async fn add_tags_refreshes_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("query", "rust webassembly"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_HITS))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server, Arc::new(MemoryStore::new()));
        assert_eq!(session.add_tags(["rust", "webassembly", "rust"]).await, 2);
    }

    #[tokio::test]
    async fn reopened_session_restores_tags_and_thumbnails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_HITS))
            .mount(&server)
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let mut session = session_for(&server, store.clone());
            session.add_tags(["rust", "webassembly"]).await;
        }

        let reopened = session_for(&server, store);
        assert_eq!(
            reopened.tags().iter().collect::<Vec<_>>(),
            vec!["rust", "webassembly"]
        );
        assert!(reopened.results().is_empty());
        assert_eq!(reopened.thumbnails().len(), 2);
    }
}
