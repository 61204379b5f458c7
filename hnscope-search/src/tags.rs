//! The user's accumulated search tags.
//!
//! Tags are combined with logical AND by the search index, so the query is
//! simply the tags joined by spaces. The list is persisted as a JSON array
//! under [`TAGS_KEY`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{load_json_or_default, save_json, KeyValueStore};

/// Store key holding the tag list.
pub const TAGS_KEY: &str = "searchTags";

/// Ordered list of unique, trimmed, non-empty search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList(Vec<String>);

impl TagList {
    /// Create an empty tag list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Input is trimmed; blank input and duplicates are ignored.
    ///
    /// Returns `true` if the list changed.
    pub fn add(&mut self, input: &str) -> bool {
        let tag = input.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_owned());
        true
    }

    /// Remove an exact tag. Returns `true` if the list changed.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The search query: all tags joined by a single space.
    pub fn query(&self) -> String {
        self.0.join(" ")
    }

    /// Load the persisted list. Absent or corrupt data yields an empty list.
    ///
    /// Entries that would not survive [`TagList::add`] (blank or repeated)
    /// are dropped on load.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw: Vec<String> = load_json_or_default(store, TAGS_KEY);
        let mut tags = Self::new();
        for tag in &raw {
            tags.add(tag);
        }
        tags
    }

    /// Persist the list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Storage`] if the store write fails.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        save_json(store, TAGS_KEY, self)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.add(tag.as_ref());
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn add_trims_and_rejects_blank_and_duplicates() {
        let mut tags = TagList::new();
        assert!(tags.add("  rust "));
        assert!(!tags.add("rust"));
        assert!(!tags.add("   "));
        assert!(tags.add("webassembly"));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["rust", "webassembly"]);
    }

    #[test]
    fn remove_exact_match_only() {
        let mut tags: TagList = ["rust", "wasm"].into_iter().collect();
        assert!(!tags.remove("Rust"));
        assert!(tags.remove("rust"));
        assert_eq!(tags.query(), "wasm");
        assert!(!tags.remove("rust"));
    }

    #[test]
    fn query_joins_with_spaces() {
        let tags: TagList = ["rust", "async", "tokio"].into_iter().collect();
        assert_eq!(tags.query(), "rust async tokio");
        assert_eq!(TagList::new().query(), "");
    }

    #[test]
    fn save_then_load_preserves_order() {
        let store = MemoryStore::new();
        let tags: TagList = ["rust", "webassembly"].into_iter().collect();
        tags.save(&store).expect("save");

        let raw = store.get(TAGS_KEY).expect("get").expect("present");
        assert_eq!(raw, r#"["rust","webassembly"]"#);

        let loaded = TagList::load(&store);
        assert_eq!(loaded, tags);
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["rust", "webassembly"]);
    }

    #[test]
    fn load_absent_is_empty() {
        assert!(TagList::load(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn load_corrupt_is_empty() {
        let store = MemoryStore::new();
        store.set(TAGS_KEY, "[\"rust\",").expect("set");
        assert!(TagList::load(&store).is_empty());
    }

    #[test]
    fn load_drops_blank_and_repeated_entries() {
        let store = MemoryStore::new();
        store
            .set(TAGS_KEY, r#"["rust", " ", "rust", "go"]"#)
            .expect("set");
        let loaded = TagList::load(&store);
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["rust", "go"]);
    }
}
