//! Core types for search hits and resolved thumbnails.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Transparent 1x1 GIF shown when a hit has no known thumbnail.
pub const PLACEHOLDER_IMAGE: &str = "data:image/gif;base64,R0lGODlhAQABAAAAACwAAAAAAQABAAA=";

/// A single story record returned by the search index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Story title. An explicit `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Linked article URL. Text posts (Ask HN etc.) have none.
    #[serde(default)]
    pub url: Option<String>,
    /// Raw story body markup, meant to be rendered as-is.
    #[serde(default)]
    pub story_text: Option<String>,
    /// Highlight metadata for the matched query terms.
    #[serde(rename = "_highlightResult", default)]
    pub highlight: HighlightResult,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Hit {
    /// The hit URL, trimmed, or `None` when absent or blank.
    pub fn link(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Whether the hit links somewhere a thumbnail can be shown for.
    ///
    /// Relative links (starting with `/` or `.`) get no image slot.
    pub fn has_thumbnail_slot(&self) -> bool {
        match self.link() {
            Some(url) => !url.starts_with('/') && !url.starts_with('.'),
            None => false,
        }
    }

    /// Query keywords the index matched inside the URL.
    pub fn matched_words(&self) -> &[String] {
        self.highlight
            .url
            .as_ref()
            .map(|url| url.matched_words.as_slice())
            .unwrap_or_default()
    }
}

/// Per-field highlight data attached to a [`Hit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightResult {
    /// Highlighted title markup.
    #[serde(default)]
    pub title: Option<HighlightValue>,
    /// Keywords matched in the URL.
    #[serde(default)]
    pub url: Option<UrlHighlight>,
}

/// A highlighted field value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightValue {
    #[serde(default)]
    pub value: String,
}

/// Keywords matched in a hit's URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlHighlight {
    #[serde(rename = "matchedWords", default)]
    pub matched_words: Vec<String>,
}

/// Top-level search API response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Where a resolved thumbnail came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThumbnailSource {
    /// `<meta property="og:image">`.
    OpenGraph,
    /// `<meta name="twitter:image">`.
    Twitter,
    /// Favicon service URL derived from the page hostname.
    Favicon,
}

impl ThumbnailSource {
    /// Returns a short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenGraph => "og:image",
            Self::Twitter => "twitter:image",
            Self::Favicon => "favicon",
        }
    }
}

impl fmt::Display for ThumbnailSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An image URL resolved for a page, with the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL, exactly as found (not resolved against the page URL).
    pub url: String,
    /// Fallback step that produced the URL.
    pub source: ThumbnailSource,
}
