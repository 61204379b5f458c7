//! Image metadata extraction from (possibly truncated) HTML.
//!
//! Looks for the Open Graph image first and the Twitter card image second.
//! The parser is permissive: a document cut off mid-tag still yields every
//! complete `<meta>` element before the cut.

use scraper::{Html, Selector};

use crate::types::ThumbnailSource;

/// Metadata selectors in priority order.
const META_SELECTORS: &[(&str, ThumbnailSource)] = &[
    (r#"meta[property="og:image"]"#, ThumbnailSource::OpenGraph),
    (r#"meta[name="twitter:image"]"#, ThumbnailSource::Twitter),
];

/// An image URL found in page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaImage {
    /// The `content` attribute, verbatim.
    pub url: String,
    /// Which tag it came from.
    pub source: ThumbnailSource,
}

/// Find the page's representative image in `html`.
///
/// For each selector, the first matching element in document order is
/// consulted. Its `content` is returned verbatim; no validation or
/// resolution against the page URL happens. A tag whose `content` is
/// missing or blank does not count as a match.
pub fn extract_meta_image(html: &str) -> Option<MetaImage> {
    let document = Html::parse_document(html);

    for (selector_str, source) in META_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let Some(element) = document.select(&selector).next() else {
            continue;
        };
        match element.value().attr("content") {
            Some(content) if !content.trim().is_empty() => {
                return Some(MetaImage {
                    url: content.to_owned(),
                    source: *source,
                });
            }
            _ => {
                tracing::trace!(%source, "meta tag without usable content");
            }
        }
    }

    None
}
