//! URL normalisation for thumbnail cache keys.
//!
//! Two hits linking the same page with cosmetic differences (host case,
//! default port, fragment, trailing slash, tracking parameters) share one
//! cache entry.

use url::Url;

/// Tracking query parameters that are stripped during normalisation.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
];

/// Normalise a URL into its cache key.
///
/// 1. Trim surrounding whitespace.
/// 2. Lowercase scheme and host (path is preserved as-is).
/// 3. Remove default ports (`:80` for HTTP, `:443` for HTTPS).
/// 4. Strip tracking parameters and sort the rest by key, then value.
/// 5. Remove the fragment and a trailing path slash (except the root `/`).
///
/// Input that does not parse as an absolute URL is returned trimmed but
/// otherwise unchanged.
///
/// # Examples
///
/// ```
/// use hnscope_search::thumbnail::url_normalize::normalize_url;
///
/// let a = normalize_url("https://Example.COM/post/?b=2&a=1#comments");
/// let b = normalize_url("https://example.com/post?a=1&b=2");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut parsed) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };
    if parsed.cannot_be_a_base() {
        return trimmed.to_string();
    }

    parsed.set_fragment(None);

    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&params);
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    parsed.to_string()
}

fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}
