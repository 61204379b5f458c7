//! End-to-end session tests.
//!
//! One wiremock server plays both the search API and the relay proxy; the
//! session runs with a real on-disk store built from `AppConfig`.

use hnscope::{AppConfig, Session};
use hnscope_search::types::PLACEHOLDER_IMAGE;
use hnscope_search::{SearchConfig, ThumbnailConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUST_HITS: &str = r#"{"hits": [
    {
        "title": "Rust in the browser",
        "url": "https://blog.example/rust-wasm",
        "_highlightResult": {"url": {"matchedWords": ["rust"]}}
    },
    {
        "title": "Ask HN: favourite crates?",
        "story_text": "<p>Which ones?</p>"
    },
    {
        "title": "Plain page",
        "url": "https://plain.example/"
    }
]}"#;

const BLOG_PAGE: &str = r#"<html><head>
<meta name="twitter:image" content="https://blog.example/card.jpg">
</head><body></body></html>"#;

fn config_for(server: &MockServer, data_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig {
        search: SearchConfig {
            api_base_url: server.uri(),
            ..Default::default()
        },
        thumbnails: ThumbnailConfig {
            proxy_base_url: format!("{}/proxy/", server.uri()),
            user_agent: Some("hnscope-test/1.0".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    config.storage.data_dir = Some(data_dir.to_path_buf());
    config
}

async fn mount_search(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search_by_date"))
        .and(query_param("query", "rust"))
        .and(query_param("tags", "story"))
        .and(query_param("hitsPerPage", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RUST_HITS))
        .mount(server)
        .await;
}

async fn mount_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/proxy/https://blog.example/rust-wasm"))
        .respond_with(ResponseTemplate::new(206).set_body_string(BLOG_PAGE))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proxy/https://plain.example/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn tags_search_and_thumbnails_survive_restart() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_pages(&server).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(&server, dir.path());

    let mut session = Session::from_config(&config).expect("session");
    assert!(session.add_tag("rust").await);
    assert_eq!(session.results().len(), 3);

    let blog = &session.results()[0];
    assert_eq!(blog.matched_words(), ["rust"]);
    assert_eq!(session.image_for(blog), "https://blog.example/card.jpg");

    let ask = &session.results()[1];
    assert!(!ask.has_thumbnail_slot());
    assert_eq!(session.image_for(ask), PLACEHOLDER_IMAGE);

    let plain = &session.results()[2];
    assert_eq!(
        session.image_for(plain),
        "https://icon.horse/icon/plain.example"
    );
    drop(session);

    // Same store: tags and thumbnails come back, and a new search reuses
    // the cache instead of hitting the proxy again.
    let mut reopened = Session::from_config(&config).expect("session");
    assert_eq!(reopened.tags().query(), "rust");
    assert_eq!(reopened.thumbnails().len(), 2);
    reopened.refresh().await;
    assert_eq!(reopened.results().len(), 3);
    assert_eq!(reopened.thumbnails().len(), 2);
}

#[tokio::test]
async fn tags_round_trip_through_file_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"hits": []}"#))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(&server, dir.path());

    let mut session = Session::from_config(&config).expect("session");
    assert_eq!(session.add_tags(["rust", "webassembly"]).await, 2);
    drop(session);

    let raw = std::fs::read_to_string(dir.path().join("searchTags.json")).expect("tags file");
    assert_eq!(raw, r#"["rust","webassembly"]"#);

    let reopened = Session::from_config(&config).expect("session");
    let tags: Vec<&str> = reopened.tags().iter().collect();
    assert_eq!(tags, ["rust", "webassembly"]);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = AppConfig::default();
    config.thumbnails.max_cached_entries = 0;
    assert!(Session::from_config(&config).is_err());
}
