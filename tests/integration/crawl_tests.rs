//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small linked sites and drive the full
//! engine + extractor + sink stack end to end.

use seine::config::FetcherConfig;
use seine::engine::{CrawlEngine, EngineConfig};
use seine::extract::{HtmlExtractor, PlainTextExtractor};
use seine::sink::{JsonlSink, SqliteSink};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_engine_config() -> EngineConfig {
    EngineConfig {
        max_concurrency: 4,
        task_timeout: Duration::from_secs(5),
        ..EngineConfig::default()
    }
}

fn html_response(body: &str) -> ResponseTemplate {
    // `set_body_raw` is used rather than `set_body_string` + an
    // `insert_header` override because `set_body_string` forces a
    // `text/plain` content type that wins over a later header insert,
    // which would make the extractor decline every page.
    ResponseTemplate::new(200)
        .set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_writes_each_page_once() {
    let server = MockServer::start().await;

    // index links both pages; page1 links page2 again and back to the
    // index, so the crawl sees duplicates and a cycle
    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/page1",
        r#"<html><body>
            <a href="/page2">Page 2 again</a>
            <a href="/">Back home</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/page2", r#"<html><body>Leaf</body></html>"#).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("crawl.db");

    let extractor = HtmlExtractor::new(&FetcherConfig::default()).unwrap();
    let sink = SqliteSink::new(&db_path).unwrap();
    let engine = CrawlEngine::new(extractor, sink, test_engine_config());

    let seed = format!("{}/", server.uri());
    let stats = engine.process(&seed).await.expect("crawl failed");

    assert_eq!(stats.written, 3);
    assert_eq!(stats.failed, 0);

    let sink = SqliteSink::new(&db_path).unwrap();
    assert_eq!(sink.count_documents().unwrap(), 3);
    let home = sink.get_body(&seed).unwrap().expect("seed not stored");
    assert!(home.contains("Page 1"));
}

#[tokio::test]
async fn test_dead_link_does_not_stop_crawl() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/missing">Broken</a>
            <a href="/alive">Alive</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/alive", r#"<html><body>Still here</body></html>"#).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("crawl.db");

    let extractor = HtmlExtractor::new(&FetcherConfig::default()).unwrap();
    let sink = SqliteSink::new(&db_path).unwrap();
    let engine = CrawlEngine::new(extractor, sink, test_engine_config());

    let stats = engine
        .process(&format!("{}/", server.uri()))
        .await
        .expect("crawl failed");

    assert_eq!(stats.written, 2);
    assert_eq!(stats.failed, 1);

    let sink = SqliteSink::new(&db_path).unwrap();
    assert_eq!(sink.count_documents().unwrap(), 2);
}

#[tokio::test]
async fn test_non_html_content_is_skipped() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/report.pdf">Report</a>
            <a href="/page">Page</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/page", r#"<html><body>Content</body></html>"#).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("crawl.db");

    let extractor = HtmlExtractor::new(&FetcherConfig::default()).unwrap();
    let sink = SqliteSink::new(&db_path).unwrap();
    let engine = CrawlEngine::new(extractor, sink, test_engine_config());

    let stats = engine
        .process(&format!("{}/", server.uri()))
        .await
        .expect("crawl failed");

    // the PDF is declined, not failed
    assert_eq!(stats.written, 2);
    assert_eq!(stats.empty, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_plain_text_extractor_stores_stripped_text() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><head><title>T</title><style>p { color: red; }</style></head>
        <body><p>Hello <b>crawler</b></p><script>var x = 1;</script></body></html>"#,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("crawl.db");

    let extractor = PlainTextExtractor::new(&FetcherConfig::default()).unwrap();
    let sink = SqliteSink::new(&db_path).unwrap();
    let engine = CrawlEngine::new(extractor, sink, test_engine_config());

    let seed = format!("{}/", server.uri());
    let stats = engine.process(&seed).await.expect("crawl failed");
    assert_eq!(stats.written, 1);

    let sink = SqliteSink::new(&db_path).unwrap();
    let body = sink.get_body(&seed).unwrap().expect("seed not stored");
    assert_eq!(body, "Hello crawler");
}

#[tokio::test]
async fn test_jsonl_sink_end_to_end() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/leaf">Leaf</a></body></html>"#,
    )
    .await;
    mount_page(&server, "/leaf", r#"<html><body>Done</body></html>"#).await;

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("out.jsonl");

    let extractor = HtmlExtractor::new(&FetcherConfig::default()).unwrap();
    let sink = JsonlSink::new(&out_path).unwrap();
    let engine = CrawlEngine::new(extractor, sink, test_engine_config());

    let seed = format!("{}/", server.uri());
    let stats = engine.process(&seed).await.expect("crawl failed");
    assert_eq!(stats.written, 2);

    let content = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);

    let urls: Vec<&str> = lines.iter().map(|v| v["url"].as_str().unwrap()).collect();
    assert!(urls.contains(&seed.as_str()));
}
