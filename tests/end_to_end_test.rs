mod common;

use std::time::Duration;

use common::{attachment, body_part, html_email, multipart_email};
use email_json_extract::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_email(dir: &tempfile::TempDir, raw: &[u8]) -> SourceDescriptor {
    let file = dir.path().join("message.eml");
    std::fs::write(&file, raw).unwrap();
    SourceDescriptor::FilePath(file)
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_direct_link_over_http() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/file.json",
        ResponseTemplate::new(200).set_body_raw("[1,2,3]", "application/json"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let html = format!(r#"<a href="{}/file.json">download</a>"#, server.uri());
    let source = write_email(&dir, &html_email(&html));

    let extractor = JsonExtractor::new(Config::default()).unwrap();
    let found = extractor.extract(&source).await.unwrap();

    assert_eq!(found.value, json!([1, 2, 3]));
}

#[tokio::test]
async fn test_chased_link_over_http() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/reports/page.html",
        ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><a href="../assets/out.json?v=2">json</a></body></html>"#,
            "text/html",
        ),
    )
    .await;
    mount(
        &server,
        "/assets/out.json",
        ResponseTemplate::new(200).set_body_raw("{\"ok\":true}", "application/json"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let html = format!(r#"<a href="{}/reports/page.html">view</a>"#, server.uri());
    let source = write_email(&dir, &html_email(&html));

    let extractor = JsonExtractor::new(Config::default()).unwrap();
    let found = extractor.extract(&source).await.unwrap();

    assert_eq!(found.value, json!({"ok": true}));
    assert_eq!(
        found.source,
        ExtractionSource::ChasedLink {
            page: format!("{}/reports/page.html", server.uri()),
            url: format!("{}/assets/out.json?v=2", server.uri()),
        }
    );
}

#[tokio::test]
async fn test_remote_email_source() {
    let server = MockServer::start().await;
    let raw = multipart_email(&[
        body_part("text/plain", "attached"),
        attachment("application/json", "data.json", "{\"a\":1}"),
    ]);
    mount(
        &server,
        "/mail.eml",
        ResponseTemplate::new(200).set_body_raw(raw, "message/rfc822"),
    )
    .await;

    let source = SourceDescriptor::RemoteUrl(format!("{}/mail.eml", server.uri()));
    let extractor = JsonExtractor::new(Config::default()).unwrap();
    let found = extractor.extract(&source).await.unwrap();

    assert_eq!(found.value, json!({"a": 1}));
}

#[tokio::test]
async fn test_remote_source_not_200_is_fetch_error() {
    let server = MockServer::start().await;
    mount(&server, "/mail.eml", ResponseTemplate::new(404)).await;

    let source = SourceDescriptor::RemoteUrl(format!("{}/mail.eml", server.uri()));
    let extractor = JsonExtractor::new(Config::default()).unwrap();
    let err = extractor.extract(&source).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FetchError);
}

#[tokio::test]
async fn test_missing_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = SourceDescriptor::FilePath(dir.path().join("missing.eml"));

    let extractor = JsonExtractor::new(Config::default()).unwrap();
    let err = extractor.extract(&source).await.unwrap_err();

    assert!(matches!(err, ExtractError::SourceNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_slow_link_times_out_and_next_link_wins() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/slow.json",
        ResponseTemplate::new(200)
            .set_body_raw("{\"slow\":true}", "application/json")
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    mount(
        &server,
        "/fast.json",
        ResponseTemplate::new(200).set_body_raw("{\"fast\":true}", "application/json"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let text = format!("{0}/slow.json\n{0}/fast.json", server.uri());
    let source = write_email(&dir, &common::text_email(&text));

    let config = Config {
        fetch_timeout_ms: 200,
        ..Config::default()
    };
    let extractor = JsonExtractor::new(config).unwrap();
    let found = extractor.extract(&source).await.unwrap();

    assert_eq!(found.value, json!({"fast": true}));
}

#[tokio::test]
async fn test_redirect_followed_by_transport() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/old",
        ResponseTemplate::new(302).insert_header("Location", "/new.json"),
    )
    .await;
    mount(
        &server,
        "/new.json",
        ResponseTemplate::new(200).set_body_raw("{\"moved\":true}", "application/json"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let html = format!(r#"<a href="{}/old">old</a>"#, server.uri());
    let source = write_email(&dir, &html_email(&html));

    let extractor = JsonExtractor::new(Config::default()).unwrap();
    let found = extractor.extract(&source).await.unwrap();

    assert_eq!(found.value, json!({"moved": true}));
}

#[tokio::test]
async fn test_oversized_body_is_no_match() {
    let server = MockServer::start().await;
    let big = format!("[{}]", vec!["1"; 2048].join(","));
    mount(
        &server,
        "/big.json",
        ResponseTemplate::new(200).set_body_raw(big, "application/json"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let html = format!(r#"<a href="{}/big.json">big</a>"#, server.uri());
    let source = write_email(&dir, &html_email(&html));

    let config = Config {
        max_body_bytes: 1024,
        ..Config::default()
    };
    let extractor = JsonExtractor::new(config).unwrap();
    let err = extractor.extract(&source).await.unwrap_err();

    assert!(matches!(err, ExtractError::NoJsonFound));
}

#[tokio::test]
async fn test_unreachable_link_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // Port 9 (discard) on localhost is expected to refuse connections
    let source = write_email(&dir, &common::text_email("http://127.0.0.1:9/data.json"));

    let config = Config {
        fetch_timeout_ms: 1_000,
        ..Config::default()
    };
    let extractor = JsonExtractor::new(config).unwrap();
    let err = extractor.extract(&source).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}
