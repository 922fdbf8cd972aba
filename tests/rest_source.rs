//! Integration tests for the REST post source against a mock service.
//!
//! Each test starts its own server on 127.0.0.1 (wiremock, or a bare TCP
//! listener for transport-level stalls), which the source accepts over
//! plain HTTP.

use insights::app::{App, FailureKind, LoadState};
use insights::source::{PostSource, RestPostSource, SourceError};
use insights::ui::{Renderer, StaticPage};
use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rows() -> serde_json::Value {
    json!([
        {
            "id": 2,
            "title": "Newer",
            "slug": "newer",
            "content": "# Heading\n\nBody",
            "published_at": "2024-10-03T00:00:00+00:00",
            "category": "Tech",
            "tags": ["rust"],
            "author": "Sam",
            "is_published": true
        },
        {
            "id": 1,
            "title": "Older",
            "slug": "older",
            "content": "<p>Body</p>",
            "published_at": "2024-09-01T00:00:00+00:00",
            "category": null,
            "tags": null,
            "author": null,
            "is_published": true
        }
    ])
}

fn source(server: &MockServer, api_key: Option<&str>) -> RestPostSource {
    RestPostSource::new(
        reqwest::Client::new(),
        &server.uri(),
        "posts",
        api_key.map(SecretString::from),
    )
    .unwrap()
}

#[tokio::test]
async fn test_lists_posts_with_filter_order_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/posts"))
        .and(query_param("is_published", "eq.true"))
        .and(query_param("order", "published_at.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows()))
        .expect(1)
        .mount(&server)
        .await;

    let posts = source(&server, Some("anon-key"))
        .list_published_posts()
        .await
        .unwrap();

    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer", "older"]);
    assert!(posts[1].tags().is_empty());
}

#[tokio::test]
async fn test_drops_unpublished_rows() {
    let server = MockServer::start().await;
    let body = json!([
        {"title": "Draft", "slug": "draft", "is_published": false},
        {"title": "Live", "slug": "live", "is_published": true}
    ]);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let posts = source(&server, None).list_published_posts().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "live");
}

#[tokio::test]
async fn test_service_error_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let err = source(&server, None).list_published_posts().await.unwrap_err();
    match err {
        SourceError::Service { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = source(&server, None).list_published_posts().await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
    assert!(!err.is_service_error());
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows()))
        .mount(&server)
        .await;

    let err = source(&server, None)
        .with_max_response_size(16)
        .list_published_posts()
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::ResponseTooLarge(16)));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(rows())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = source(&server, None)
        .with_timeout(Duration::from_millis(100))
        .list_published_posts()
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Timeout(_)));
    assert!(err.to_string().contains("100ms"));
}

/// Serves one connection: sends headers and the first body byte, then
/// goes quiet without closing.
async fn stalled_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1024\r\n\r\n[",
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_stalled_body_times_out() {
    let base = stalled_body_server().await;
    let source = RestPostSource::new(reqwest::Client::new(), &base, "posts", None)
        .unwrap()
        .with_timeout(Duration::from_millis(300));

    let started = std::time::Instant::now();
    let err = source.list_published_posts().await.unwrap_err();
    assert!(matches!(err, SourceError::Timeout(d) if d == Duration::from_millis(300)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_app_load_distinguishes_failure_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut app = App::new(StaticPage::complete(), Renderer::default());
    let err = app.load(&source(&server, None)).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Fetch);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{"))
        .mount(&server)
        .await;

    let mut app = App::new(StaticPage::complete(), Renderer::default());
    let err = app.load(&source(&server, None)).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unexpected);
    assert!(matches!(
        app.load_state(),
        LoadState::Failed {
            kind: FailureKind::Unexpected,
            ..
        }
    ));
    let status = app.page().status.as_ref().unwrap();
    assert!(!status.loading);
    assert!(status.error.is_some());
}
