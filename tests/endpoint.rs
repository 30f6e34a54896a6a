//! End-to-end tests for GET /html2rss: a wiremock server plays the target
//! page, the axum router is driven in-process via `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use html2rss_web::config::Config;
use html2rss_web::server::{router, AppState};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><head><title>T</title><meta name="description" content="D"></head><body><a href="http://x/1">A</a><a href="http://x/2">B</a></body></html>"#;

fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
        config: Config {
            port: 0,
            verification_code: "sesame".to_string(),
            webroot: "webroot".into(),
        },
        client: reqwest::Client::new(),
    })
}

async fn get(uri: &str) -> (StatusCode, String) {
    let response = router(test_state())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn serve_page(body: &str) -> MockServer {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&upstream)
        .await;
    upstream
}

#[tokio::test]
async fn converts_a_page_into_a_feed() {
    let upstream = serve_page(PAGE).await;
    let uri = format!("/html2rss?url={}/page&a=a&code=sesame", upstream.uri());

    let response = router(test_state())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml; charset=utf-8"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("<title><![CDATA[T]]></title>"));
    assert!(body.contains("<description><![CDATA[D]]></description>"));
    assert!(body.contains("<lastBuildDate>"));
    assert!(body.contains("<title><![CDATA[A]]></title>"));
    assert!(body.contains("<title><![CDATA[B]]></title>"));
    assert!(!body.contains("<enclosure"));

    let first = body.find("<link>http://x/1</link>").expect("first item link");
    let second = body
        .find("<link>http://x/2</link>")
        .expect("second item link");
    assert!(first < second, "items must keep document order");
}

#[tokio::test]
async fn descending_link_order_reverses_the_items() {
    let upstream = serve_page(PAGE).await;
    let uri = format!(
        "/html2rss?url={}/page&a=a&as=d&code=sesame",
        upstream.uri()
    );
    let (status, body) = get(&uri).await;

    assert_eq!(status, StatusCode::OK);
    let first = body.find("<link>http://x/2</link>").unwrap();
    let second = body.find("<link>http://x/1</link>").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn magnet_links_become_enclosures() {
    let page = r#"<html><body><a href="magnet:?xt=urn:btih:abc&dn=Cool%20Show&tr=http://t">x</a></body></html>"#;
    let upstream = serve_page(page).await;
    let uri = format!("/html2rss?url={}/page&a=a&code=sesame", upstream.uri());
    let (status, body) = get(&uri).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body
        .contains(r#"<enclosure url="magnet:?xt=urn:btih:abc" type="application/x-bittorrent"/>"#));
    assert!(body.contains("<link><![CDATA[magnet:?xt=urn:btih:abc&dn=Cool%20Show&tr=http://t]]></link>"));
}

#[tokio::test]
async fn missing_code_is_rejected_without_fetching() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(0)
        .mount(&upstream)
        .await;

    let uri = format!("/html2rss?url={}/page&a=a", upstream.uri());
    let (status, _) = get(&uri).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn wrong_code_is_rejected_without_fetching() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(0)
        .mount(&upstream)
        .await;

    let uri = format!("/html2rss?url={}/page&a=a&code=wrong", upstream.uri());
    let (status, _) = get(&uri).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_url_is_a_bad_request() {
    let (status, body) = get("/html2rss?a=a&code=sesame").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("url"));
}

#[tokio::test]
async fn missing_link_selector_is_a_bad_request() {
    let (status, body) = get("/html2rss?url=http://x/&code=sesame").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("a"));
}

#[tokio::test]
async fn unknown_charset_is_rejected_without_fetching() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(0)
        .mount(&upstream)
        .await;

    let uri = format!(
        "/html2rss?url={}/page&a=a&charset=bogus&code=sesame",
        upstream.uri()
    );
    let (status, _) = get(&uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn selector_matching_nothing_is_a_bad_request() {
    let upstream = serve_page(PAGE).await;
    let uri = format!(
        "/html2rss?url={}/page&a=section&code=sesame",
        upstream.uri()
    );
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("no links matched"));
}

#[tokio::test]
async fn upstream_failure_is_a_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let uri = format!("/html2rss?url={}/page&a=a&code=sesame", upstream.uri());
    let (status, _) = get(&uri).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn title_selector_pairs_by_index() {
    let page = r#"<html><body>
        <h2>One</h2><a href="http://x/1">A</a>
        <h2>Two</h2><a href="http://x/2">B</a>
    </body></html>"#;
    let upstream = serve_page(page).await;
    let uri = format!("/html2rss?url={}/page&a=a&t=h2&code=sesame", upstream.uri());
    let (status, body) = get(&uri).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title><![CDATA[One]]></title>"));
    assert!(body.contains("<title><![CDATA[Two]]></title>"));
}
