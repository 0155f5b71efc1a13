//! Tests for the HTTP transport module

use super::*;
use crate::auth::StaticToken;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::types::Method;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request as MockRequest, ResponseTemplate};

fn transport_for(host: &str) -> Transport {
    let config = ClientConfig::builder().host(host).build();
    Transport::new(&config, Arc::new(StaticToken::new("secret-token"))).unwrap()
}

// ============================================================================
// URL Resolution Tests
// ============================================================================

#[test_case("me", "https://graph.microsoft.com/v1.0/me" ; "relative path")]
#[test_case("/users", "https://graph.microsoft.com/v1.0/users" ; "leading slash")]
#[test_case("users?$top=5", "https://graph.microsoft.com/v1.0/users?$top=5" ; "query string kept")]
#[test_case(
    "https://graph.microsoft.com/v1.0/users?$skiptoken=abc",
    "https://graph.microsoft.com/v1.0/users?$skiptoken=abc" ;
    "absolute url unchanged"
)]
fn test_resolve(path: &str, expected: &str) {
    let transport = transport_for("https://graph.microsoft.com");
    assert_eq!(transport.resolve(path), expected);
}

#[test]
fn test_resolve_trims_host_trailing_slash() {
    let transport = transport_for("https://graph.microsoft.com/");
    assert_eq!(transport.host(), "https://graph.microsoft.com");
    assert_eq!(
        transport.resolve("me"),
        "https://graph.microsoft.com/v1.0/me"
    );
}

#[test]
fn test_set_version_applies_to_later_resolves() {
    let mut transport = transport_for("https://graph.microsoft.com");
    assert_eq!(transport.version(), "1.0");

    transport.set_version("beta");
    assert_eq!(transport.version(), "beta");
    assert_eq!(
        transport.resolve("me"),
        "https://graph.microsoft.com/vbeta/me"
    );
}

#[test_case("https://a.example.com/x", "https://a.example.com", true ; "same host")]
#[test_case("https://a.example.com:443/x", "https://a.example.com", true ; "explicit default port")]
#[test_case("https://b.example.com/x", "https://a.example.com", false ; "other host")]
#[test_case("http://a.example.com/x", "https://a.example.com", false ; "other scheme")]
#[test_case("http://127.0.0.1:8081/x", "http://127.0.0.1:8080", false ; "other port")]
fn test_same_origin(a: &str, b: &str, expected: bool) {
    assert_eq!(same_origin(a, b).unwrap(), expected);
}

#[test]
fn test_same_origin_rejects_relative() {
    assert!(matches!(
        same_origin("users", "https://a.example.com"),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_response_helpers() {
    let response = Response {
        status: 204,
        url: "u".to_string(),
        final_url: "u".to_string(),
        body: bytes::Bytes::new(),
    };
    assert!(response.is_empty());
    assert!(!response.is_error());

    let response = Response {
        status: 404,
        url: "u".to_string(),
        final_url: "u".to_string(),
        body: bytes::Bytes::from_static(b"{}"),
    };
    assert!(response.is_error());
    assert!(!response.is_empty());
}

#[test]
fn test_request_builders() {
    let request = Request::get("me");
    assert_eq!(request.method, Method::GET);
    assert!(!request.has_body());

    let request = Request::new(Method::POST, "users")
        .json(&serde_json::json!({"displayName": "A"}))
        .unwrap();
    assert!(request.has_body());

    let request = Request::new(Method::POST, "users").body(Vec::new());
    assert!(!request.has_body());
}

// ============================================================================
// Send Tests
// ============================================================================

#[tokio::test]
async fn test_send_attaches_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    let response = transport.send(Request::get("me")).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.url, format!("{}/v1.0/me", server.uri()));
    assert_eq!(&response.body[..], br#"{"id":"1"}"#);
}

#[tokio::test]
async fn test_send_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(header("ConsistencyLevel", "eventual"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .host(server.uri())
        .header("ConsistencyLevel", "eventual")
        .build();
    let transport = Transport::new(&config, Arc::new(StaticToken::new("t"))).unwrap();

    transport.send(Request::get("users")).await.unwrap();
}

#[tokio::test]
async fn test_send_json_body_sets_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1.0/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"displayName": "A"})))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"9"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    let request = Request::new(Method::POST, "users")
        .json(&serde_json::json!({"displayName": "A"}))
        .unwrap();
    let response = transport.send(request).await.unwrap();

    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_send_without_body_omits_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .and(header_exists("Content-Type"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    let response = transport.send(Request::get("me")).await.unwrap();
    assert_eq!(response.status, 200);

    let requests: Vec<MockRequest> = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("content-type"));
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"error":{"code":"InvalidAuthenticationToken","message":"expired"}}"#,
        ))
        .mount(&server)
        .await;

    let transport = transport_for(&server.uri());
    let response = transport.send(Request::get("me")).await.unwrap();

    assert_eq!(response.status, 401);
    assert!(response.is_error());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = transport_for(&format!("http://127.0.0.1:{port}"));

    let err = transport.send(Request::get("me")).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .host(server.uri())
        .timeout(Duration::from_millis(100))
        .build();
    let transport = Transport::new(&config, Arc::new(StaticToken::new("t"))).unwrap();

    let err = transport.send(Request::get("slow")).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 100 }));
}

#[tokio::test]
async fn test_rate_limited_transport_still_sends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(3)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .host(server.uri())
        .rate_limit(RateLimiterConfig::new(100, 3))
        .build();
    let transport = Transport::new(&config, Arc::new(StaticToken::new("t"))).unwrap();
    assert!(transport.has_rate_limiter());

    for _ in 0..3 {
        transport.send(Request::get("me")).await.unwrap();
    }
}
