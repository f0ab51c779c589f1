use std::time::Duration;

use axum::Router;
use axum::routing::{any, get, post};
use serde_json::{Value, json};

use super::*;
use crate::config::ServerConfig;

// =============================================================================
// Header helpers
// =============================================================================

#[test]
fn forwarded_for_starts_chain_with_peer() {
    let peer: SocketAddr = "10.72.177.5:51000".parse().unwrap();
    assert_eq!(forwarded_for(None, peer), "10.72.177.5");
}

#[test]
fn forwarded_for_appends_to_existing_chain() {
    let peer: SocketAddr = "127.0.0.1:51000".parse().unwrap();
    let existing = HeaderValue::from_static("203.0.113.9");
    assert_eq!(forwarded_for(Some(&existing), peer), "203.0.113.9, 127.0.0.1");
}

#[test]
fn forwarded_headers_drop_hop_by_hop_and_host() {
    let mut incoming = HeaderMap::new();
    incoming.insert(header::HOST, HeaderValue::from_static("dashboard.local"));
    incoming.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    incoming.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
    incoming.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
    incoming.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    let out = forwarded_headers(&incoming);
    assert_eq!(out.len(), 2);
    assert_eq!(out.get(header::AUTHORIZATION).unwrap(), "Token abc");
    assert!(out.get(header::HOST).is_none());
    assert!(out.get(header::CONNECTION).is_none());
}

#[test]
fn upstream_url_keeps_path_and_query() {
    let uri: Uri = "/api/client-ip/?t=123".parse().unwrap();
    assert_eq!(upstream_url("http://backend:8000", &uri), "http://backend:8000/api/client-ip/?t=123");
}

#[test]
fn proxy_error_statuses() {
    assert_eq!(ProxyError::BodyTooLarge { limit: 1 }.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(ProxyError::BadBody("x".into()).status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// End to end over real listeners
// =============================================================================

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header_text = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    Json(json!({
        "method": method.as_str(),
        "uri": uri.to_string(),
        "authorization": header_text("authorization"),
        "x_forwarded_for": header_text("x-forwarded-for"),
        "proxy_authorization": header_text("proxy-authorization"),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn rejected_login() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" })))
}

async fn binary_payload() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/octet-stream")], vec![0_u8, 1, 2, 255])
}

fn backend() -> Router {
    Router::new()
        .route("/auth/login/", post(rejected_login))
        .route("/api/download/", get(binary_payload))
        .route("/api/{*rest}", any(echo))
        .route("/admin/{*rest}", any(echo))
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    addr
}

fn test_config(api_base_url: String) -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1".parse().unwrap(),
        port: 0,
        api_base_url,
        upstream_timeout: Duration::from_secs(5),
        max_body_bytes: 64,
    }
}

async fn spawn_proxy(api_base_url: String) -> String {
    let state = AppState::new(test_config(api_base_url)).unwrap();
    let addr = spawn(crate::routes::api_routes(state)).await;
    format!("http://{addr}")
}

async fn spawn_proxy_with_backend() -> String {
    let backend_addr = spawn(backend()).await;
    spawn_proxy(format!("http://{backend_addr}")).await
}

#[tokio::test]
async fn get_is_forwarded_with_query_and_auth() {
    let proxy = spawn_proxy_with_backend().await;
    let resp = reqwest::Client::new()
        .get(format!("{proxy}/api/satellites/2/subsystems/?t=99"))
        .header("authorization", "Token abc123")
        .header("proxy-authorization", "Basic c2VjcmV0")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["method"], "GET");
    assert_eq!(body["uri"], "/api/satellites/2/subsystems/?t=99");
    assert_eq!(body["authorization"], "Token abc123");
    assert_eq!(body["x_forwarded_for"], "127.0.0.1");
    assert_eq!(body["proxy_authorization"], Value::Null);
}

#[tokio::test]
async fn post_body_is_forwarded() {
    let proxy = spawn_proxy_with_backend().await;
    let resp = reqwest::Client::new()
        .post(format!("{proxy}/admin/system-status/"))
        .body(r#"{"probe":true}"#)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["body"], r#"{"probe":true}"#);
}

#[tokio::test]
async fn backend_status_and_body_pass_through() {
    let proxy = spawn_proxy_with_backend().await;
    let resp = reqwest::Client::new()
        .post(format!("{proxy}/auth/login/"))
        .json(&json!({ "username": "ops", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn binary_bodies_are_relayed_unchanged() {
    let proxy = spawn_proxy_with_backend().await;
    let resp = reqwest::get(format!("{proxy}/api/download/")).await.unwrap();
    assert_eq!(resp.headers()["content-type"], "application/octet-stream");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), &[0_u8, 1, 2, 255]);
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let proxy = spawn_proxy_with_backend().await;
    let resp = reqwest::Client::new()
        .post(format!("{proxy}/api/upload/"))
        .body(vec![b'x'; 1024])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = closed.local_addr().unwrap();
    drop(closed);

    let proxy = spawn_proxy(format!("http://{dead_addr}")).await;
    let resp = reqwest::get(format!("{proxy}/api/satellites/")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().starts_with("backend unavailable"));
}

#[tokio::test]
async fn healthz_answers_locally() {
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = closed.local_addr().unwrap();
    drop(closed);

    let proxy = spawn_proxy(format!("http://{dead_addr}")).await;
    let resp = reqwest::get(format!("{proxy}/healthz")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}
