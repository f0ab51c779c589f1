//! Forwarding of `/auth`, `/api` and `/admin` requests to the telemetry
//! backend.
//!
//! DESIGN
//! ======
//! Method, path, query, body and end-to-end headers pass through unchanged;
//! hop-by-hop headers are dropped in both directions. The browser's address
//! is appended to `X-Forwarded-For` so the backend's client-IP view reports
//! the browser, not this server.
//!
//! ERROR HANDLING
//! ==============
//! Upstream transport failures become 502 with a `{detail}` JSON body, which
//! the client renders like any backend error. Bodies over the configured
//! limit are refused with 413 before anything is sent upstream.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Headers that describe a single connection and must not be relayed.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("request body could not be read: {0}")]
    BadBody(String),
    #[error("backend unavailable: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BadBody(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "proxy request failed");
        }
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

/// True for headers that must not cross the proxy.
pub(crate) fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Copy end-to-end headers. `Host` and `Content-Length` are recomputed by the
/// outgoing client.
pub(crate) fn forwarded_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(incoming.len());
    for (name, value) in incoming {
        if is_hop_by_hop(name) || name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// `X-Forwarded-For` value with `peer` appended to any existing chain.
pub(crate) fn forwarded_for(existing: Option<&HeaderValue>, peer: SocketAddr) -> String {
    let peer_ip = peer.ip().to_string();
    match existing.and_then(|v| v.to_str().ok()).map(str::trim) {
        Some(chain) if !chain.is_empty() => format!("{chain}, {peer_ip}"),
        _ => peer_ip,
    }
}

/// Backend URL for an incoming request URI.
pub(crate) fn upstream_url(base: &str, uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
    format!("{base}{path_and_query}")
}

/// Relay one request to the backend and its response back to the browser.
///
/// # Errors
///
/// Returns [`ProxyError`] when the body is rejected or the backend cannot be
/// reached.
pub async fn forward(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ProxyError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProxyError::BodyTooLarge { limit: state.config.max_body_bytes }
        } else {
            ProxyError::BadBody(rejection.body_text())
        }
    })?;

    let url = upstream_url(&state.config.api_base_url, &uri);
    let mut outgoing = forwarded_headers(&headers);
    if let Ok(value) = HeaderValue::from_str(&forwarded_for(headers.get(X_FORWARDED_FOR), peer)) {
        outgoing.insert(X_FORWARDED_FOR, value);
    }

    tracing::debug!(%method, path = uri.path(), "forwarding");
    let upstream = state
        .http
        .request(method.clone(), &url)
        .headers(outgoing)
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let mut response_headers = HeaderMap::with_capacity(upstream.headers().len());
    for (name, value) in upstream.headers() {
        if is_hop_by_hop(name) || name == header::CONTENT_LENGTH {
            continue;
        }
        response_headers.append(name.clone(), value.clone());
    }
    let bytes = upstream.bytes().await?;

    if status.is_server_error() {
        tracing::warn!(%method, path = uri.path(), status = status.as_u16(), "backend error");
    }

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}
