//! HTTP client wrapper for the telemetry API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, same-origin paths
//! that the server forwards to the backend.
//! Server-side (SSR): every call returns [`ApiError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every non-success response is classified into [`ApiError`]. When a client
//! is built with an unauthorized hook, 401/403 responses fire it before the
//! error is returned, which is how an expired token anywhere in the UI turns
//! into a logout.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use leptos::prelude::*;
use serde::de::DeserializeOwned;

use super::error::ApiError;
#[cfg(feature = "hydrate")]
use super::types::{Envelope, FilesResponse, SubsystemsResponse};
use super::types::{
    ClientIp, ExternalIp, FileEntry, FileVersion, Id, LoginRequest, LoginResponse, RecentFile, Satellite,
    SatellitesResponse, SessionStatus, SystemStatus,
};

/// Public IP-echo service used when the backend cannot tell us our address.
pub const EXTERNAL_IP_URL: &str = "https://api.ipify.org?format=json";

#[cfg(feature = "hydrate")]
const UNEXPECTED_VERSIONS: &str = "Server returned data in unexpected format";
#[cfg(feature = "hydrate")]
const UNEXPECTED_METADATA: &str = "Failed to get metadata: Server returned unexpected data format";
#[cfg(feature = "hydrate")]
const UNEXPECTED_RECENT: &str = "Failed to fetch recent files";

// =============================================================================
// ENDPOINTS
// =============================================================================

#[cfg(any(test, feature = "hydrate"))]
fn client_ip_endpoint(cache_bust: u64) -> String {
    format!("/api/client-ip/?t={cache_bust}")
}

#[cfg(any(test, feature = "hydrate"))]
fn subsystems_endpoint(sat: Id) -> String {
    format!("/api/satellites/{sat}/subsystems/")
}

#[cfg(any(test, feature = "hydrate"))]
fn files_endpoint(sat: Id, sub: Id) -> String {
    format!("/api/satellites/{sat}/subsystems/{sub}/files/")
}

#[cfg(any(test, feature = "hydrate"))]
fn versions_endpoint(sat: Id, sub: Id, file: Id) -> String {
    format!("/api/satellites/{sat}/subsystems/{sub}/files/{file}/")
}

#[cfg(any(test, feature = "hydrate"))]
fn metadata_endpoint(sat: Id, sub: Id, file: Id, ver: Id) -> String {
    format!("/api/satellites/{sat}/subsystems/{sub}/files/{file}/version/{ver}/")
}

#[cfg(any(test, feature = "hydrate"))]
fn download_endpoint(sat: Id, sub: Id, file: Id, ver: Id) -> String {
    format!("/api/satellites/{sat}/subsystems/{sub}/files/{file}/version/{ver}/download/")
}

#[cfg(any(test, feature = "hydrate"))]
fn recent_files_endpoint(sort: &str) -> String {
    format!("/api/files/recent/?sort={sort}")
}

/// `Authorization` header value for a token.
#[cfg(any(test, feature = "hydrate"))]
fn authorization_value(token: &str) -> String {
    format!("Token {token}")
}

/// First few characters of a token, for logs.
pub(crate) fn token_preview(token: Option<&str>) -> String {
    match token {
        Some(t) if !t.is_empty() => format!("{}...", t.chars().take(5).collect::<String>()),
        _ => "none".to_owned(),
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Request builder state shared by every API call: the token to inject and
/// the hook to fire on authorization failures.
#[derive(Clone, Default)]
pub struct ApiClient {
    token: Option<String>,
    on_unauthorized: Option<Callback<()>>,
}

impl ApiClient {
    /// A client that sends no `Authorization` header (login, IP lookups).
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()), on_unauthorized: None }
    }

    /// Fire `hook` whenever a request comes back 401/403.
    #[must_use]
    pub fn on_unauthorized(mut self, hook: Callback<()>) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Run the unauthorized hook if `err` invalidates the session, then hand
    /// the error back to the caller.
    pub fn intercept(&self, err: ApiError) -> ApiError {
        if err.is_session_invalid() {
            log::warn!("authorization failure ({err}); token {}", token_preview(self.token()));
            if let Some(hook) = self.on_unauthorized {
                hook.run(());
            }
        }
        err
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    #[cfg(feature = "hydrate")]
    async fn execute(
        &self,
        builder: gloo_net::http::RequestBuilder,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<gloo_net::http::Response, ApiError> {
        log::debug!("request to {path} with token: {}", token_preview(self.token()));
        let builder = match self.token() {
            Some(token) => builder.header("Authorization", &authorization_value(token)),
            None => builder,
        };
        let sent = match body {
            Some(payload) => {
                builder
                    .json(&payload)
                    .map_err(|e| ApiError::Transport(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        };
        let resp = sent.map_err(|e| {
            log::warn!("request to {path} failed: {e}");
            ApiError::Transport(e.to_string())
        })?;
        if resp.ok() {
            return Ok(resp);
        }
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(self.intercept(ApiError::from_response(status, &text)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self.execute(gloo_net::http::Request::get(path), path, None).await?;
            resp.json::<T>()
                .await
                .map_err(|e| ApiError::Format(format!("unexpected response from {path}: {e}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .execute(gloo_net::http::Request::post(path), path, Some(body))
                .await?;
            resp.json::<T>()
                .await
                .map_err(|e| ApiError::Format(format!("unexpected response from {path}: {e}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, body);
            Err(ApiError::Unavailable)
        }
    }

    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.execute(gloo_net::http::Request::post(path), path, None)
                .await
                .map(|_| ())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    async fn get_empty(&self, path: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.execute(gloo_net::http::Request::get(path), path, None)
                .await
                .map(|_| ())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    #[cfg(feature = "hydrate")]
    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.execute(gloo_net::http::Request::get(path), path, None).await?;
        resp.binary()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    // -------------------------------------------------------------------------
    // Auth / session
    // -------------------------------------------------------------------------

    /// `POST /auth/login/`.
    ///
    /// # Errors
    ///
    /// Rejected credentials come back as [`ApiError::Unauthorized`] or
    /// [`ApiError::Status`] with the server's `error` text.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(LoginRequest { username, password })
            .map_err(|e| ApiError::Format(e.to_string()))?;
        self.post_json("/auth/login/", body).await
    }

    /// `POST /auth/logout/`.
    ///
    /// # Errors
    ///
    /// Returns the transport/status failure; callers treat it as best-effort.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_empty("/auth/logout/").await
    }

    /// `GET /auth/check-session-status/`.
    ///
    /// # Errors
    ///
    /// Any failure means the session can no longer be trusted.
    pub async fn check_session_status(&self) -> Result<SessionStatus, ApiError> {
        self.get_json("/auth/check-session-status/").await
    }

    /// `GET /auth/ping-session/` keep-alive.
    ///
    /// # Errors
    ///
    /// 401 comes back as [`ApiError::Unauthorized`].
    pub async fn ping_session(&self) -> Result<(), ApiError> {
        self.get_empty("/auth/ping-session/").await
    }

    // -------------------------------------------------------------------------
    // Network check
    // -------------------------------------------------------------------------

    /// `GET /api/client-ip/` with a cache-busting timestamp.
    ///
    /// # Errors
    ///
    /// Returns the transport/status failure so the caller can fall back.
    pub async fn client_ip(&self) -> Result<ClientIp, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let now = js_sys::Date::now() as u64;
            self.get_json(&client_ip_endpoint(now)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    /// Ask the public IP-echo service for our address. Never sends the token.
    ///
    /// # Errors
    ///
    /// Returns the transport/format failure.
    pub async fn external_ip(&self) -> Result<ExternalIp, ApiError> {
        ApiClient::anonymous().get_json(EXTERNAL_IP_URL).await
    }

    // -------------------------------------------------------------------------
    // Satellite data
    // -------------------------------------------------------------------------

    /// `GET /api/satellites/`.
    ///
    /// # Errors
    ///
    /// Returns the transport/status/format failure.
    pub async fn satellites(&self) -> Result<Vec<Satellite>, ApiError> {
        let resp: SatellitesResponse = self.get_json("/api/satellites/").await?;
        Ok(resp.data.satellites)
    }

    /// Subsystem ids of one satellite.
    ///
    /// # Errors
    ///
    /// Returns the transport/status/format failure.
    pub async fn subsystems(&self, sat: Id) -> Result<Vec<Id>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp: SubsystemsResponse = self.get_json(&subsystems_endpoint(sat)).await?;
            Ok(resp.subsystems.into_iter().map(|s| s.id).collect())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = sat;
            Err(ApiError::Unavailable)
        }
    }

    /// Files of one subsystem. A missing `files` key is an empty listing.
    ///
    /// # Errors
    ///
    /// Returns the transport/status/format failure.
    pub async fn files(&self, sat: Id, sub: Id) -> Result<Vec<FileEntry>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp: FilesResponse = self.get_json(&files_endpoint(sat, sub)).await?;
            Ok(resp.files)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (sat, sub);
            Err(ApiError::Unavailable)
        }
    }

    /// Versions of one file.
    ///
    /// # Errors
    ///
    /// A `status != "success"` envelope is [`ApiError::Format`].
    pub async fn file_versions(&self, sat: Id, sub: Id, file: Id) -> Result<Vec<FileVersion>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let env: Envelope<Vec<FileVersion>> = self.get_json(&versions_endpoint(sat, sub, file)).await?;
            env.into_success(UNEXPECTED_VERSIONS)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (sat, sub, file);
            Err(ApiError::Unavailable)
        }
    }

    /// Metadata sections of one file version, as untyped JSON.
    ///
    /// # Errors
    ///
    /// A `status != "success"` envelope is [`ApiError::Format`].
    pub async fn file_metadata(&self, sat: Id, sub: Id, file: Id, ver: Id) -> Result<serde_json::Value, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let env: Envelope<serde_json::Value> = self.get_json(&metadata_endpoint(sat, sub, file, ver)).await?;
            env.into_success(UNEXPECTED_METADATA)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (sat, sub, file, ver);
            Err(ApiError::Unavailable)
        }
    }

    /// Raw payload of one file version.
    ///
    /// # Errors
    ///
    /// Returns the transport/status failure.
    pub async fn download(&self, sat: Id, sub: Id, file: Id, ver: Id) -> Result<Vec<u8>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.get_bytes(&download_endpoint(sat, sub, file, ver)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (sat, sub, file, ver);
            Err(ApiError::Unavailable)
        }
    }

    /// Recently updated files, `sort` is `"desc"` or `"asc"`. A 404 means the
    /// deployment has no recent-files view and is reported as an empty list.
    ///
    /// # Errors
    ///
    /// Returns the transport/status/format failure.
    pub async fn recent_files(&self, sort: &str) -> Result<Vec<RecentFile>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            match self.get_json::<Envelope<Vec<RecentFile>>>(&recent_files_endpoint(sort)).await {
                Ok(env) => env.into_success(UNEXPECTED_RECENT),
                Err(ApiError::NotFound) => Ok(Vec::new()),
                Err(e) => Err(e),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = sort;
            Err(ApiError::Unavailable)
        }
    }

    /// `GET /admin/system-status/`.
    ///
    /// # Errors
    ///
    /// Returns the transport/status/format failure.
    pub async fn system_status(&self) -> Result<SystemStatus, ApiError> {
        self.get_json("/admin/system-status/").await
    }
}
