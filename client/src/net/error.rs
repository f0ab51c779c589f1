//! Error taxonomy for calls against the telemetry API.
//!
//! ERROR HANDLING
//! ==============
//! Authorization failures are the only variant that carries session meaning:
//! the interceptor and the session monitor both key off
//! [`ApiError::is_session_invalid`]. Everything else is rendered inline by the
//! component that issued the request.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure of a single API request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),
    /// 401/403: the token is missing, expired, or revoked.
    #[error("{}", status_message(.status, .detail.as_deref()))]
    Unauthorized { status: u16, detail: Option<String> },
    /// 404: rendered as an empty result by most callers.
    #[error("not found")]
    NotFound,
    /// Any other non-success status.
    #[error("{}", status_message(.status, .detail.as_deref()))]
    Status { status: u16, detail: Option<String> },
    /// The response arrived but did not have the expected shape.
    #[error("{0}")]
    Format(String),
    /// Browser-only call attempted during server rendering.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Classify a non-success response from its status code and raw body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = response_detail(body);
        match status {
            401 | 403 => Self::Unauthorized { status, detail },
            404 => Self::NotFound,
            _ => Self::Status { status, detail },
        }
    }

    /// True for failures that mean the server no longer accepts the session.
    #[must_use]
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The message the server put in the error body, if any.
    #[must_use]
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail, .. } | Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::NotFound => Some(404),
            Self::Transport(_) | Self::Format(_) | Self::Unavailable => None,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn status_message(status: &u16, detail: Option<&str>) -> String {
    detail.map_or_else(|| format!("request failed with status {status}"), str::to_owned)
}

/// Pull a human-readable message out of an error body.
///
/// The backend reports failures as `{"detail": ...}` (framework errors) or
/// `{"error": ...}` (auth views). Plain-text bodies are used as-is when short.
pub(crate) fn response_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["detail", "error", "message"]
            .iter()
            .find_map(|key| value.get(*key))
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        Err(_) if trimmed.len() <= 200 && !trimmed.starts_with('<') => Some(trimmed.to_owned()),
        Err(_) => None,
    }
}
