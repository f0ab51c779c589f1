//! Wire DTOs for the telemetry API.
//!
//! DESIGN
//! ======
//! These types mirror the backend's JSON payloads. Identifiers arrive as JSON
//! numbers from most views but as numeric strings from a few older ones, so
//! every id field goes through [`deserialize_id`].

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::ApiError;

/// Satellite, subsystem, file and version identifiers.
pub type Id = u32;

/// Body of `POST /auth/login/`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `POST /auth/login/` response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub session_key: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub expires_in: Option<f64>,
}

/// `GET /auth/check-session-status/` response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SessionStatus {
    /// Seconds until the server expires the session.
    #[serde(default)]
    pub time_remaining: Option<f64>,
    /// ISO-8601 expiry timestamp.
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// `GET /api/client-ip/` response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ClientIp {
    pub status: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the public IP-echo fallback service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ExternalIp {
    pub ip: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
    pub name: String,
}

/// `GET /api/satellites/` response: `{data: {satellites: [...]}}`.
#[derive(Clone, Debug, Deserialize)]
pub struct SatellitesResponse {
    pub data: SatellitesData,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SatellitesData {
    #[serde(default)]
    pub satellites: Vec<Satellite>,
}

/// `GET /api/satellites/{sat}/subsystems/` response.
#[derive(Clone, Debug, Deserialize)]
pub struct SubsystemsResponse {
    pub subsystems: Vec<SubsystemRef>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SubsystemRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Id,
}

/// `GET .../subsystems/{sub}/files/` response. A missing `files` key is an
/// empty listing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub file_id: Id,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileVersion {
    #[serde(deserialize_with = "deserialize_id")]
    pub file_ver: Id,
}

/// A row of the recently-updated-files widget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentFile {
    #[serde(deserialize_with = "deserialize_id")]
    pub satellite_id: Id,
    pub satellite_name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub subsystem_id: Id,
    #[serde(deserialize_with = "deserialize_id")]
    pub file_id: Id,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub updated_time_ago: Option<String>,
    #[serde(default)]
    pub latest_version: Option<Id>,
}

/// `GET /admin/system-status/` response. Values are displayed verbatim, so
/// they stay untyped.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub active_users: serde_json::Value,
    #[serde(default)]
    pub storage_used: serde_json::Value,
    #[serde(default)]
    pub today_alerts: serde_json::Value,
}

/// `{status, data}` wrapper used by the file-version, metadata and recent-file
/// views.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T: Default> Envelope<T> {
    /// Unwrap a `status == "success"` envelope; anything else is a format
    /// error carrying `unexpected`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Format`] when the status is not `"success"`.
    pub fn into_success(self, unexpected: &str) -> Result<T, ApiError> {
        if self.status == "success" {
            Ok(self.data.unwrap_or_default())
        } else {
            log::warn!("unexpected envelope status {:?}: {:?}", self.status, self.message);
            Err(ApiError::Format(unexpected.to_owned()))
        }
    }
}

/// Render a loosely-typed JSON value the way the UI shows it: strings bare,
/// `null` as a dash, everything else as JSON text.
#[must_use]
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_owned(),
        other => other.to_string(),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Id, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => number
            .as_u64()
            .and_then(|n| Id::try_from(n).ok())
            .ok_or_else(|| D::Error::custom("expected non-negative integer id")),
        serde_json::Value::String(raw) => raw
            .trim()
            .parse::<Id>()
            .map_err(|_| D::Error::custom(format!("expected numeric id, got {raw:?}"))),
        _ => Err(D::Error::custom("expected number or numeric string")),
    }
}
