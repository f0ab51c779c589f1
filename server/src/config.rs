//! Server configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! [`ServerConfig::from_lookup`] takes the variable source as a closure so
//! tests can parse configurations without touching the process environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("SATDASH_API_BASE_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Backend API origin without a trailing slash.
    pub api_base_url: String,
    pub upstream_timeout: Duration,
    /// Largest request body forwarded upstream.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `SATDASH_API_BASE_URL`: default `http://localhost:8000`
    /// - `SATDASH_UPSTREAM_TIMEOUT_SECS`: default 30
    /// - `SATDASH_MAX_BODY_BYTES`: default 10 MiB
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("SATDASH_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(api_base_url));
        }

        Ok(Self {
            bind_addr: parse_var(&lookup, "BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            api_base_url,
            upstream_timeout: Duration::from_secs(parse_var(
                &lookup,
                "SATDASH_UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
            max_body_bytes: parse_var(&lookup, "SATDASH_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
