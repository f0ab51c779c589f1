//! Client IP lookup and allow-list classification.
//!
//! DESIGN
//! ======
//! The address is resolved once per page load through a fallback chain:
//! the backend's `/api/client-ip/`, then a public IP-echo service, then
//! `127.0.0.1` when the page itself is served from `localhost`. The address
//! is then matched by prefix. Nothing is enforced here; the result only
//! drives the banner.

#[cfg(test)]
#[path = "ip_check_test.rs"]
mod ip_check_test;

use std::future::Future;

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{ClientIp, ExternalIp};
use crate::state::network::{NetworkStatus, PrefixCheck};

/// Prefixes of addresses considered inside the authorized network.
pub const ALLOWED_PREFIXES: [&str; 3] = ["127.0.0.1", "10.72.177.", "192.168.56.1"];

/// Display labels, matched by longest prefix.
pub const NETWORK_LABELS: [(&str, &str); 4] = [
    ("127.0.0.1", "Localhost"),
    ("10.72.177.", "EMI Network"),
    ("10.72.", "EMI Network (Other Subnet)"),
    ("192.168.56.", "VirtualBox Network"),
];

pub const UNKNOWN_NETWORK: &str = "Unknown Network";
pub const ALLOWED_MESSAGE: &str = "Connected from authorized network";
pub const DENIED_MESSAGE: &str = "Warning: You appear to be connecting from outside the authorized network";

const LOCALHOST_FALLBACK_IP: &str = "127.0.0.1";

#[must_use]
pub fn network_label(ip: &str) -> &'static str {
    NETWORK_LABELS
        .iter()
        .filter(|(prefix, _)| ip.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map_or(UNKNOWN_NETWORK, |(_, label)| label)
}

/// Classify a resolved address against the allow-list.
#[must_use]
pub fn classify(ip: &str) -> NetworkStatus {
    let checks: Vec<PrefixCheck> = ALLOWED_PREFIXES
        .iter()
        .map(|prefix| PrefixCheck { prefix, matches: ip.starts_with(prefix) })
        .collect();
    let is_allowed = checks.iter().any(|c| c.matches);
    log::debug!("ip {ip} identified as {}, allowed: {is_allowed}", network_label(ip));
    NetworkStatus {
        ip: ip.to_owned(),
        network: network_label(ip).to_owned(),
        is_allowed,
        message: if is_allowed { ALLOWED_MESSAGE } else { DENIED_MESSAGE }.to_owned(),
        checked: true,
        checks,
    }
}

/// The backend answered but could not say who we are.
#[must_use]
pub fn unvalidated(ip: Option<&str>, message: Option<&str>) -> NetworkStatus {
    NetworkStatus {
        ip: ip.filter(|ip| !ip.is_empty()).unwrap_or("unknown").to_owned(),
        network: "Unknown".to_owned(),
        is_allowed: false,
        message: message.unwrap_or("Could not validate IP address").to_owned(),
        checked: true,
        checks: Vec::new(),
    }
}

/// Walk the fallback chain. `hostname` is the page's host, used for the
/// last-resort localhost fallback.
pub async fn resolve<S, SF, E, EF>(server: S, external: E, hostname: Option<&str>) -> NetworkStatus
where
    S: FnOnce() -> SF,
    SF: Future<Output = Result<ClientIp, ApiError>>,
    E: FnOnce() -> EF,
    EF: Future<Output = Result<ExternalIp, ApiError>>,
{
    match server().await {
        Ok(resp) => {
            return match resp.ip.as_deref().filter(|ip| !ip.is_empty()) {
                Some(ip) if resp.status == "success" => classify(ip),
                ip => unvalidated(ip, resp.message.as_deref()),
            };
        }
        Err(e) => log::warn!("client ip lookup failed: {e}; trying external service"),
    }
    match external().await {
        Ok(resp) => return classify(&resp.ip),
        Err(e) => log::warn!("external ip service failed: {e}"),
    }
    if hostname == Some("localhost") {
        return classify(LOCALHOST_FALLBACK_IP);
    }
    NetworkStatus::error()
}

/// Run the full check from the browser.
#[allow(clippy::unused_async)]
pub async fn check_network(api: ApiClient) -> NetworkStatus {
    #[cfg(feature = "hydrate")]
    {
        let hostname = web_sys::window().and_then(|w| w.location().hostname().ok());
        resolve(|| api.client_ip(), || api.external_ip(), hostname.as_deref()).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = api;
        NetworkStatus::checking()
    }
}
