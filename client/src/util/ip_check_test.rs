use std::cell::Cell;

use futures::executor::block_on;

use super::*;

fn server_ok(ip: &str) -> Result<ClientIp, ApiError> {
    Ok(ClientIp { status: "success".to_owned(), ip: Some(ip.to_owned()), message: None })
}

fn server_down() -> Result<ClientIp, ApiError> {
    Err(ApiError::Transport("offline".to_owned()))
}

fn external_down() -> Result<ExternalIp, ApiError> {
    Err(ApiError::Status { status: 503, detail: None })
}

// =============================================================
// Classification
// =============================================================

#[test]
fn localhost_is_allowed() {
    let status = classify("127.0.0.1");
    assert_eq!(status.network, "Localhost");
    assert!(status.is_allowed);
    assert!(status.checked);
    assert_eq!(status.message, ALLOWED_MESSAGE);
}

#[test]
fn emi_subnet_is_allowed() {
    let status = classify("10.72.177.42");
    assert_eq!(status.network, "EMI Network");
    assert!(status.is_allowed);
}

#[test]
fn other_emi_subnet_is_labelled_but_denied() {
    let status = classify("10.72.3.9");
    assert_eq!(status.network, "EMI Network (Other Subnet)");
    assert!(!status.is_allowed);
    assert_eq!(status.message, DENIED_MESSAGE);
}

#[test]
fn virtualbox_host_only_address_is_allowed() {
    assert!(classify("192.168.56.1").is_allowed);
    let guest = classify("192.168.56.7");
    assert_eq!(guest.network, "VirtualBox Network");
    assert!(!guest.is_allowed);
}

#[test]
fn unmatched_address_is_unknown_and_denied() {
    let status = classify("8.8.8.8");
    assert_eq!(status.network, UNKNOWN_NETWORK);
    assert!(!status.is_allowed);
    assert!(status.checks.iter().all(|c| !c.matches));
}

#[test]
fn checks_report_each_prefix() {
    let status = classify("10.72.177.1");
    let matched: Vec<&str> = status.checks.iter().filter(|c| c.matches).map(|c| c.prefix).collect();
    assert_eq!(status.checks.len(), ALLOWED_PREFIXES.len());
    assert_eq!(matched, vec!["10.72.177."]);
}

#[test]
fn longest_label_prefix_wins() {
    assert_eq!(network_label("10.72.177.200"), "EMI Network");
    assert_eq!(network_label("10.72.200.1"), "EMI Network (Other Subnet)");
}

// =============================================================
// Fallback chain
// =============================================================

#[test]
fn server_answer_is_used_directly() {
    let external_called = Cell::new(false);
    let status = block_on(resolve(
        || async { server_ok("10.72.177.8") },
        || {
            external_called.set(true);
            async { external_down() }
        },
        None,
    ));
    assert!(status.is_allowed);
    assert!(!external_called.get());
}

#[test]
fn server_failure_falls_back_to_external_service() {
    let status = block_on(resolve(
        || async { server_down() },
        || async { Ok::<_, ApiError>(ExternalIp { ip: "203.0.113.5".to_owned() }) },
        Some("dashboard.example.org"),
    ));
    assert_eq!(status.ip, "203.0.113.5");
    assert!(!status.is_allowed);
    assert_eq!(status.network, UNKNOWN_NETWORK);
}

#[test]
fn localhost_page_falls_back_to_loopback() {
    let status = block_on(resolve(|| async { server_down() }, || async { external_down() }, Some("localhost")));
    assert_eq!(status.ip, "127.0.0.1");
    assert!(status.is_allowed);
}

#[test]
fn all_lookups_failing_is_error_state() {
    let status = block_on(resolve(|| async { server_down() }, || async { external_down() }, Some("10.0.0.2")));
    assert_eq!(status, NetworkStatus::error());
    assert!(status.checked);
}

#[test]
fn server_error_status_uses_server_message() {
    let status = block_on(resolve(
        || async {
            Ok::<_, ApiError>(ClientIp { status: "error".to_owned(), ip: None, message: Some("Proxy misconfigured".to_owned()) })
        },
        || async { external_down() },
        None,
    ));
    assert_eq!(status.network, "Unknown");
    assert_eq!(status.ip, "unknown");
    assert_eq!(status.message, "Proxy misconfigured");
    assert!(!status.is_allowed);
}

#[test]
fn server_success_without_ip_is_unvalidated() {
    let status = block_on(resolve(
        || async { Ok::<_, ApiError>(ClientIp { status: "success".to_owned(), ip: None, message: None }) },
        || async { external_down() },
        None,
    ));
    assert_eq!(status.message, "Could not validate IP address");
}

#[test]
fn initial_status_is_checking() {
    let status = NetworkStatus::default();
    assert!(!status.checked);
    assert_eq!(status.ip, "checking...");
    assert_eq!(status.network, "Detecting...");
}
