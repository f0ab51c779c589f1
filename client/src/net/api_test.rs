use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

#[test]
fn listing_endpoints_keep_trailing_slashes() {
    assert_eq!(subsystems_endpoint(2), "/api/satellites/2/subsystems/");
    assert_eq!(files_endpoint(2, 6), "/api/satellites/2/subsystems/6/files/");
    assert_eq!(versions_endpoint(2, 6, 14), "/api/satellites/2/subsystems/6/files/14/");
}

#[test]
fn version_endpoints_nest_under_file() {
    assert_eq!(metadata_endpoint(1, 3, 7, 2), "/api/satellites/1/subsystems/3/files/7/version/2/");
    assert_eq!(
        download_endpoint(1, 3, 7, 2),
        "/api/satellites/1/subsystems/3/files/7/version/2/download/"
    );
}

#[test]
fn client_ip_endpoint_carries_cache_bust() {
    assert_eq!(client_ip_endpoint(1_700_000_000_000), "/api/client-ip/?t=1700000000000");
}

#[test]
fn recent_files_endpoint_passes_sort() {
    assert_eq!(recent_files_endpoint("asc"), "/api/files/recent/?sort=asc");
}

#[test]
fn authorization_uses_token_scheme() {
    assert_eq!(authorization_value("abc"), "Token abc");
}

#[test]
fn token_preview_truncates_and_handles_absence() {
    assert_eq!(token_preview(Some("abcdefghij")), "abcde...");
    assert_eq!(token_preview(Some("ab")), "ab...");
    assert_eq!(token_preview(Some("")), "none");
    assert_eq!(token_preview(None), "none");
}

#[test]
fn anonymous_client_has_no_token() {
    assert_eq!(ApiClient::anonymous().token(), None);
    assert_eq!(ApiClient::with_token("t0k").token(), Some("t0k"));
}

#[test]
fn intercept_fires_hook_only_for_authorization_failures() {
    let owner = Owner::new();
    owner.with(|| {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let client = ApiClient::with_token("t0k").on_unauthorized(Callback::new(move |()| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let err = client.intercept(ApiError::from_response(401, ""));
        assert!(err.is_session_invalid());
        client.intercept(ApiError::from_response(403, ""));
        client.intercept(ApiError::from_response(500, ""));
        client.intercept(ApiError::NotFound);
        client.intercept(ApiError::Transport("offline".to_owned()));

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    });
}

#[test]
fn intercept_without_hook_returns_error_unchanged() {
    let err = ApiClient::anonymous().intercept(ApiError::from_response(401, r#"{"error": "bad credentials"}"#));
    assert_eq!(err.server_detail(), Some("bad credentials"));
}

#[test]
fn calls_are_unavailable_outside_the_browser() {
    let client = ApiClient::with_token("t");
    assert_eq!(futures::executor::block_on(client.satellites()), Err(ApiError::Unavailable));
    assert_eq!(futures::executor::block_on(client.ping_session()), Err(ApiError::Unavailable));
}
