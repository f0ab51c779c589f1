use super::*;

#[test]
fn unauthorized_statuses_invalidate_session() {
    let e401 = ApiError::from_response(401, r#"{"detail": "Invalid token"}"#);
    let e403 = ApiError::from_response(403, "");
    assert!(e401.is_session_invalid());
    assert!(e403.is_session_invalid());
    assert_eq!(e401.to_string(), "Invalid token");
    assert_eq!(e403.status(), Some(403));
}

#[test]
fn not_found_is_its_own_variant() {
    assert_eq!(ApiError::from_response(404, "{}"), ApiError::NotFound);
    assert!(!ApiError::NotFound.is_session_invalid());
}

#[test]
fn other_statuses_keep_server_detail() {
    let err = ApiError::from_response(500, r#"{"error": "disk full"}"#);
    assert_eq!(err, ApiError::Status { status: 500, detail: Some("disk full".to_owned()) });
    assert_eq!(err.server_detail(), Some("disk full"));
}

#[test]
fn missing_detail_falls_back_to_status_message() {
    let err = ApiError::from_response(502, "<html>bad gateway</html>");
    assert_eq!(err.to_string(), "request failed with status 502");
    assert_eq!(err.server_detail(), None);
}

#[test]
fn response_detail_prefers_detail_over_error() {
    assert_eq!(
        response_detail(r#"{"error": "b", "detail": "a"}"#),
        Some("a".to_owned())
    );
}

#[test]
fn response_detail_stringifies_non_string_values() {
    assert_eq!(
        response_detail(r#"{"detail": ["field required"]}"#),
        Some(r#"["field required"]"#.to_owned())
    );
}

#[test]
fn response_detail_accepts_short_plain_text() {
    assert_eq!(response_detail("Service Unavailable"), Some("Service Unavailable".to_owned()));
    assert_eq!(response_detail("   "), None);
}

#[test]
fn transport_and_format_errors_have_no_status() {
    assert_eq!(ApiError::Transport("offline".to_owned()).status(), None);
    assert_eq!(ApiError::Format("bad".to_owned()).status(), None);
}
