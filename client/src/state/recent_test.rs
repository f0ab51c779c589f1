use super::*;

#[test]
fn default_is_newest_first() {
    assert_eq!(SortOrder::default().as_query(), "desc");
    assert_eq!(SortOrder::default().label(), "Newest First");
}

#[test]
fn toggle_flips_direction() {
    let oldest = SortOrder::NewestFirst.toggled();
    assert_eq!(oldest.as_query(), "asc");
    assert_eq!(oldest.label(), "Oldest First");
    assert_eq!(oldest.toggled(), SortOrder::NewestFirst);
}

#[test]
fn transport_failure_reads_as_connection_error() {
    let err = ApiError::Transport("failed to fetch".to_owned());
    assert_eq!(recent_error_message(&err), "Error connecting to server");
}

#[test]
fn unexpected_payload_keeps_its_message() {
    let err = ApiError::Format("Failed to fetch recent files".to_owned());
    assert_eq!(recent_error_message(&err), "Failed to fetch recent files");
}
