use super::*;

fn files(ids: &[Id]) -> Vec<FileEntry> {
    ids.iter().map(|&file_id| FileEntry { file_id }).collect()
}

fn with_subsystem(sat: Id, sub: Id) -> BrowserState {
    let mut state = BrowserState::default();
    state.select_satellite(sat);
    state.apply_subsystems(sat, Ok(vec![sub]));
    state.select_subsystem(sub);
    state
}

// =============================================================
// Selection resets
// =============================================================

#[test]
fn selecting_satellite_clears_downstream_selection() {
    let mut state = with_subsystem(2, 6);
    state.apply_files(2, 6, Ok(files(&[14])));
    state.toggle_versions(14);
    state.apply_versions(2, 6, 14, Ok(vec![FileVersion { file_ver: 1 }]));

    state.select_satellite(1);
    assert_eq!(state.selected_satellite, Some(1));
    assert_eq!(state.selected_subsystem, None);
    assert!(state.subsystems.is_empty());
    assert!(state.files.is_empty());
    assert!(state.versions.is_empty());
    assert!(state.loading.subsystems);
}

#[test]
fn selecting_subsystem_clears_files_and_versions() {
    let mut state = with_subsystem(2, 6);
    state.apply_files(2, 6, Ok(files(&[14, 15])));
    state.toggle_versions(14);
    state.apply_versions(2, 6, 14, Ok(vec![FileVersion { file_ver: 1 }]));

    state.select_subsystem(7);
    assert!(state.files.is_empty());
    assert!(state.versions.is_empty());
    assert!(state.loading.files);
}

// =============================================================
// Pending focus
// =============================================================

#[test]
fn focus_applies_pending_subsystem_when_present() {
    let mut state = BrowserState::default();
    state.focus(2, 6);
    assert_eq!(state.apply_subsystems(2, Ok(vec![5, 6])), Some(6));
    assert_eq!(state.selected_subsystem, Some(6));
    assert_eq!(state.pending_subsystem, None);
}

#[test]
fn focus_ignores_pending_subsystem_when_absent() {
    let mut state = BrowserState::default();
    state.focus(2, 9);
    assert_eq!(state.apply_subsystems(2, Ok(vec![5, 6])), None);
    assert_eq!(state.selected_subsystem, None);
    assert_eq!(state.pending_subsystem, None);
}

#[test]
fn stale_subsystem_listing_is_dropped() {
    let mut state = BrowserState::default();
    state.select_satellite(1);
    state.select_satellite(2);
    state.apply_subsystems(1, Ok(vec![3]));
    assert!(state.subsystems.is_empty());
    assert!(state.loading.subsystems);
}

// =============================================================
// Listings and errors
// =============================================================

#[test]
fn empty_file_listing_shows_empty_state_without_error() {
    let mut state = with_subsystem(2, 6);
    assert!(!state.shows_no_files());
    state.apply_files(2, 6, Ok(Vec::new()));
    assert!(state.shows_no_files());
    assert_eq!(state.error, None);
}

#[test]
fn file_listing_error_sets_banner() {
    let mut state = with_subsystem(2, 6);
    state.apply_files(2, 6, Err(ApiError::Status { status: 500, detail: Some("db down".to_owned()) }));
    assert_eq!(state.error.as_deref(), Some("Failed to fetch files: db down"));
    assert!(state.files.is_empty());
}

#[test]
fn stale_file_listing_is_dropped() {
    let mut state = with_subsystem(2, 6);
    state.select_subsystem(7);
    state.apply_files(2, 6, Ok(files(&[1])));
    assert!(state.files.is_empty());
    assert!(state.loading.files);
}

#[test]
fn satellites_failure_uses_fixed_message() {
    let mut state = BrowserState { loading: BrowserLoading { satellites: true, ..BrowserLoading::default() }, ..BrowserState::default() };
    state.apply_satellites(Err(ApiError::Transport("offline".to_owned())));
    assert!(!state.loading.satellites);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch satellites list"));
}

#[test]
fn toggle_versions_expands_then_collapses() {
    let mut state = with_subsystem(2, 6);
    assert!(state.toggle_versions(14));
    state.apply_versions(2, 6, 14, Ok(vec![FileVersion { file_ver: 1 }, FileVersion { file_ver: 2 }]));
    assert!(state.is_expanded(14));
    assert!(!state.toggle_versions(14));
    assert!(!state.is_expanded(14));
}

#[test]
fn unexpected_versions_payload_expands_empty_with_error() {
    let mut state = with_subsystem(2, 6);
    state.toggle_versions(14);
    state.apply_versions(2, 6, 14, Err(ApiError::Format("Server returned data in unexpected format".to_owned())));
    assert_eq!(state.versions.get(&14), Some(&Vec::new()));
    assert_eq!(state.error.as_deref(), Some("Server returned data in unexpected format"));
}

#[test]
fn metadata_and_download_errors_are_prefixed() {
    let mut state = with_subsystem(2, 6);
    state.apply_metadata(Err(ApiError::Transport("timeout".to_owned())));
    assert_eq!(state.error.as_deref(), Some("Failed to fetch metadata: network error: timeout"));
    state.dismiss_error();
    state.apply_download(Err(ApiError::NotFound));
    assert_eq!(state.error.as_deref(), Some("Failed to download file: not found"));
}

#[test]
fn version_ref_requires_full_selection() {
    let mut state = BrowserState::default();
    assert_eq!(state.version_ref(14, 1), None);
    state = with_subsystem(2, 6);
    assert_eq!(state.version_ref(14, 1), Some(VersionRef { sat: 2, sub: 6, file: 14, ver: 1 }));
}
