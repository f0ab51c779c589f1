//! Selection and listing state for the satellite browser.
//!
//! DESIGN
//! ======
//! The browser drills down satellite -> subsystem -> file -> version. Each
//! `apply_*` method takes the result of one listing request together with the
//! selection it was issued for; a result whose selection no longer matches is
//! dropped, so quick re-selection cannot show another satellite's files.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use std::collections::BTreeMap;

use crate::net::error::ApiError;
use crate::net::types::{FileEntry, FileVersion, Id, Satellite};

/// Per-request busy flags; each disables its own controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserLoading {
    pub satellites: bool,
    pub subsystems: bool,
    pub files: bool,
    pub versions: bool,
    pub metadata: bool,
    pub download: bool,
}

/// A fully qualified file version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VersionRef {
    pub sat: Id,
    pub sub: Id,
    pub file: Id,
    pub ver: Id,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrowserState {
    pub satellites: Vec<Satellite>,
    pub selected_satellite: Option<Id>,
    pub subsystems: Vec<Id>,
    pub selected_subsystem: Option<Id>,
    pub files: Vec<FileEntry>,
    /// Versions of the files whose version list is expanded.
    pub versions: BTreeMap<Id, Vec<FileVersion>>,
    pub metadata: Option<serde_json::Value>,
    /// Subsystem to select once the selected satellite's subsystems arrive.
    pub pending_subsystem: Option<Id>,
    pub loading: BrowserLoading,
    pub error: Option<String>,
}

impl BrowserState {
    pub fn select_satellite(&mut self, sat: Id) {
        self.selected_satellite = Some(sat);
        self.subsystems.clear();
        self.selected_subsystem = None;
        self.files.clear();
        self.versions.clear();
        self.pending_subsystem = None;
        self.loading.subsystems = true;
    }

    pub fn select_subsystem(&mut self, sub: Id) {
        self.selected_subsystem = Some(sub);
        self.files.clear();
        self.versions.clear();
        self.loading.files = true;
    }

    /// Jump to a satellite/subsystem pair picked elsewhere on the page.
    pub fn focus(&mut self, sat: Id, sub: Id) {
        self.select_satellite(sat);
        self.pending_subsystem = Some(sub);
    }

    pub fn apply_satellites(&mut self, result: Result<Vec<Satellite>, ApiError>) {
        self.loading.satellites = false;
        match result {
            Ok(satellites) => self.satellites = satellites,
            Err(e) => {
                log::warn!("satellite listing failed: {e}");
                self.error = Some("Failed to fetch satellites list".to_owned());
            }
        }
    }

    /// Returns the subsystem that became selected from a pending focus, whose
    /// files the caller must now load.
    pub fn apply_subsystems(&mut self, sat: Id, result: Result<Vec<Id>, ApiError>) -> Option<Id> {
        if self.selected_satellite != Some(sat) {
            return None;
        }
        self.loading.subsystems = false;
        let pending = self.pending_subsystem.take();
        match result {
            Ok(subsystems) => {
                self.subsystems = subsystems;
                let sub = pending.filter(|p| self.subsystems.contains(p))?;
                self.select_subsystem(sub);
                Some(sub)
            }
            Err(e) => {
                self.error = Some(format!("Failed to fetch subsystems: {e}"));
                None
            }
        }
    }

    pub fn apply_files(&mut self, sat: Id, sub: Id, result: Result<Vec<FileEntry>, ApiError>) {
        if self.selected_satellite != Some(sat) || self.selected_subsystem != Some(sub) {
            return;
        }
        self.loading.files = false;
        match result {
            Ok(files) => self.files = files,
            Err(ApiError::NotFound) => self.files.clear(),
            Err(e) => {
                self.error = Some(format!("Failed to fetch files: {e}"));
                self.files.clear();
            }
        }
    }

    /// Collapse `file` if expanded. Returns `true` when its versions must be
    /// fetched instead.
    pub fn toggle_versions(&mut self, file: Id) -> bool {
        if self.versions.remove(&file).is_some() {
            return false;
        }
        self.loading.versions = true;
        self.metadata = None;
        true
    }

    pub fn apply_versions(&mut self, sat: Id, sub: Id, file: Id, result: Result<Vec<FileVersion>, ApiError>) {
        self.loading.versions = false;
        if self.selected_satellite != Some(sat) || self.selected_subsystem != Some(sub) {
            return;
        }
        let versions = match result {
            Ok(versions) => versions,
            Err(ApiError::Format(message)) => {
                self.error = Some(message);
                Vec::new()
            }
            Err(e) => {
                self.error = Some(format!("Failed to fetch file versions: {e}"));
                Vec::new()
            }
        };
        self.versions.insert(file, versions);
    }

    pub fn apply_metadata(&mut self, result: Result<serde_json::Value, ApiError>) {
        self.loading.metadata = false;
        match result {
            Ok(metadata) => self.metadata = Some(metadata),
            Err(ApiError::Format(message)) => self.error = Some(message),
            Err(e) => self.error = Some(format!("Failed to fetch metadata: {e}")),
        }
    }

    pub fn apply_download(&mut self, result: Result<(), ApiError>) {
        self.loading.download = false;
        if let Err(e) = result {
            self.error = Some(format!("Failed to download file: {e}"));
        }
    }

    /// The fully qualified version for a row action, if the selection is
    /// complete.
    #[must_use]
    pub fn version_ref(&self, file: Id, ver: Id) -> Option<VersionRef> {
        Some(VersionRef { sat: self.selected_satellite?, sub: self.selected_subsystem?, file, ver })
    }

    #[must_use]
    pub fn is_expanded(&self, file: Id) -> bool {
        self.versions.contains_key(&file)
    }

    /// A subsystem is selected, its listing finished, and it has no files.
    #[must_use]
    pub fn shows_no_files(&self) -> bool {
        self.selected_subsystem.is_some() && !self.loading.files && self.files.is_empty()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
