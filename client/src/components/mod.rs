//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the shared `AuthContext` from Leptos context and receive
//! page-owned state (browser selection, search results) as props.

pub mod error_banner;
pub mod file_search;
pub mod metadata_view;
pub mod navbar;
pub mod network_banner;
pub mod protected;
pub mod recent_files;
pub mod satellite_browser;
