//! # client
//!
//! Leptos + WASM frontend for browsing versioned satellite telemetry files.
//!
//! This crate contains pages, components, application state, the HTTP API
//! client, and the session-liveness driver that keeps the browser session in
//! step with the backend's short server-side expiry.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point called by the generated hydration script.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
