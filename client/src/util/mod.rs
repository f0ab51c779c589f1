//! Helpers that sit between pages and the browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! Storage scopes, the route guard, the network check, the session driver and
//! file downloads. Each keeps its web-sys glue behind the `hydrate` feature so
//! the pure parts stay testable natively.

pub mod download;
pub mod guard;
pub mod ip_check;
pub mod session_driver;
pub mod storage;
