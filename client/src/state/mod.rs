//! Application state shared through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` and `session` back the signed-in identity and its liveness loop;
//! the remaining modules hold page-level view state.

pub mod auth;
pub mod browser;
pub mod network;
pub mod recent;
pub mod search;
pub mod session;
