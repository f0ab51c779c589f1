//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped state and delegates rendering details to
//! `components`. Access control is applied around pages by
//! `components::protected::Protected`, not inside them.

pub mod admin_dashboard;
pub mod dashboard;
pub mod login;
pub mod not_found;
