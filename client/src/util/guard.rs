//! Route guard shared by every protected page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes apply identical redirect behavior: no identity goes to
//! `/login`, a non-admin on an admin route goes to `/dashboard`. While the
//! identity is still being read from storage nothing is decided.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::{AuthContext, AuthState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Pending,
    Render,
    RedirectToLogin,
    RedirectToDashboard,
}

impl GuardDecision {
    #[must_use]
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some("/login"),
            Self::RedirectToDashboard => Some("/dashboard"),
            Self::Pending | Self::Render => None,
        }
    }
}

#[must_use]
pub fn evaluate(state: &AuthState, admin_only: bool) -> GuardDecision {
    if state.loading {
        return GuardDecision::Pending;
    }
    match &state.identity {
        None => GuardDecision::RedirectToLogin,
        Some(identity) if admin_only && !identity.is_superuser => GuardDecision::RedirectToDashboard,
        Some(_) => GuardDecision::Render,
    }
}

/// Navigate away whenever the guard decides the current route is not allowed.
pub fn install_guard_redirect<F>(auth: AuthContext, admin_only: bool, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let decision = auth.state.with(|s| evaluate(s, admin_only));
        if let Some(path) = decision.redirect_path() {
            log::debug!("route guard redirecting to {path}");
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
