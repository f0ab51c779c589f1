//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AuthContext`] is provided at the app root. Route guards read it to decide
//! redirects, pages read the identity for display, and the session driver
//! reads and terminates it. The identity lives in browser storage, so it is
//! unknown during server rendering: `loading` stays `true` until the hydrated
//! app has read storage.
//!
//! ERROR HANDLING
//! ==============
//! Logout is best-effort. A failed `POST /auth/logout/` is logged and the local
//! clear and redirect happen anyway.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::future::Future;

use leptos::prelude::*;

use super::session::SessionMonitor;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{LoginResponse, SessionStatus};
use crate::util::storage::{Durability, IdentityStore, KeyValueStore};

/// The signed-in user as persisted in browser storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub token: String,
    pub username: String,
    pub is_superuser: bool,
}

impl Identity {
    #[must_use]
    pub fn from_login(resp: &LoginResponse) -> Self {
        Self {
            token: resp.token.clone(),
            username: resp.username.clone(),
            is_superuser: resp.is_superuser,
        }
    }

    /// Where a fresh login lands.
    #[must_use]
    pub fn home_path(&self) -> &'static str {
        if self.is_superuser { "/admin-dashboard" } else { "/dashboard" }
    }
}

/// Server-reported session lifetime from the last successful status check.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionInfo {
    pub expires_at: Option<String>,
    pub time_remaining_secs: f64,
}

impl SessionInfo {
    /// `None` unless the server reported a non-zero remaining time.
    #[must_use]
    pub fn from_status(status: &SessionStatus) -> Option<Self> {
        let remaining = status.time_remaining.filter(|t| *t != 0.0)?;
        Some(Self { expires_at: status.expires_at.clone(), time_remaining_secs: remaining })
    }

    /// "45s" or "2m 05s".
    #[must_use]
    pub fn remaining_label(&self) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = self.time_remaining_secs.max(0.0).round() as u64;
        if total < 60 {
            format!("{total}s")
        } else {
            format!("{}m {:02}s", total / 60, total % 60)
        }
    }
}

/// Authentication state tracking the current identity and loading status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub identity: Option<Identity>,
    pub session: Option<SessionInfo>,
    /// Storage has not been read yet (server render and first hydrate pass).
    pub loading: bool,
    pub logging_out: bool,
}

impl AuthState {
    /// State before browser storage has been consulted.
    #[must_use]
    pub fn booting() -> Self {
        Self { loading: true, ..Self::default() }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.token.as_str())
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Mark a logout as started. Returns `false` when one is already running.
    pub fn begin_logout(&mut self) -> bool {
        if self.logging_out {
            return false;
        }
        self.logging_out = true;
        true
    }

    fn reset_signed_out(&mut self) {
        *self = Self::default();
    }
}

/// Record a successful login in `store` and `state`.
pub fn apply_login<S: KeyValueStore>(
    state: &mut AuthState,
    store: &IdentityStore<S>,
    identity: Identity,
    durability: Durability,
) {
    store.save(&identity, durability);
    state.identity = Some(identity);
    state.session = None;
    state.loading = false;
    state.logging_out = false;
}

/// Local half of logout: wipe both storage scopes and the in-memory session.
pub fn complete_logout<S: KeyValueStore>(state: &mut AuthState, store: &IdentityStore<S>) {
    store.clear();
    state.reset_signed_out();
}

/// Tell the server the session is over, if there is one. Failures are logged
/// and swallowed.
pub async fn notify_logout<F, Fut>(token: Option<String>, remote: F)
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let Some(token) = token else {
        return;
    };
    if let Err(e) = remote(token).await {
        log::warn!("logout request failed: {e}");
    }
}

/// Shared handle to the auth state and the session monitor.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: RwSignal<AuthState>,
    pub monitor: StoredValue<SessionMonitor>,
}

impl AuthContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(AuthState::booting()),
            monitor: StoredValue::new(SessionMonitor::new()),
        }
    }

    /// Current identity (tracked).
    pub fn identity(&self) -> Option<Identity> {
        self.state.with(|s| s.identity.clone())
    }

    /// Read the persisted identity once the app runs in the browser.
    pub fn restore(&self) {
        let identity = IdentityStore::browser().load();
        if let Some(identity) = &identity {
            log::info!("restored session for {}", identity.username);
        }
        self.state.update(|s| {
            s.identity = identity;
            s.loading = false;
        });
    }

    pub fn login(&self, resp: &LoginResponse, remember: bool) -> Identity {
        let identity = Identity::from_login(resp);
        log::info!(
            "login succeeded for {}, token {}",
            identity.username,
            crate::net::api::token_preview(Some(&identity.token))
        );
        let store = IdentityStore::browser();
        self.state
            .update(|s| apply_login(s, &store, identity.clone(), Durability::from_remember(remember)));
        identity
    }

    /// API client carrying the current token, without the logout hook. Used
    /// where the caller decides what an authorization failure means.
    pub fn plain_api(&self) -> ApiClient {
        self.state
            .with_untracked(|s| s.token().map(ApiClient::with_token))
            .unwrap_or_default()
    }

    /// API client carrying the current token. A 401/403 from any call made
    /// with it logs the user out.
    pub fn api(&self) -> ApiClient {
        let ctx = *self;
        self.plain_api().on_unauthorized(Callback::new(move |()| ctx.logout()))
    }

    /// Run the logout procedure once; concurrent calls are ignored.
    pub fn logout(&self) {
        let mut started = false;
        self.state.update(|s| started = s.begin_logout());
        if !started {
            return;
        }
        let token = self.state.with_untracked(|s| s.token().map(str::to_owned));
        let state = self.state;

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            notify_logout(token, |t| async move { ApiClient::with_token(t).logout().await }).await;
            state.update(|s| complete_logout(s, &IdentityStore::browser()));
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/login");
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            state.update(|s| complete_logout(s, &IdentityStore::browser()));
        }
    }

    /// Apply a successful status check.
    pub fn set_session(&self, status: &SessionStatus) {
        if let Some(info) = SessionInfo::from_status(status) {
            self.state.update(|s| s.session = Some(info));
        }
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}
