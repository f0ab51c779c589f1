//! Username/password login page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::error::ApiError;
use crate::state::auth::AuthContext;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

/// Trim the username and require both fields.
fn validate_credentials(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Message shown for a rejected login.
fn login_error_message(err: &ApiError) -> String {
    err.server_detail().unwrap_or(LOGIN_FAILED).to_owned()
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let remember = RwSignal::new(false);
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (user, pass) = match validate_credentials(&username.get_untracked(), &password.get_untracked()) {
            Ok(creds) => creds,
            Err(message) => {
                error.set(Some(message.to_owned()));
                return;
            }
        };
        busy.set(true);
        error.set(None);
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::ApiClient::anonymous().login(&user, &pass).await {
                Ok(resp) => {
                    let identity = auth.login(&resp, remember.get_untracked());
                    navigate(identity.home_path(), NavigateOptions::default());
                }
                Err(e) => {
                    log::warn!("login failed for {user}: {e}");
                    error.set(Some(login_error_message(&e)));
                }
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Satellite Data System"</h1>
                <form class="login-form" on:submit=on_submit>
                    <label class="field" for="username">
                        <span>"Username"</span>
                        <input
                            id="username"
                            class="login-input"
                            type="text"
                            autocomplete="username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field" for="password">
                        <span>"Password"</span>
                        <input
                            id="password"
                            class="login-input"
                            type="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="login-form__remember" for="remember-me">
                        <input
                            id="remember-me"
                            type="checkbox"
                            prop:checked=move || remember.get()
                            on:change=move |ev| remember.set(event_target_checked(&ev))
                        />
                        <span>"Remember me"</span>
                    </label>
                    <Show when=move || error.get().is_some()>
                        <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Logging in..." } else { "Login" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
