//! Top navigation bar with identity and session countdown.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::AuthContext;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    let username = move || auth.state.with(|s| s.identity.as_ref().map(|i| i.username.clone()));
    let remaining = move || auth.state.with(|s| s.session.as_ref().map(|info| info.remaining_label()));

    view! {
        <nav class="navbar">
            <A href="/" attr:class="navbar__brand">
                "Satellite System"
            </A>
            <Show
                when=move || username().is_some()
                fallback=|| {
                    view! {
                        <A href="/login" attr:class="btn navbar__login">
                            "Login"
                        </A>
                    }
                }
            >
                <div class="navbar__user">
                    <span>"Hello, " {move || username().unwrap_or_default()}</span>
                    <Show when=move || remaining().is_some()>
                        <span class="navbar__session" title="Server session time remaining">
                            "Session: " {move || remaining().unwrap_or_default()}
                        </span>
                    </Show>
                    <button class="btn btn--danger" on:click=move |_| auth.logout()>
                        "Logout"
                    </button>
                </div>
            </Show>
        </nav>
    }
}
