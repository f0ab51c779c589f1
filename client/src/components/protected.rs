//! Route wrapper that applies the auth guard.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthContext;
use crate::util::guard::{GuardDecision, evaluate, install_guard_redirect};

/// Render `children` only when the guard allows it; otherwise show a
/// placeholder while the redirect happens.
#[component]
pub fn Protected(#[prop(optional)] admin_only: bool, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    install_guard_redirect(auth, admin_only, use_navigate());

    let decision = move || auth.state.with(|s| evaluate(s, admin_only));

    view! {
        <Show
            when=move || decision() == GuardDecision::Render
            fallback=move || {
                view! {
                    <div class="page page--placeholder">
                        <p>
                            {move || {
                                if decision() == GuardDecision::Pending { "Loading..." } else { "Redirecting..." }
                            }}
                        </p>
                    </div>
                }
            }
        >
            {children()}
        </Show>
    }
}
