//! Dismissible inline error banner.

use leptos::prelude::*;

#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div class="error-banner" role="alert">
                <p class="error-banner__text">"Error: " {move || message.get().unwrap_or_default()}</p>
                <button class="error-banner__dismiss" on:click=move |_| on_dismiss.run(())>
                    "Dismiss"
                </button>
            </div>
        </Show>
    }
}
