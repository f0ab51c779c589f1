//! Network-authorization banner shown under the navbar.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs the client IP check once per page load and shows whether the browser
//! appears to be inside the authorized network, with an optional details
//! panel listing each allow-list prefix.

use leptos::prelude::*;

use crate::state::auth::AuthContext;
use crate::state::network::NetworkStatus;
use crate::util::ip_check::{ALLOWED_PREFIXES, check_network};

#[component]
pub fn NetworkBanner() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let status = RwSignal::new(NetworkStatus::checking());
    let show_details = RwSignal::new(false);

    Effect::new(move || {
        let api = auth.plain_api();
        leptos::task::spawn_local(async move {
            let result = check_network(api).await;
            log::info!("network check: {} ({}), allowed: {}", result.ip, result.network, result.is_allowed);
            status.set(result);
        });
    });

    let details = move || {
        let s = status.get();
        view! {
            <div class="network-banner__details">
                <p>"IP: " {s.ip.clone()}</p>
                <p>"Network: " {s.network.clone()}</p>
                <p>"Allowed: " {if s.is_allowed { "Yes" } else { "No" }}</p>
                <p>"Allowed Prefixes: " {ALLOWED_PREFIXES.join(", ")}</p>
                <ul>
                    {s
                        .checks
                        .iter()
                        .map(|check| {
                            let class = if check.matches { "check check--match" } else { "check check--miss" };
                            view! {
                                <li class=class>
                                    {check.prefix} ": " {if check.matches { "Match" } else { "No Match" }}
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </div>
        }
    };

    let toggle = move |_| show_details.update(|v| *v = !*v);
    let toggle_label = move || if show_details.get() { "Hide Details" } else { "Show Details" };

    view! {
        <Show
            when=move || status.with(|s| s.checked)
            fallback=|| {
                view! {
                    <div class="network-banner network-banner--checking">
                        <p>"Checking network security status..."</p>
                    </div>
                }
            }
        >
            <Show
                when=move || status.with(|s| s.is_allowed)
                fallback=move || {
                    view! {
                        <div class="network-banner network-banner--denied">
                            <div class="network-banner__row">
                                <div class="network-banner__body">
                                    <p class="network-banner__title">"Network Security Warning"</p>
                                    <p>{move || status.with(|s| s.message.clone())}</p>
                                    <p class="network-banner__meta">
                                        {move || status.with(|s| format!("IP: {} - Network: {}", s.ip, s.network))}
                                    </p>
                                    <p class="network-banner__meta">
                                        "You may experience access restrictions. Please connect from an authorized network."
                                    </p>
                                </div>
                                <button class="network-banner__toggle" on:click=toggle>
                                    {toggle_label}
                                </button>
                            </div>
                            <Show when=move || show_details.get()>{details}</Show>
                        </div>
                    }
                }
            >
                <div class="network-banner network-banner--allowed">
                    <div class="network-banner__row">
                        <p class="network-banner__body">
                            {move || {
                                status
                                    .with(|s| format!("Secure connection: {} ({}) - Network: {}", s.message, s.ip, s.network))
                            }}
                        </p>
                        <button class="network-banner__toggle" on:click=toggle>
                            {toggle_label}
                        </button>
                    </div>
                    <Show when=move || show_details.get()>{details}</Show>
                </div>
            </Show>
        </Show>
    }
}
