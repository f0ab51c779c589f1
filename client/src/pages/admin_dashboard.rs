//! Administrator dashboard: system overview plus the satellite browser.

#[cfg(test)]
#[path = "admin_dashboard_test.rs"]
mod admin_dashboard_test;

use leptos::prelude::*;

use crate::components::satellite_browser::SatelliteBrowser;
use crate::net::error::ApiError;
use crate::net::types::{SystemStatus, display_value};
use crate::pages::dashboard::welcome_line;
use crate::state::auth::AuthContext;
use crate::state::browser::BrowserState;

/// Label/value pairs of the system overview, in display order.
fn overview_metrics(status: &SystemStatus) -> [(&'static str, String); 3] {
    [
        ("Active Users", display_value(&status.active_users)),
        ("Storage Used", display_value(&status.storage_used)),
        ("Daily Alerts", display_value(&status.today_alerts)),
    ]
}

fn metrics_error_message(err: &ApiError) -> String {
    err.server_detail().unwrap_or("Failed to load system metrics").to_owned()
}

#[component]
fn MetricCard(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="metric-card">
            <span class="metric-card__label">{label}</span>
            <span class="metric-card__value">{value}</span>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let browser = RwSignal::new(BrowserState::default());
    let status = RwSignal::new(None::<Result<SystemStatus, String>>);

    Effect::new(move || {
        leptos::task::spawn_local(async move {
            let result = auth.api().system_status().await.map_err(|e| {
                log::warn!("system status: {e}");
                metrics_error_message(&e)
            });
            status.set(Some(result));
        });
    });

    let username = move || auth.identity().map(|i| i.username).unwrap_or_default();

    view! {
        <div class="dashboard-page dashboard-page--admin">
            <header class="page-header">
                <div>
                    <h1>"Admin Dashboard"</h1>
                    <p>{move || welcome_line(&username(), true)}</p>
                </div>
                <button class="btn btn--danger" on:click=move |_| auth.logout()>
                    "Logout"
                </button>
            </header>

            <section class="panel">
                <h2>"System Overview"</h2>
                {move || match status.get() {
                    None => view! { <p class="muted">"Loading system metrics..."</p> }.into_any(),
                    Some(Err(message)) => view! { <p class="overview__error">{message}</p> }.into_any(),
                    Some(Ok(metrics)) => {
                        view! {
                            <div class="metric-grid">
                                {overview_metrics(&metrics)
                                    .into_iter()
                                    .map(|(label, value)| view! { <MetricCard label=label value=value/> })
                                    .collect_view()}
                            </div>
                        }
                            .into_any()
                    }
                }}
            </section>

            <section class="panel">
                <h2>"Satellite Management"</h2>
                <SatelliteBrowser browser=browser admin_mode=true/>
            </section>
        </div>
    }
}
