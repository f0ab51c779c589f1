//! Standard-user dashboard: file search, recent files and the satellite
//! browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page owns the browser selection and the search results so that "View"
//! actions in the search table and the recent-files widget can focus the
//! browser further down the page.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::file_search::FileSearch;
use crate::components::recent_files::RecentFiles;
use crate::components::satellite_browser::{SatelliteBrowser, focus_browser};
use crate::net::types::Id;
use crate::state::auth::AuthContext;
use crate::state::browser::BrowserState;
use crate::state::search::SearchHit;

/// Header line under the page title.
pub(crate) fn welcome_line(username: &str, is_superuser: bool) -> String {
    let level = if is_superuser { "Administrator" } else { "Standard" };
    format!("Welcome, {username} | Access level: {level}")
}

/// Satellite/subsystem the browser jumps to after a search.
fn first_focus(hits: &[SearchHit]) -> Option<(Id, Id)> {
    hits.first().map(|hit| (hit.satellite_id, hit.subsystem_id))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let browser = RwSignal::new(BrowserState::default());
    let results = RwSignal::new(None::<Vec<SearchHit>>);

    let on_view = Callback::new(move |(sat, sub): (Id, Id)| focus_browser(auth, browser, sat, sub));
    let on_hits = Callback::new(move |hits: Vec<SearchHit>| {
        if let Some(target) = first_focus(&hits) {
            on_view.run(target);
        }
    });

    let username = move || auth.identity().map(|i| i.username).unwrap_or_default();

    let result_rows = move || {
        results
            .get()
            .unwrap_or_default()
            .into_iter()
            .map(|hit| {
                let (sat, sub) = (hit.satellite_id, hit.subsystem_id);
                view! {
                    <tr>
                        <td>{format!("{} (ID: {sat})", hit.satellite_name)}</td>
                        <td>{format!("Subsystem {sub}")}</td>
                        <td>{format!("File {}", hit.file_id)}</td>
                        <td>
                            <button class="link" on:click=move |_| on_view.run((sat, sub))>
                                "View"
                            </button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <div class="dashboard-page">
            <header class="page-header">
                <h1>"User Dashboard"</h1>
                <p>{move || welcome_line(&username(), false)}</p>
            </header>

            <FileSearch results=results on_hits=on_hits/>

            {move || match results.get() {
                None => view! { <RecentFiles on_view=on_view/> }.into_any(),
                Some(hits) if hits.is_empty() => {
                    view! {
                        <section class="panel panel--empty">
                            <p>"No files found matching your search criteria."</p>
                        </section>
                    }
                        .into_any()
                }
                Some(hits) => {
                    view! {
                        <section class="panel">
                            <h2>{format!("Search Results ({})", hits.len())}</h2>
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Satellite"</th>
                                        <th>"Subsystem"</th>
                                        <th>"File ID"</th>
                                        <th>"Actions"</th>
                                    </tr>
                                </thead>
                                <tbody>{result_rows}</tbody>
                            </table>
                        </section>
                    }
                        .into_any()
                }
            }}

            <SatelliteBrowser browser=browser/>
        </div>
    }
}
