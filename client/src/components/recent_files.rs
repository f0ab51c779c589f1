//! Recently updated files with a sort-order toggle.

use leptos::prelude::*;

use crate::net::error::ApiError;
use crate::net::types::{Id, RecentFile};
use crate::state::auth::AuthContext;
use crate::state::recent::{SortOrder, recent_error_message};

#[component]
pub fn RecentFiles(on_view: Callback<(Id, Id)>) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let sort = RwSignal::new(SortOrder::default());
    let files = RwSignal::new(Vec::<RecentFile>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let order = sort.get();
        loading.set(true);
        leptos::task::spawn_local(async move {
            match auth.api().recent_files(order.as_query()).await {
                Ok(list) => {
                    files.set(list);
                    error.set(None);
                }
                Err(ApiError::NotFound) => {
                    files.set(Vec::new());
                    error.set(None);
                }
                Err(e) => {
                    log::warn!("recent files: {e}");
                    error.set(Some(recent_error_message(&e)));
                }
            }
            loading.set(false);
        });
    });

    let rows = move || {
        files
            .get()
            .into_iter()
            .map(|file| {
                let (sat, sub) = (file.satellite_id, file.subsystem_id);
                view! {
                    <tr>
                        <td>{file.satellite_name}</td>
                        <td>{format!("Subsystem {sub}")}</td>
                        <td>{format!("File {}", file.file_id)}</td>
                        <td>
                            <div>{file.updated_date.unwrap_or_default()}</div>
                            <div class="muted">{file.updated_time_ago.unwrap_or_default()}</div>
                        </td>
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
        <section class="panel recent">
            <div class="panel__header">
                <h2>"Recently Updated Files"</h2>
                <button class="btn" on:click=move |_| sort.update(|s| *s = s.toggled())>
                    {move || format!("Sort: {}", sort.get().label())}
                </button>
            </div>
            {move || {
                if loading.get() {
                    view! { <p class="muted">"Loading recent files..."</p> }.into_any()
                } else if let Some(message) = error.get() {
                    view! { <p class="recent__error">{message}</p> }.into_any()
                } else if files.with(Vec::is_empty) {
                    view! { <p class="muted">"No recently updated files found."</p> }.into_any()
                } else {
                    view! {
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Satellite"</th>
                                    <th>"Subsystem"</th>
                                    <th>"File"</th>
                                    <th>"Last Updated"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>{rows}</tbody>
                        </table>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}
