//! Search form for locating files by satellite, subsystem and file id.

use leptos::prelude::*;

use crate::net::types::Satellite;
use crate::state::auth::AuthContext;
use crate::state::search::{SearchForm, SearchHit, search};

/// Search form. Results (or `None` when cleared) are written to `results`;
/// `on_hits` receives every non-empty result set.
#[component]
pub fn FileSearch(results: RwSignal<Option<Vec<SearchHit>>>, on_hits: Callback<Vec<SearchHit>>) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let form = RwSignal::new(SearchForm::default());
    let satellites = RwSignal::new(Vec::<Satellite>::new());
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        leptos::task::spawn_local(async move {
            match auth.api().satellites().await {
                Ok(list) => satellites.set(list),
                Err(e) => log::warn!("search: satellite list unavailable: {e}"),
            }
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let query = match form.with_untracked(SearchForm::parse) {
            Ok(query) => query,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        error.set(None);
        busy.set(true);
        leptos::task::spawn_local(async move {
            match search(&auth.api(), query).await {
                Ok(hits) => {
                    if !hits.is_empty() {
                        on_hits.run(hits.clone());
                    }
                    results.set(Some(hits));
                }
                Err(e) => {
                    log::warn!("search failed: {e}");
                    error.set(Some(format!("Search failed: {e}")));
                    results.set(Some(Vec::new()));
                }
            }
            busy.set(false);
        });
    };

    let on_clear = move |_| {
        form.set(SearchForm::default());
        error.set(None);
        results.set(None);
    };

    view! {
        <section class="panel search">
            <h2>"Search Files"</h2>
            <form class="search__form" on:submit=on_submit>
                <label class="field">
                    <span>"Satellite"</span>
                    <select
                        prop:value=move || form.with(|f| f.satellite_id.clone())
                        on:change=move |ev| form.update(|f| f.satellite_id = event_target_value(&ev))
                    >
                        <option value="">"All Satellites"</option>
                        {move || {
                            satellites
                                .get()
                                .into_iter()
                                .map(|sat| view! { <option value=sat.id.to_string()>{sat.name}</option> })
                                .collect_view()
                        }}
                    </select>
                </label>
                <label class="field">
                    <span>"Subsystem ID"</span>
                    <input
                        type="text"
                        placeholder="e.g., 6"
                        prop:value=move || form.with(|f| f.subsystem_id.clone())
                        on:input=move |ev| form.update(|f| f.subsystem_id = event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"File ID"</span>
                    <input
                        type="text"
                        placeholder="e.g., 14"
                        prop:value=move || form.with(|f| f.file_id.clone())
                        on:input=move |ev| form.update(|f| f.file_id = event_target_value(&ev))
                    />
                </label>
                <div class="search__actions">
                    <button class="btn" type="button" on:click=on_clear>
                        "Clear"
                    </button>
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Searching..." } else { "Search" }}
                    </button>
                </div>
            </form>
            <Show when=move || error.get().is_some()>
                <p class="search__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <div class="search__tips">
                <h3>"Search Tips"</h3>
                <ul>
                    <li>"Leave a field empty to match any value."</li>
                    <li>"Pick a satellite to narrow the search to its subsystems."</li>
                    <li>"Subsystem and file IDs are whole numbers."</li>
                </ul>
            </div>
        </section>
    }
}
