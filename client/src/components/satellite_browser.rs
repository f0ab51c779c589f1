//! Satellite -> subsystem -> file -> version drill-down.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by both dashboards. The owning page creates the [`BrowserState`]
//! signal so sibling widgets (search results, recent files) can focus the
//! browser on a satellite/subsystem pair through [`focus_browser`].

use leptos::prelude::*;

use crate::components::error_banner::ErrorBanner;
use crate::components::metadata_view::MetadataView;
use crate::net::error::ApiError;
use crate::net::types::{FileVersion, Id};
use crate::state::auth::AuthContext;
use crate::state::browser::BrowserState;
use crate::util::download::{download_filename, save_bytes};

/// DOM id of the browser root, used to scroll it into view.
pub const BROWSER_ANCHOR_ID: &str = "satellite-browser";

fn load_satellites(auth: AuthContext, browser: RwSignal<BrowserState>) {
    browser.update(|b| b.loading.satellites = true);
    leptos::task::spawn_local(async move {
        let result = auth.api().satellites().await;
        browser.update(|b| b.apply_satellites(result));
    });
}

fn load_subsystems(auth: AuthContext, browser: RwSignal<BrowserState>, sat: Id) {
    leptos::task::spawn_local(async move {
        let result = auth.api().subsystems(sat).await;
        let mut focused = None;
        browser.update(|b| focused = b.apply_subsystems(sat, result));
        if let Some(sub) = focused {
            load_files(auth, browser, sat, sub);
        }
    });
}

fn load_files(auth: AuthContext, browser: RwSignal<BrowserState>, sat: Id, sub: Id) {
    leptos::task::spawn_local(async move {
        let result = auth.api().files(sat, sub).await;
        browser.update(|b| b.apply_files(sat, sub, result));
    });
}

/// Select `sat`, queue `sub` for selection once its subsystems load, and
/// scroll the browser into view.
pub fn focus_browser(auth: AuthContext, browser: RwSignal<BrowserState>, sat: Id, sub: Id) {
    browser.update(|b| b.focus(sat, sub));
    load_subsystems(auth, browser, sat);

    #[cfg(feature = "hydrate")]
    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(BROWSER_ANCHOR_ID))
    {
        el.scroll_into_view();
    }
}

fn parse_selection(raw: &str) -> Option<Id> {
    raw.trim().parse().ok()
}

#[component]
pub fn SatelliteBrowser(browser: RwSignal<BrowserState>, #[prop(optional)] admin_mode: bool) -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    Effect::new(move || load_satellites(auth, browser));

    let on_satellite = move |ev: leptos::ev::Event| {
        let Some(sat) = parse_selection(&event_target_value(&ev)) else {
            return;
        };
        browser.update(|b| b.select_satellite(sat));
        load_subsystems(auth, browser, sat);
    };

    let on_subsystem = move |ev: leptos::ev::Event| {
        let Some(sub) = parse_selection(&event_target_value(&ev)) else {
            return;
        };
        let Some(sat) = browser.with_untracked(|b| b.selected_satellite) else {
            return;
        };
        browser.update(|b| b.select_subsystem(sub));
        load_files(auth, browser, sat, sub);
    };

    let on_toggle_versions = move |file: Id| {
        let Some((sat, sub)) = browser.with_untracked(|b| b.selected_satellite.zip(b.selected_subsystem)) else {
            return;
        };
        let mut fetch = false;
        browser.update(|b| fetch = b.toggle_versions(file));
        if !fetch {
            return;
        }
        leptos::task::spawn_local(async move {
            let result = auth.api().file_versions(sat, sub, file).await;
            browser.update(|b| b.apply_versions(sat, sub, file, result));
        });
    };

    let on_metadata = move |file: Id, ver: Id| {
        let Some(target) = browser.with_untracked(|b| b.version_ref(file, ver)) else {
            return;
        };
        browser.update(|b| b.loading.metadata = true);
        leptos::task::spawn_local(async move {
            let result = auth.api().file_metadata(target.sat, target.sub, target.file, target.ver).await;
            browser.update(|b| b.apply_metadata(result));
        });
    };

    let on_download = move |file: Id, ver: Id| {
        let Some(target) = browser.with_untracked(|b| b.version_ref(file, ver)) else {
            return;
        };
        browser.update(|b| b.loading.download = true);
        leptos::task::spawn_local(async move {
            let result = auth
                .api()
                .download(target.sat, target.sub, target.file, target.ver)
                .await
                .and_then(|bytes| save_bytes(&bytes, &download_filename(target)).map_err(ApiError::Format));
            browser.update(|b| b.apply_download(result));
        });
    };

    let selected_satellite = move || browser.with(|b| b.selected_satellite);
    let selected_subsystem = move || browser.with(|b| b.selected_subsystem);
    let loading = move || browser.with(|b| b.loading);

    let version_cards = move |file: Id, versions: Vec<FileVersion>| {
        if versions.is_empty() {
            return view! { <p class="browser__empty-versions">"No versions found for this file"</p> }.into_any();
        }
        versions
            .into_iter()
            .map(|version| {
                let ver = version.file_ver;
                view! {
                    <div class="version-card">
                        <div>
                            <span class="version-card__label">"Version:"</span>
                            <p class="version-card__number">{ver}</p>
                        </div>
                        <div class="version-card__actions">
                            <button
                                class="link link--green"
                                disabled=move || loading().metadata
                                on:click=move |_| on_metadata(file, ver)
                            >
                                "Metadata"
                            </button>
                            <button
                                class="link link--purple"
                                disabled=move || loading().download
                                on:click=move |_| on_download(file, ver)
                            >
                                "Download"
                            </button>
                        </div>
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    let file_rows = move || {
        browser
            .with(|b| b.files.clone())
            .into_iter()
            .map(|entry| {
                let file = entry.file_id;
                let expanded = move || browser.with(|b| b.versions.get(&file).cloned());
                view! {
                    <tr>
                        <td class="files__id">"File " {file}</td>
                        <td class="files__actions">
                            <button
                                class="link"
                                disabled=move || loading().versions
                                on:click=move |_| on_toggle_versions(file)
                            >
                                {move || {
                                    if browser.with(|b| b.is_expanded(file)) { "Hide Versions" } else { "Show Versions" }
                                }}
                            </button>
                        </td>
                    </tr>
                    {move || {
                        expanded()
                            .map(|versions| {
                                view! {
                                    <tr class="files__versions">
                                        <td colspan="2">
                                            <h4>"Versions:"</h4>
                                            <div class="version-grid">{version_cards(file, versions)}</div>
                                        </td>
                                    </tr>
                                }
                            })
                    }}
                }
            })
            .collect_view()
    };

    view! {
        <div class="browser" id=BROWSER_ANCHOR_ID>
            <Show when=move || !admin_mode>
                <div class="hero">
                    <h1>"Satellite Data Management"</h1>
                    <p>"Interactive dashboard for satellite data exploration"</p>
                </div>
            </Show>

            <section class="panel">
                <h2>"Satellite Selection"</h2>
                <div class="browser__selectors">
                    <label class="field">
                        <span>"Select Satellite"</span>
                        <select
                            on:change=on_satellite
                            prop:value=move || selected_satellite().map(|s| s.to_string()).unwrap_or_default()
                            disabled=move || loading().satellites
                        >
                            <option value="" disabled=true>"-- Select --"</option>
                            {move || {
                                browser
                                    .with(|b| b.satellites.clone())
                                    .into_iter()
                                    .map(|sat| {
                                        view! {
                                            <option value=sat.id.to_string()>
                                                {format!("{} (ID: {})", sat.name, sat.id)}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </label>
                    <Show when=move || selected_satellite().is_some()>
                        <label class="field">
                            <span>"Select Subsystem"</span>
                            <select
                                on:change=on_subsystem
                                prop:value=move || selected_subsystem().map(|s| s.to_string()).unwrap_or_default()
                                disabled=move || loading().subsystems
                            >
                                <option value="" disabled=true>"-- Select --"</option>
                                {move || {
                                    browser
                                        .with(|b| b.subsystems.clone())
                                        .into_iter()
                                        .map(|sub| {
                                            view! { <option value=sub.to_string()>{format!("Subsystem {sub}")}</option> }
                                        })
                                        .collect_view()
                                }}
                            </select>
                        </label>
                    </Show>
                </div>
            </section>

            <Show when=move || loading().subsystems && selected_satellite().is_some()>
                <div class="panel panel--loading">
                    <p>"Loading subsystems..."</p>
                </div>
            </Show>

            <ErrorBanner
                message=Signal::derive(move || browser.with(|b| b.error.clone()))
                on_dismiss=Callback::new(move |()| browser.update(BrowserState::dismiss_error))
            />

            <Show when=move || selected_subsystem().is_some() && browser.with(|b| !b.files.is_empty())>
                <section class="panel files">
                    <h2>{move || format!("Files in Subsystem {}", selected_subsystem().unwrap_or_default())}</h2>
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"File ID"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>{file_rows}</tbody>
                    </table>
                </section>
            </Show>

            {move || {
                browser
                    .with(|b| b.metadata.clone())
                    .map(|metadata| {
                        view! {
                            <MetadataView
                                metadata=metadata
                                on_close=Callback::new(move |()| browser.update(|b| b.metadata = None))
                            />
                        }
                    })
            }}

            <Show when=move || browser.with(BrowserState::shows_no_files)>
                <div class="panel panel--empty">
                    <p>"No files found for this subsystem"</p>
                </div>
            </Show>
        </div>
    }
}
