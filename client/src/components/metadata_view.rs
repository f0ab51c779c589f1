//! Metadata panel for one file version.
//!
//! DESIGN
//! ======
//! The metadata endpoint returns loosely structured JSON grouped into named
//! sections. Known sections are rendered as key/value grids; a payload with
//! none of the primary sections is shown as pretty-printed JSON instead.

#[cfg(test)]
#[path = "metadata_view_test.rs"]
mod metadata_view_test;

use leptos::prelude::*;
use serde_json::Value;

use crate::net::types::display_value;

pub const SECTION_TITLES: [&str; 3] = ["File Information", "Timestamps", "Storage Information"];
const MESSAGE_KEY: &str = "Message";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
    /// `Some(true)` for an `Active` status, `Some(false)` for any other
    /// status, `None` for non-status fields.
    pub status_active: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataSection {
    pub title: &'static str,
    pub entries: Vec<MetadataEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub sections: Vec<MetadataSection>,
    pub message: Option<String>,
    /// Pretty JSON for payloads without the primary sections.
    pub raw: Option<String>,
}

impl FileMetadata {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let sections: Vec<MetadataSection> = SECTION_TITLES
            .iter()
            .filter_map(|&title| {
                let fields = value.get(title)?.as_object()?;
                let entries = fields
                    .iter()
                    .map(|(key, v)| MetadataEntry {
                        key: key.clone(),
                        value: display_value(v),
                        status_active: (title == "File Information" && key == "Status")
                            .then_some(v.as_str() == Some("Active")),
                    })
                    .collect();
                Some(MetadataSection { title, entries })
            })
            .collect();

        let message = value.get(MESSAGE_KEY).filter(|v| is_present(v)).map(display_value);
        let has_primary = ["File Information", "Timestamps"]
            .iter()
            .any(|key| value.get(*key).is_some_and(is_present))
            || message.is_some();
        let raw = if has_primary {
            None
        } else {
            Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
        };

        Self { sections, message, raw }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[component]
pub fn MetadataView(metadata: Value, on_close: Callback<()>) -> impl IntoView {
    let parsed = FileMetadata::from_value(&metadata);

    let sections = parsed
        .sections
        .into_iter()
        .map(|section| {
            let rows = section
                .entries
                .into_iter()
                .map(|entry| {
                    let value_class = match entry.status_active {
                        Some(true) => "metadata__value metadata__value--active",
                        Some(false) => "metadata__value metadata__value--inactive",
                        None => "metadata__value",
                    };
                    view! {
                        <div class="metadata__row">
                            <div class="metadata__key">{entry.key} ":"</div>
                            <div class=value_class>{entry.value}</div>
                        </div>
                    }
                })
                .collect_view();
            view! {
                <div class="metadata__section">
                    <h4>{section.title}</h4>
                    <div class="metadata__grid">{rows}</div>
                </div>
            }
        })
        .collect_view();

    let message = parsed.message.map(|text| {
        view! {
            <div class="metadata__note">
                <div class="metadata__note-title">"Note:"</div>
                <div>{text}</div>
            </div>
        }
    });
    let raw = parsed.raw.map(|json| view! { <pre class="metadata__raw">{json}</pre> });

    view! {
        <section class="panel metadata">
            <div class="panel__header">
                <h3>"File Metadata"</h3>
                <button class="btn btn--ghost" on:click=move |_| on_close.run(())>
                    "Close"
                </button>
            </div>
            {sections}
            {message}
            {raw}
        </section>
    }
}
