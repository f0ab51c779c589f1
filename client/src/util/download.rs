//! Saving downloaded file versions to disk from the browser.

#[cfg(test)]
#[path = "download_test.rs"]
mod download_test;

use crate::state::browser::VersionRef;

/// Delay before the object URL behind a download is released.
#[cfg(feature = "hydrate")]
const REVOKE_DELAY_MS: u32 = 100;

#[must_use]
pub fn download_filename(version: VersionRef) -> String {
    format!(
        "sat{}_sub{}_file{}_v{}.bin",
        version.sat, version.sub, version.file, version.ver
    )
}

/// Hand `bytes` to the browser as a file download named `filename`.
///
/// # Errors
///
/// Returns the DOM failure text when the blob or link cannot be created.
pub fn save_bytes(bytes: &[u8], filename: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        let js_err = |e: wasm_bindgen::JsValue| format!("{e:?}");
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let body = document.body().ok_or("no document body")?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let blob = web_sys::Blob::new_with_u8_array_sequence(&parts).map_err(js_err)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

        let anchor = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "anchor cast failed".to_owned())?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        body.append_child(&anchor).map_err(js_err)?;
        anchor.click();
        anchor.remove();

        gloo_timers::callback::Timeout::new(REVOKE_DELAY_MS, move || {
            let _ = web_sys::Url::revoke_object_url(&url);
        })
        .forget();
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (bytes, filename);
        Err("downloads are only available in the browser".to_owned())
    }
}
