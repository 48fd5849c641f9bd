use dioxus_logger::tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::viewers::source::{ObjectUrls, ResourceHandle};

fn blob_url(parts: &js_sys::Array, mime: &str) -> Option<ResourceHandle> {
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(parts, &options).ok()?;
    match Url::create_object_url_with_blob(&blob) {
        Ok(url) => Some(ResourceHandle::new(url)),
        Err(e) => {
            warn!("could not create object URL: {e:?}");
            None
        }
    }
}

/// Blob-backed object URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserObjectUrls;

impl ObjectUrls for BrowserObjectUrls {
    fn create_text_url(&self, text: &str) -> Option<ResourceHandle> {
        let parts = js_sys::Array::of1(&JsValue::from_str(text));
        let options = BlobPropertyBag::new();
        options.set_type("text/plain;charset=utf-8");
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).ok()?;
        Url::create_object_url_with_blob(&blob)
            .ok()
            .map(ResourceHandle::new)
    }

    fn create_binary_url(&self, bytes: &[u8], mime: &str) -> Option<ResourceHandle> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        blob_url(&parts, mime)
    }

    fn offer_download(&self, handle: &ResourceHandle, filename: &str) -> bool {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return false;
        };
        let Some(anchor) = document
            .create_element("a")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlAnchorElement>().ok())
        else {
            return false;
        };
        anchor.set_href(handle.url());
        anchor.set_download(filename);
        anchor.click();
        true
    }

    fn release(&self, handle: ResourceHandle) {
        if let Err(e) = Url::revoke_object_url(handle.url()) {
            warn!("could not revoke object URL: {e:?}");
        }
    }
}

/// Copy text to the system clipboard.
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let promise = window.navigator().clipboard().write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("Clipboard write failed: {e:?}"))
}

/// Open a URL in a new browser tab.
pub fn open_in_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        if window.open_with_url_and_target(url, "_blank").is_err() {
            warn!("could not open {url}");
        }
    }
}
