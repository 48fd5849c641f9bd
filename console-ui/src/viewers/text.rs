use dioxus::prelude::*;
use dioxus_logger::tracing::warn;

use crate::interop::{copy_to_clipboard, open_in_new_tab};

const BASE_FONT_PX: f64 = 13.0;

#[component]
pub fn TextViewer(text: String, zoom: f64, raw_url: Option<String>) -> Element {
    let mut copied = use_signal(|| false);
    let font_px = BASE_FONT_PX * zoom;
    let line_count = text.lines().count();

    let text_for_copy = text.clone();
    let on_copy = move |_| {
        let payload = text_for_copy.clone();
        spawn(async move {
            match copy_to_clipboard(&payload).await {
                Ok(()) => copied.set(true),
                Err(e) => warn!("{e}"),
            }
        });
    };

    rsx! {
        div {
            class: "text-viewer",
            style: "height: 100%; display: flex; flex-direction: column; background: #0f172a;",
            div {
                style: "display: flex; align-items: center; gap: 8px; padding: 6px 10px; border-bottom: 1px solid #1f2937; font-size: 0.75rem; color: #94a3b8;",
                span { "{line_count} lines" }
                span { style: "flex: 1;" }
                if let Some(url) = raw_url {
                    button {
                        onclick: move |_| open_in_new_tab(&url),
                        "Open raw"
                    }
                }
                button {
                    onclick: on_copy,
                    if copied() { "Copied" } else { "Copy" }
                }
            }
            textarea {
                readonly: true,
                spellcheck: "false",
                style: "flex: 1; resize: none; border: none; outline: none; padding: 12px; background: transparent; color: #e2e8f0; font-family: ui-monospace, monospace; font-size: {font_px}px; line-height: 1.5; white-space: pre; overflow: auto;",
                value: "{text}",
            }
        }
    }
}
