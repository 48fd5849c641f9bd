use dioxus::prelude::*;

/// Files with no inline renderer: offer the original for download.
#[component]
pub fn FallbackViewer(filename: String, href: String, on_download: Callback<()>) -> Element {
    rsx! {
        div {
            class: "fallback-viewer",
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 0.75rem; height: 100%; padding: 2rem; text-align: center; color: var(--text-secondary, #9ca3af);",
            span { style: "font-size: 2.5rem;", "📄" }
            p { style: "font-weight: 500; color: var(--text-primary, white);", "{filename}" }
            p { style: "font-size: 0.875rem;", "No preview is available for this file type." }
            // The link keeps the original's address; clicks go through the
            // authenticated download.
            a {
                href: "{href}",
                download: "{filename}",
                onclick: move |e| {
                    e.prevent_default();
                    on_download.call(());
                },
                "Download"
            }
        }
    }
}
