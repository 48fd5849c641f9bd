use dioxus::prelude::*;

/// Paged documents in the browser's embedded viewer. The frame itself is
/// scaled and rotated; the embedded viewer keeps its own page controls.
#[component]
pub fn DocumentViewer(src: String, transform: String, title: String) -> Element {
    rsx! {
        div {
            class: "document-viewer",
            style: "height: 100%; overflow: auto; background: #1e293b; display: flex; align-items: center; justify-content: center;",
            iframe {
                src: "{src}",
                title: "{title}",
                style: "width: 100%; height: 100%; border: none; background: white; transform: {transform}; transform-origin: center center;",
            }
        }
    }
}
