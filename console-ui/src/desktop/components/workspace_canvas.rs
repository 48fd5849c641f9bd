use dioxus::prelude::*;

use crate::desktop::state::{PreviewWindowManager, WindowId};
use crate::desktop_window::{PreviewWindowFrame, WindowAction};

#[component]
pub fn WorkspaceCanvas(
    manager: Signal<PreviewWindowManager>,
    on_action: Callback<(WindowId, WindowAction)>,
    on_clear_focus: Callback<()>,
) -> Element {
    let views = manager.read().views();
    let is_empty = views.is_empty();

    rsx! {
        div {
            class: "window-canvas",
            style: "flex: 1; position: relative; overflow: hidden;",
            onpointerdown: move |_| on_clear_focus.call(()),

            if is_empty {
                div {
                    style: "display: flex; align-items: center; justify-content: center; height: 100%; color: var(--text-muted, #6b7280);",
                    "Pick a file to preview it."
                }
            }

            for view in views {
                PreviewWindowFrame {
                    key: "{view.id}",
                    view: view.clone(),
                    on_action,
                }
            }
        }
    }
}
