use dioxus::prelude::*;
use shared_types::FileDescriptor;

use crate::api::MayanClient;
use crate::config::ConsoleConfig;
use crate::desktop::actions;
use crate::desktop::components::document_list::DocumentBrowser;
use crate::desktop::components::workspace_canvas::WorkspaceCanvas;
use crate::desktop::effects;
use crate::desktop::frame::Viewport;
use crate::desktop::shortcuts::shortcut_for;
use crate::desktop::state::{PreviewWindowManager, WindowId};
use crate::desktop_window::WindowAction;
use crate::interop::BrowserObjectUrls;

#[component]
pub fn PreviewDesktop() -> Element {
    let config = use_context_provider(ConsoleConfig::load);
    let client = use_context_provider(|| MayanClient::new(&config));
    let mut manager = use_signal(|| {
        let viewport = effects::current_canvas()
            .map(|canvas| canvas.viewport)
            .unwrap_or(Viewport::new(1280, 720));
        PreviewWindowManager::new(viewport)
    });

    use_effect(move || {
        spawn(async move {
            effects::track_canvas(manager).await;
        });
    });

    use_drop(move || {
        if let Ok(mut manager) = manager.try_write() {
            manager.close_all(&BrowserObjectUrls);
        }
    });

    let open_client = client.clone();
    let open_preview = use_callback(move |(document_id, descriptor): (u64, FileDescriptor)| {
        actions::open_preview(open_client.clone(), manager, document_id, descriptor);
    });

    let action_client = client.clone();
    let window_action = use_callback(move |(id, action): (WindowId, WindowAction)| {
        actions::apply_window_action(action_client.clone(), manager, id, action);
    });

    let clear_focus = use_callback(move |_: ()| manager.write().clear_active());

    let on_keydown = move |e: KeyboardEvent| {
        let modifiers = e.modifiers();
        let command = modifiers.ctrl() || modifiers.meta();
        let Some(shortcut) = shortcut_for(&e.key().to_string(), command) else {
            return;
        };
        if actions::apply_shortcut(client.clone(), manager, shortcut) {
            e.prevent_default();
        }
    };

    rsx! {
        div {
            class: "preview-desktop",
            tabindex: "0",
            style: "display: flex; width: 100vw; height: 100vh; overflow: hidden; background: var(--desktop-bg, #0f172a); color: var(--text-primary, white); font-family: system-ui, sans-serif; outline: none;",
            onkeydown: on_keydown,

            DocumentBrowser { on_open: open_preview }
            WorkspaceCanvas {
                manager,
                on_action: window_action,
                on_clear_focus: clear_focus,
            }
        }
    }
}
