use dioxus::prelude::*;
use dioxus_web::WebEventExt;
use wasm_bindgen::JsCast;

use crate::desktop::frame::Point;
use crate::desktop::shortcuts::{shortcut_hint, Shortcut};
use crate::desktop::state::{DownloadState, WindowId, WindowView};
use crate::viewers::labels::{format_size, truncate_filename};
use crate::viewers::shell::PreviewRenderer;

/// User intent raised by a preview window's chrome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowAction {
    Focus,
    Close,
    ToggleMinimize,
    ToggleMaximize,
    ZoomIn,
    ZoomOut,
    Rotate,
    Download,
    Reload,
    BeginDrag { pointer_id: i32, point: Point },
    BeginResize { pointer_id: i32, point: Point },
    PointerMove { pointer_id: i32, point: Point },
    PointerUp { pointer_id: i32 },
}

fn pointer_point(e: &PointerEvent) -> Point {
    if let Some(point) = e.data().try_as_web_event().and_then(|event| {
        event
            .dyn_ref::<web_sys::PointerEvent>()
            .map(|pointer| Point::new(pointer.client_x(), pointer.client_y()))
    }) {
        return point;
    }

    let point = e.data().client_coordinates();
    Point::new(point.x as i32, point.y as i32)
}

fn pointer_target_is_window_control(e: &PointerEvent) -> bool {
    e.data()
        .try_as_web_event()
        .and_then(|event| event.target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .map(|element| {
            element.closest("button").ok().flatten().is_some()
                || element.closest(".window-controls").ok().flatten().is_some()
        })
        .unwrap_or(false)
}

fn with_window_element(e: &PointerEvent, f: impl FnOnce(&web_sys::Element)) {
    if let Some(window) = e
        .data()
        .try_as_web_event()
        .and_then(|event| event.current_target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest(".preview-window").ok().flatten())
    {
        f(&window);
    }
}

fn capture_window_pointer(e: &PointerEvent, pointer_id: i32) {
    with_window_element(e, |window| {
        let _ = window.set_pointer_capture(pointer_id);
    });
}

fn release_window_pointer(e: &PointerEvent, pointer_id: i32) {
    with_window_element(e, |window| {
        let _ = window.release_pointer_capture(pointer_id);
    });
}

fn status_line(view: &WindowView) -> String {
    let descriptor = &view.descriptor;
    let mut parts = vec![
        format!("doc #{}", view.document_id),
        format!("file #{}", descriptor.id),
    ];
    if let Some(mime) = descriptor.mimetype.as_deref().filter(|m| !m.is_empty()) {
        parts.push(mime.to_string());
    }
    if view.category.supports_zoom() {
        parts.push(format!("{}%", view.viewport.zoom_percent()));
    }
    let degrees = view.viewport.rotation_degrees();
    if degrees != 0 {
        parts.push(format!("{degrees}°"));
    }
    parts.join(" · ")
}

fn shortcut_hints(view: &WindowView) -> String {
    let mut shortcuts = Vec::new();
    if view.category.supports_zoom() {
        shortcuts.push(Shortcut::ZoomIn);
        shortcuts.push(Shortcut::ZoomOut);
    }
    if view.category.supports_rotation() {
        shortcuts.push(Shortcut::Rotate);
    }
    shortcuts.push(Shortcut::Download);
    shortcuts.push(Shortcut::Close);
    shortcuts
        .into_iter()
        .map(shortcut_hint)
        .collect::<Vec<_>>()
        .join("  ")
}

#[component]
pub fn PreviewWindowFrame(view: WindowView, on_action: Callback<(WindowId, WindowAction)>) -> Element {
    let id = view.id;
    let frame = view.frame.clone();
    let origin = frame.origin();
    let size = frame.size();
    let z_index = frame.stack_order();
    let is_active = view.is_active;
    let minimized = frame.minimized();
    let maximized = frame.maximized();
    let dragging = frame.drag_in_progress();
    let act = move |action: WindowAction| on_action.call((id, action));

    let active_outline = if is_active && !maximized {
        "2px solid var(--accent-bg, #3b82f6)"
    } else {
        "none"
    };
    let height = if minimized {
        "auto".to_string()
    } else {
        format!("{}px", size.height)
    };
    let window_style = if maximized {
        format!(
            "position: absolute; top: 0; left: 0; width: 100%; height: 100%; z-index: {z_index}; \
             display: flex; flex-direction: column; background: var(--window-bg, #1f2937); \
             border: none; border-radius: 0; overflow: hidden; outline: {active_outline};"
        )
    } else {
        format!(
            "position: absolute; left: {}px; top: {}px; width: {}px; height: {height}; z-index: \
             {z_index}; display: flex; flex-direction: column; background: var(--window-bg, \
             #1f2937); border: 1px solid var(--border-color, #374151); border-radius: \
             var(--radius-lg, 12px); overflow: hidden; box-shadow: var(--shadow-lg, 0 10px 40px \
             rgba(0,0,0,0.5)); outline: {active_outline};",
            origin.x, origin.y, size.width
        )
    };

    let descriptor = view.descriptor.clone();
    let title = truncate_filename(&descriptor.filename);
    let size_label = descriptor.size.map(format_size);
    let category = view.category;
    let can_zoom = view.viewport.can_zoom(category);
    let can_rotate = view.viewport.can_rotate(category);
    let download_busy = view.download == DownloadState::InFlight;
    let download_notice = match &view.download {
        DownloadState::Failed(message) => Some(format!("Download failed: {message}")),
        _ => None,
    };
    let status = status_line(&view);
    let hints = shortcut_hints(&view);
    let cursor = if dragging { "grabbing" } else { "grab" };

    rsx! {
        div {
            class: if is_active { "preview-window active" } else { "preview-window" },
            role: "dialog",
            "aria-label": descriptor.filename.clone(),
            tabindex: "0",
            style: "{window_style}",
            onpointerdown: move |e| {
                e.stop_propagation();
                act(WindowAction::Focus);
            },
            onpointermove: move |e| {
                if frame.interaction_mode().is_none() {
                    return;
                }
                act(WindowAction::PointerMove {
                    pointer_id: e.data().pointer_id(),
                    point: pointer_point(&e),
                });
            },
            onpointerup: move |e| {
                let pointer_id = e.data().pointer_id();
                release_window_pointer(&e, pointer_id);
                act(WindowAction::PointerUp { pointer_id });
            },
            onpointercancel: move |e| {
                let pointer_id = e.data().pointer_id();
                release_window_pointer(&e, pointer_id);
                act(WindowAction::PointerUp { pointer_id });
            },

            div {
                class: "window-titlebar",
                style: "display: flex; align-items: center; justify-content: space-between; gap: 0.5rem; padding: 0.5rem 0.75rem; background: var(--titlebar-bg, #111827); border-bottom: 1px solid var(--border-color, #374151); cursor: {cursor}; user-select: none; touch-action: none;",
                ondoubleclick: move |_| act(WindowAction::ToggleMaximize),
                onpointerdown: move |e| {
                    if maximized || pointer_target_is_window_control(&e) {
                        return;
                    }
                    e.prevent_default();
                    e.stop_propagation();
                    let pointer_id = e.data().pointer_id();
                    capture_window_pointer(&e, pointer_id);
                    act(WindowAction::BeginDrag {
                        pointer_id,
                        point: pointer_point(&e),
                    });
                },

                div {
                    style: "display: flex; align-items: center; gap: 0.5rem; min-width: 0;",
                    span { style: "font-size: 1rem;", {category.icon()} }
                    span {
                        style: "font-weight: 500; color: var(--text-primary, white); white-space: nowrap; overflow: hidden;",
                        title: "{descriptor.filename}",
                        "{title}"
                    }
                    if let Some(size_label) = size_label {
                        span { style: "font-size: 0.75rem; color: var(--text-muted, #6b7280);", "{size_label}" }
                    }
                    span {
                        style: "font-size: 0.7rem; text-transform: uppercase; color: var(--text-muted, #6b7280);",
                        {category.label()}
                    }
                }

                WindowControls {
                    maximized,
                    on_minimize: move |_| act(WindowAction::ToggleMinimize),
                    on_maximize: move |_| act(WindowAction::ToggleMaximize),
                    on_close: move |_| act(WindowAction::Close),
                }
            }

            if !minimized {
                div {
                    class: "window-toolbar",
                    style: "display: flex; align-items: center; gap: 0.25rem; padding: 0.25rem 0.75rem; border-bottom: 1px solid var(--border-color, #374151); font-size: 0.8rem;",
                    button {
                        disabled: !can_zoom,
                        "aria-label": "Zoom out",
                        onclick: move |_| act(WindowAction::ZoomOut),
                        "−"
                    }
                    span { style: "min-width: 3rem; text-align: center;", "{view.viewport.zoom_percent()}%" }
                    button {
                        disabled: !can_zoom,
                        "aria-label": "Zoom in",
                        onclick: move |_| act(WindowAction::ZoomIn),
                        "+"
                    }
                    if category.supports_rotation() {
                        button {
                            disabled: !can_rotate,
                            "aria-label": "Rotate",
                            onclick: move |_| act(WindowAction::Rotate),
                            "⟳"
                        }
                    }
                    span { style: "flex: 1;" }
                    button { onclick: move |_| act(WindowAction::Reload), "Reload" }
                    button {
                        disabled: download_busy,
                        onclick: move |_| act(WindowAction::Download),
                        if download_busy { "Downloading..." } else { "Download" }
                    }
                }

                div {
                    class: "window-content",
                    style: "flex: 1; overflow: hidden; position: relative;",
                    PreviewRenderer {
                        category,
                        viewport: view.viewport.clone(),
                        content: view.content.clone(),
                        filename: descriptor.filename.clone(),
                        on_download: move |_| act(WindowAction::Download),
                    }
                }

                div {
                    class: "window-statusbar",
                    style: "display: flex; justify-content: space-between; gap: 8px; padding: 4px 12px; border-top: 1px solid #1f2937; font-size: 0.7rem; color: #94a3b8;",
                    span { "{status}" }
                    if let Some(notice) = download_notice {
                        span { style: "color: #fca5a5;", "{notice}" }
                    } else {
                        span { "{hints}" }
                    }
                }

                if !maximized {
                    div {
                        class: "resize-handle",
                        style: "position: absolute; right: 0; bottom: 0; width: 16px; height: 16px; cursor: se-resize; touch-action: none;",
                        onpointerdown: move |e| {
                            e.prevent_default();
                            e.stop_propagation();
                            let pointer_id = e.data().pointer_id();
                            capture_window_pointer(&e, pointer_id);
                            act(WindowAction::BeginResize {
                                pointer_id,
                                point: pointer_point(&e),
                            });
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn WindowControls(
    maximized: bool,
    on_minimize: Callback<()>,
    on_maximize: Callback<()>,
    on_close: Callback<()>,
) -> Element {
    rsx! {
        div {
            class: "window-controls",
            style: "display: flex; align-items: center; gap: 0.25rem;",
            button {
                style: "width: 24px; height: 24px; background: transparent; color: #facc15; border: none; border-radius: var(--radius-sm, 4px); cursor: pointer;",
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": "Minimize",
                onclick: move |e| {
                    e.stop_propagation();
                    on_minimize.call(());
                },
                "−"
            }
            button {
                style: "width: 24px; height: 24px; background: transparent; color: #22c55e; border: none; border-radius: var(--radius-sm, 4px); cursor: pointer;",
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": if maximized { "Restore" } else { "Maximize" },
                onclick: move |e| {
                    e.stop_propagation();
                    on_maximize.call(());
                },
                if maximized { "❐" } else { "□" }
            }
            button {
                class: "window-close",
                style: "width: 24px; height: 24px; background: transparent; color: #ef4444; border: none; border-radius: var(--radius-sm, 4px); cursor: pointer; font-size: 1.25rem; line-height: 1;",
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": "Close",
                onclick: move |e| {
                    e.stop_propagation();
                    on_close.call(());
                },
                "×"
            }
        }
    }
}
