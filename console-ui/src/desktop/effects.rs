use dioxus::prelude::{Signal, WritableExt};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::desktop::frame::{Canvas, Point, Viewport};
use crate::desktop::state::PreviewWindowManager;

const CANVAS_SELECTOR: &str = ".window-canvas";

/// Keep every frame inside the window canvas as the browser resizes.
pub async fn track_canvas(mut manager: Signal<PreviewWindowManager>) {
    if let Some(canvas) = current_canvas() {
        manager.write().set_canvas(canvas);
    }

    let Some(window) = web_sys::window() else {
        return;
    };

    let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some(canvas) = current_canvas() {
            manager.write().set_canvas(canvas);
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    let _ = window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());
    let _ = window
        .add_event_listener_with_callback("orientationchange", callback.as_ref().unchecked_ref());

    // Keep listener alive for app lifetime.
    callback.forget();
}

/// Client-space placement of the window canvas. Before the canvas mounts
/// this falls back to the whole browser viewport.
pub fn current_canvas() -> Option<Canvas> {
    let window = web_sys::window()?;
    let document = window.document()?;

    if let Ok(Some(element)) = document.query_selector(CANVAS_SELECTOR) {
        let rect = element.get_bounding_client_rect();
        let width = element.client_width();
        let height = element.client_height();
        if width > 0 && height > 0 {
            return Some(Canvas::new(
                Point::new(rect.left().round() as i32, rect.top().round() as i32),
                Viewport::new(width as u32, height as u32),
            ));
        }
    }

    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    if width > 0.0 && height > 0.0 {
        return Some(Canvas::new(
            Point::ORIGIN,
            Viewport::new(width.round() as u32, height.round() as u32),
        ));
    }

    let root = document.document_element()?;
    Some(Canvas::new(
        Point::ORIGIN,
        Viewport::new(
            root.client_width().max(0) as u32,
            root.client_height().max(0) as u32,
        ),
    ))
}
