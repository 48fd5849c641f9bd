use dioxus::prelude::*;

/// Image and medical-image preview. Zoom and rotation come from the window's
/// viewport; panning is local to the component.
#[component]
pub fn ImageViewer(src: String, transform: String, alt: String) -> Element {
    let mut offset_x = use_signal(|| 0.0f64);
    let mut offset_y = use_signal(|| 0.0f64);
    let mut dragging = use_signal(|| false);
    let mut drag_origin = use_signal(|| (0.0f64, 0.0f64));

    rsx! {
        div {
            class: "image-viewer",
            style: "height: 100%; overflow: hidden; position: relative; background: #0b1220; cursor: grab;",
            onmousedown: move |evt| {
                dragging.set(true);
                drag_origin.set((evt.client_coordinates().x, evt.client_coordinates().y));
            },
            onmouseup: move |_| dragging.set(false),
            onmouseleave: move |_| dragging.set(false),
            ondoubleclick: move |_| {
                offset_x.set(0.0);
                offset_y.set(0.0);
            },
            onmousemove: move |evt| {
                if !dragging() {
                    return;
                }
                let (start_x, start_y) = drag_origin();
                let now_x = evt.client_coordinates().x;
                let now_y = evt.client_coordinates().y;
                offset_x.set(offset_x() + (now_x - start_x));
                offset_y.set(offset_y() + (now_y - start_y));
                drag_origin.set((now_x, now_y));
            },
            img {
                src: "{src}",
                alt: "{alt}",
                draggable: "false",
                style: "max-width: 100%; max-height: 100%; user-select: none; position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%) translate({offset_x}px, {offset_y}px) {transform}; transform-origin: center center; transition: transform 0.15s ease;",
            }
        }
    }
}
