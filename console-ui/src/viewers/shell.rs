use dioxus::prelude::*;

use crate::viewers::classify::FileCategory;
use crate::viewers::document::DocumentViewer;
use crate::viewers::fallback::FallbackViewer;
use crate::viewers::image::ImageViewer;
use crate::viewers::source::PreviewContent;
use crate::viewers::text::TextViewer;
use crate::viewers::viewport::{ViewPhase, ViewportState};

/// What the content area shows for a given phase, category and content.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    Loading,
    Failed { message: String },
    EmbeddedDocument { src: String, transform: String },
    Picture { src: String, transform: String },
    Text {
        text: String,
        zoom: f64,
        raw_url: Option<String>,
    },
    DownloadOnly { href: String },
}

impl RenderPlan {
    /// Failures and unrenderable files offer the original as their one action.
    pub fn offers_download(&self) -> bool {
        matches!(self, RenderPlan::Failed { .. } | RenderPlan::DownloadOnly { .. })
    }
}

/// CSS transform for zoom and rotation.
pub fn transform_css(viewport: &ViewportState) -> String {
    format!(
        "scale({}) rotate({}deg)",
        viewport.zoom_factor(),
        viewport.rotation_degrees()
    )
}

pub fn render_plan(
    category: FileCategory,
    viewport: &ViewportState,
    content: Option<&PreviewContent>,
) -> RenderPlan {
    match viewport.phase() {
        ViewPhase::Loading => return RenderPlan::Loading,
        ViewPhase::Error => {
            return RenderPlan::Failed {
                message: viewport
                    .error_message()
                    .unwrap_or("Preview failed")
                    .to_string(),
            }
        }
        ViewPhase::Ready => {}
    }

    let Some(content) = content else {
        return RenderPlan::Loading;
    };

    match content {
        PreviewContent::Location(src) if category == FileCategory::Document => {
            RenderPlan::EmbeddedDocument {
                src: src.clone(),
                transform: transform_css(viewport),
            }
        }
        PreviewContent::Location(src) => RenderPlan::Picture {
            src: src.clone(),
            transform: transform_css(viewport),
        },
        // Text is scaled but never rotated.
        PreviewContent::Text { text, raw_url } => RenderPlan::Text {
            text: text.clone(),
            zoom: viewport.zoom_factor(),
            raw_url: raw_url.clone(),
        },
        PreviewContent::DownloadOnly(href) => RenderPlan::DownloadOnly { href: href.clone() },
    }
}

#[component]
pub fn PreviewRenderer(
    category: FileCategory,
    viewport: ViewportState,
    content: Option<PreviewContent>,
    filename: String,
    on_download: Callback<()>,
) -> Element {
    let plan = render_plan(category, &viewport, content.as_ref());
    let offers_download = plan.offers_download();

    match plan {
        RenderPlan::Loading => rsx! {
            div {
                class: "preview-loading",
                style: "display: flex; align-items: center; justify-content: center; height: 100%; color: var(--text-muted, #94a3b8);",
                "Loading {filename}..."
            }
        },
        RenderPlan::Failed { message } => rsx! {
            div {
                class: "preview-error",
                style: "display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 0.75rem; height: 100%; padding: 1.5rem; text-align: center; color: var(--danger-text, #fca5a5);",
                p { style: "font-weight: 500;", "{message}" }
                if offers_download {
                    button { onclick: move |_| on_download.call(()), "Download" }
                }
            }
        },
        RenderPlan::EmbeddedDocument { src, transform } => rsx! {
            DocumentViewer { src, transform, title: filename }
        },
        RenderPlan::Picture { src, transform } => rsx! {
            ImageViewer { src, transform, alt: filename }
        },
        RenderPlan::Text { text, zoom, raw_url } => rsx! {
            TextViewer { text, zoom, raw_url }
        },
        RenderPlan::DownloadOnly { href } => rsx! {
            FallbackViewer { filename, href, on_download }
        },
    }
}
