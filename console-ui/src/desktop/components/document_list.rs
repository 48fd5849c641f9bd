use std::collections::HashMap;

use dioxus::prelude::*;
use dioxus_logger::tracing::warn;
use shared_types::{Document, DocumentFile, FileDescriptor, Page};

use crate::api::MayanClient;
use crate::desktop::components::status_views::{ErrorState, LoadingState};
use crate::viewers::classify::classify;
use crate::viewers::labels::format_size;

pub const PAGE_SIZE: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
enum FilesState {
    Loading,
    Loaded(Vec<DocumentFile>),
    Failed(String),
}

pub fn total_pages(count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Paginated document list. Files are fetched when a document is expanded,
/// and picking one opens a preview window through `on_open`.
#[component]
pub fn DocumentBrowser(on_open: Callback<(u64, FileDescriptor)>) -> Element {
    let client = use_context::<MayanClient>();
    let mut page = use_signal(|| 1u32);
    let mut documents = use_signal(|| None::<Page<Document>>);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);
    let mut files = use_signal(HashMap::<u64, FilesState>::new);

    let list_client = client.clone();
    let load_page = use_callback(move |target: u32| {
        let client = list_client.clone();
        spawn(async move {
            loading.set(true);
            match client.list_documents(target, PAGE_SIZE).await {
                Ok(result) => {
                    page.set(target);
                    documents.set(Some(result));
                    error.set(None);
                }
                Err(e) => {
                    warn!("failed to list documents: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    });

    use_effect(move || load_page.call(1));

    let toggle_files = use_callback(move |document_id: u64| {
        if files.read().contains_key(&document_id) {
            files.write().remove(&document_id);
            return;
        }
        files.write().insert(document_id, FilesState::Loading);
        let client = client.clone();
        spawn(async move {
            let next = match client.list_document_files(document_id).await {
                Ok(list) => FilesState::Loaded(list),
                Err(e) => FilesState::Failed(e.to_string()),
            };
            // Collapsed while loading.
            if let Some(slot) = files.write().get_mut(&document_id) {
                *slot = next;
            }
        });
    });

    let current_page = page();
    let pages = documents
        .read()
        .as_ref()
        .map(|p| total_pages(p.count, PAGE_SIZE))
        .unwrap_or(1);
    let has_next = documents.read().as_ref().is_some_and(|p| p.has_next());

    rsx! {
        aside {
            class: "document-browser",
            style: "width: 320px; display: flex; flex-direction: column; border-right: 1px solid var(--border-color, #374151); background: var(--sidebar-bg, #111827); color: var(--text-primary, white);",
            div {
                style: "display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1rem; border-bottom: 1px solid var(--border-color, #374151);",
                strong { "Documents" }
                button { onclick: move |_| load_page.call(current_page), "Refresh" }
            }

            div {
                style: "flex: 1; overflow: auto;",
                if loading() && documents.read().is_none() {
                    LoadingState { label: "Loading documents..." }
                } else if let Some(message) = error() {
                    ErrorState {
                        title: "Could not load documents",
                        error: message,
                        on_retry: move |_| load_page.call(current_page),
                    }
                } else if let Some(list) = documents.read().as_ref() {
                    if list.results.is_empty() {
                        p { style: "padding: 1rem; color: var(--text-muted, #6b7280);", "No documents." }
                    }
                    for doc in list.results.iter() {
                        DocumentRow {
                            key: "{doc.id}",
                            document: doc.clone(),
                            files: files.read().get(&doc.id).cloned(),
                            on_toggle: toggle_files,
                            on_open,
                        }
                    }
                }
            }

            div {
                style: "display: flex; align-items: center; justify-content: space-between; padding: 0.5rem 1rem; border-top: 1px solid var(--border-color, #374151); font-size: 0.8rem;",
                button {
                    disabled: current_page <= 1 || loading(),
                    onclick: move |_| load_page.call(current_page.saturating_sub(1).max(1)),
                    "Previous"
                }
                span { "Page {current_page} of {pages}" }
                button {
                    disabled: !has_next || loading(),
                    onclick: move |_| load_page.call(current_page + 1),
                    "Next"
                }
            }
        }
    }
}

#[component]
fn DocumentRow(
    document: Document,
    files: Option<FilesState>,
    on_toggle: Callback<u64>,
    on_open: Callback<(u64, FileDescriptor)>,
) -> Element {
    let document_id = document.id;
    let expanded = files.is_some();
    let latest = document.file_latest.clone();
    let created = document.datetime_created.format("%Y-%m-%d").to_string();

    rsx! {
        div {
            style: "padding: 0.5rem 1rem; border-bottom: 1px solid var(--border-color, #1f2937);",
            div {
                style: "display: flex; align-items: center; gap: 0.5rem;",
                button {
                    "aria-label": if expanded { "Hide files" } else { "Show files" },
                    onclick: move |_| on_toggle.call(document_id),
                    if expanded { "▾" } else { "▸" }
                }
                div {
                    style: "flex: 1; min-width: 0;",
                    div { style: "font-weight: 500; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;", "{document.label}" }
                    div {
                        style: "font-size: 0.7rem; color: var(--text-muted, #6b7280);",
                        "{document.document_type.label} · {created}"
                    }
                }
                if let Some(file) = latest {
                    button {
                        title: "Preview latest file",
                        onclick: move |_| on_open.call((document_id, FileDescriptor::from(&file))),
                        "Open"
                    }
                }
            }

            match files {
                None => rsx! {},
                Some(FilesState::Loading) => rsx! {
                    LoadingState { label: "Loading files..." }
                },
                Some(FilesState::Failed(message)) => rsx! {
                    p { style: "font-size: 0.75rem; color: var(--danger-text, #ef4444);", "{message}" }
                },
                Some(FilesState::Loaded(list)) => rsx! {
                    if list.is_empty() {
                        p { style: "font-size: 0.75rem; color: var(--text-muted, #6b7280);", "No files." }
                    }
                    ul {
                        style: "list-style: none; margin: 0.25rem 0 0 1.5rem; padding: 0;",
                        for file in list.into_iter() {
                            FileEntry { key: "{file.id}", document_id, file, on_open }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn FileEntry(document_id: u64, file: DocumentFile, on_open: Callback<(u64, FileDescriptor)>) -> Element {
    let descriptor = FileDescriptor::from(&file);
    let category = classify(&descriptor);
    let size = descriptor.size.map(format_size).unwrap_or_default();

    rsx! {
        li {
            style: "display: flex; align-items: center; gap: 0.5rem; padding: 0.2rem 0; font-size: 0.8rem; cursor: pointer;",
            onclick: move |_| on_open.call((document_id, descriptor.clone())),
            span { {category.icon()} }
            span { style: "flex: 1; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;", "{file.filename}" }
            span { style: "color: var(--text-muted, #6b7280);", "{size}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up_and_never_hits_zero() {
        assert_eq!(total_pages(0, PAGE_SIZE), 1);
        assert_eq!(total_pages(20, PAGE_SIZE), 1);
        assert_eq!(total_pages(21, PAGE_SIZE), 2);
        assert_eq!(total_pages(5, 0), 5);
    }
}
