//! Preview window scenarios driven end to end through the public API:
//! classify, resolve against an in-memory backend, settle into the manager.
//!
//! Run with: cargo test -p console-ui --test preview_manager_test

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use futures::executor::block_on;
use shared_types::FileDescriptor;

use console_ui::desktop::frame::{Point, Viewport};
use console_ui::desktop::shortcuts::{shortcut_for, Shortcut};
use console_ui::desktop::state::{
    LoadRequest, PreviewWindowManager, Settlement, ShortcutOutcome,
};
use console_ui::viewers::classify::FileCategory;
use console_ui::viewers::shell::{render_plan, RenderPlan};
use console_ui::viewers::source::{
    download, resolve, ObjectUrls, PreviewBackend, PreviewContent, ResourceHandle,
};
use console_ui::viewers::viewport::ViewPhase;
use console_ui::ApiError;

struct MemoryBackend {
    texts: HashMap<u64, String>,
    binaries: HashMap<u64, Vec<u8>>,
    metadata: HashMap<u64, FileDescriptor>,
    location_calls: Cell<usize>,
}

impl MemoryBackend {
    fn new() -> Self {
        Self {
            texts: HashMap::new(),
            binaries: HashMap::new(),
            metadata: HashMap::new(),
            location_calls: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl PreviewBackend for MemoryBackend {
    async fn fetch_file_metadata(
        &self,
        _document_id: u64,
        file_id: u64,
    ) -> Result<FileDescriptor, ApiError> {
        self.metadata.get(&file_id).cloned().ok_or(ApiError::NotFound)
    }

    async fn fetch_renderable_location(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<String, ApiError> {
        self.location_calls.set(self.location_calls.get() + 1);
        Ok(format!("/api/v4/documents/{document_id}/files/{file_id}/preview/"))
    }

    async fn fetch_file_bytes_as_text(
        &self,
        _document_id: u64,
        file_id: u64,
    ) -> Result<String, ApiError> {
        self.texts.get(&file_id).cloned().ok_or(ApiError::NotFound)
    }

    async fn fetch_file_bytes_as_binary(
        &self,
        _document_id: u64,
        file_id: u64,
    ) -> Result<Vec<u8>, ApiError> {
        self.binaries
            .get(&file_id)
            .cloned()
            .ok_or_else(|| ApiError::Http {
                status: 500,
                detail: String::new(),
            })
    }

    fn download_location(&self, document_id: u64, file_id: u64) -> String {
        format!("/api/v4/documents/{document_id}/files/{file_id}/download/")
    }
}

#[derive(Default)]
struct CountingUrls {
    created: Cell<u32>,
    live: RefCell<Vec<String>>,
    released: RefCell<Vec<String>>,
}

impl CountingUrls {
    fn handle(&self) -> ResourceHandle {
        let n = self.created.get() + 1;
        self.created.set(n);
        let url = format!("blob:console/{n}");
        self.live.borrow_mut().push(url.clone());
        ResourceHandle::new(url)
    }
}

impl ObjectUrls for CountingUrls {
    fn create_text_url(&self, _text: &str) -> Option<ResourceHandle> {
        Some(self.handle())
    }

    fn create_binary_url(&self, _bytes: &[u8], _mime: &str) -> Option<ResourceHandle> {
        Some(self.handle())
    }

    fn offer_download(&self, _handle: &ResourceHandle, _filename: &str) -> bool {
        true
    }

    fn release(&self, handle: ResourceHandle) {
        let url = handle.into_url();
        self.live.borrow_mut().retain(|u| u != &url);
        self.released.borrow_mut().push(url);
    }
}

fn load(
    manager: &mut PreviewWindowManager,
    backend: &MemoryBackend,
    urls: &CountingUrls,
    request: &LoadRequest,
) -> Settlement {
    let outcome = block_on(resolve(
        backend,
        urls,
        request.document_id,
        &request.descriptor,
        request.category,
    ));
    manager.settle(request.ticket, outcome, urls)
}

fn manager() -> PreviewWindowManager {
    PreviewWindowManager::new(Viewport::new(1440, 900))
}

#[test]
fn dicom_scan_opens_ready_at_default_transform() {
    let backend = MemoryBackend::new();
    let urls = CountingUrls::default();
    let mut manager = manager();

    let scan = FileDescriptor::new(11, "scan.dcm").with_mimetype("application/dicom");
    let request = manager.open(5, Rc::new(scan));
    assert_eq!(request.category, FileCategory::MedicalImage);

    let id = request.ticket.window_id;
    assert_eq!(manager.get(id).unwrap().viewport().phase(), &ViewPhase::Loading);

    assert_eq!(load(&mut manager, &backend, &urls, &request), Settlement::Applied);
    let window = manager.get(id).unwrap();
    assert_eq!(window.viewport().phase(), &ViewPhase::Ready);
    assert_eq!(window.viewport().zoom_factor(), 1.0);
    assert_eq!(window.viewport().rotation_degrees(), 0);
    assert_eq!(backend.location_calls.get(), 1);
}

#[test]
fn notes_render_as_text_and_ignore_rotation() {
    let mut backend = MemoryBackend::new();
    backend.texts.insert(3, "line one\nline two".to_string());
    let urls = CountingUrls::default();
    let mut manager = manager();

    let notes = FileDescriptor::new(3, "notes.txt").with_mimetype("text/plain");
    let request = manager.open(2, Rc::new(notes));
    let id = request.ticket.window_id;
    load(&mut manager, &backend, &urls, &request);

    let rotated = manager.rotate(id);
    assert!(!rotated);

    let window = manager.get(id).unwrap();
    assert_eq!(window.viewport().rotation_degrees(), 0);
    let plan = render_plan(window.category(), window.viewport(), window.content());
    match plan {
        RenderPlan::Text { text, zoom, raw_url } => {
            assert_eq!(text, "line one\nline two");
            assert_eq!(zoom, 1.0);
            assert_eq!(raw_url.as_deref(), Some("blob:console/1"));
        }
        other => panic!("expected text plan, got {other:?}"),
    }
    assert_eq!(backend.location_calls.get(), 0);
}

#[test]
fn concurrent_loads_settle_independently() {
    let mut backend = MemoryBackend::new();
    backend.texts.insert(2, "b".to_string());
    let urls = CountingUrls::default();
    let mut manager = manager();

    let a = manager.open(1, Rc::new(FileDescriptor::new(1, "a.png").with_mimetype("image/png")));
    let b = manager.open(1, Rc::new(FileDescriptor::new(2, "b.txt")));
    let c = manager.open(1, Rc::new(FileDescriptor::new(3, "c.docx")));

    // Completion order differs from open order.
    load(&mut manager, &backend, &urls, &c);
    load(&mut manager, &backend, &urls, &a);
    load(&mut manager, &backend, &urls, &b);

    for request in [&a, &b, &c] {
        let window = manager.get(request.ticket.window_id).unwrap();
        assert_eq!(window.viewport().phase(), &ViewPhase::Ready);
    }
    assert_eq!(
        manager.get(c.ticket.window_id).unwrap().content(),
        Some(&PreviewContent::DownloadOnly(
            "/api/v4/documents/1/files/3/download/".to_string()
        ))
    );
}

#[test]
fn switching_files_keeps_only_the_latest_result() {
    let mut backend = MemoryBackend::new();
    backend.texts.insert(1, "old".to_string());
    let urls = CountingUrls::default();
    let mut manager = manager();

    let first = manager.open(9, Rc::new(FileDescriptor::new(1, "a.txt").with_mimetype("text/plain")));
    let id = first.ticket.window_id;
    let second = manager
        .replace_descriptor(
            id,
            Rc::new(FileDescriptor::new(2, "b.pdf").with_mimetype("application/pdf")),
            &urls,
        )
        .unwrap();

    assert_eq!(load(&mut manager, &backend, &urls, &second), Settlement::Applied);
    assert_eq!(load(&mut manager, &backend, &urls, &first), Settlement::Stale);

    let window = manager.get(id).unwrap();
    assert_eq!(window.category(), FileCategory::Document);
    assert!(matches!(window.content(), Some(PreviewContent::Location(_))));
    assert!(urls.live.borrow().is_empty(), "stale text URL must be released");
}

#[test]
fn closing_mid_load_leaks_nothing() {
    let mut backend = MemoryBackend::new();
    backend.texts.insert(4, "late".to_string());
    let urls = CountingUrls::default();
    let mut manager = manager();

    let request = manager.open(1, Rc::new(FileDescriptor::new(4, "late.log")));
    manager.close(request.ticket.window_id, &urls);

    assert_eq!(load(&mut manager, &backend, &urls, &request), Settlement::Closed);
    assert!(manager.is_empty());
    assert_eq!(urls.created.get(), 1);
    assert!(urls.live.borrow().is_empty());
}

#[test]
fn keyboard_shortcuts_follow_the_active_window() {
    let backend = MemoryBackend::new();
    let urls = CountingUrls::default();
    let mut manager = manager();

    let a = manager.open(1, Rc::new(FileDescriptor::new(1, "a.png").with_mimetype("image/png")));
    let b = manager.open(1, Rc::new(FileDescriptor::new(2, "b.png").with_mimetype("image/png")));
    load(&mut manager, &backend, &urls, &a);
    load(&mut manager, &backend, &urls, &b);

    manager.focus(a.ticket.window_id);
    let zoom = shortcut_for("=", true).unwrap();
    manager.handle_shortcut(zoom);
    manager.handle_shortcut(zoom);
    let rotate = shortcut_for("r", true).unwrap();
    manager.handle_shortcut(rotate);

    let a_view = manager.get(a.ticket.window_id).unwrap().viewport();
    assert_eq!(a_view.zoom_percent(), 150);
    assert_eq!(a_view.rotation_degrees(), 90);
    let b_view = manager.get(b.ticket.window_id).unwrap().viewport();
    assert_eq!(b_view.zoom_percent(), 100);

    assert_eq!(
        manager.handle_shortcut(Shortcut::Close),
        ShortcutOutcome::Close(a.ticket.window_id)
    );
}

#[test]
fn dragging_one_window_leaves_the_other_in_place() {
    let mut manager = manager();
    let a = manager.open(1, Rc::new(FileDescriptor::new(1, "a.png"))).ticket.window_id;
    let b = manager.open(1, Rc::new(FileDescriptor::new(2, "b.png"))).ticket.window_id;
    let b_origin = manager.get(b).unwrap().frame().origin();

    let start = manager.get(a).unwrap().frame().origin();
    manager.begin_drag(a, 1, Point::new(start.x + 5, start.y + 5));
    manager.pointer_moved(a, 1, Point::new(start.x + 45, start.y + 25));
    manager.pointer_released(a, 1);

    assert_eq!(
        manager.get(a).unwrap().frame().origin(),
        Point::new(start.x + 40, start.y + 20)
    );
    assert_eq!(manager.get(b).unwrap().frame().origin(), b_origin);
}

#[test]
fn manual_download_releases_its_object_url() {
    let mut backend = MemoryBackend::new();
    backend.binaries.insert(7, vec![0, 1, 2]);
    let urls = CountingUrls::default();
    let file = FileDescriptor::new(7, "archive.zip").with_size(3);

    block_on(download(&backend, &urls, 1, &file)).unwrap();
    assert_eq!(urls.created.get(), 1);
    assert!(urls.live.borrow().is_empty());

    let missing = FileDescriptor::new(8, "gone.zip");
    let err = block_on(download(&backend, &urls, 1, &missing)).unwrap_err();
    assert_eq!(err.to_string(), "HTTP error: 500");
}
