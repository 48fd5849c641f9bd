//! Preview window manager state.
//!
//! Pure state: async work happens in `actions`, which hands results back
//! through [`PreviewWindowManager::settle`]. Each load carries a
//! [`LoadTicket`]; only the newest ticket of a window may settle it.

use std::rc::Rc;

use dioxus_logger::tracing::{debug, info, warn};
use shared_types::FileDescriptor;

use crate::desktop::frame::{clamp_origin, Canvas, Point, Size, Viewport, WindowFrameState};
use crate::desktop::shortcuts::Shortcut;
use crate::viewers::classify::{classify, FileCategory};
use crate::viewers::source::{
    ObjectUrls, PreviewContent, ResolveError, ResolvedSource, ResourceHandle,
};
use crate::viewers::viewport::ViewportState;

pub type WindowId = u64;

const CASCADE_ORIGIN: Point = Point { x: 100, y: 100 };
const CASCADE_STEP_PX: i32 = 32;
const CASCADE_NUDGE_PX: i32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub window_id: WindowId,
    generation: u64,
}

/// Everything a resolution task needs, detached from the manager.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub document_id: u64,
    pub descriptor: Rc<FileDescriptor>,
    pub category: FileCategory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// A newer load superseded this one.
    Stale,
    /// The window closed before the load finished.
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    InFlight,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutOutcome {
    Discarded,
    Handled(WindowId),
    Download(WindowId),
    Close(WindowId),
}

#[derive(Debug)]
pub struct PreviewWindow {
    id: WindowId,
    document_id: u64,
    descriptor: Rc<FileDescriptor>,
    category: FileCategory,
    viewport: ViewportState,
    frame: WindowFrameState,
    content: Option<PreviewContent>,
    resource: Option<ResourceHandle>,
    generation: u64,
    download: DownloadState,
}

impl PreviewWindow {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn document_id(&self) -> u64 {
        self.document_id
    }

    pub fn descriptor(&self) -> &Rc<FileDescriptor> {
        &self.descriptor
    }

    pub fn category(&self) -> FileCategory {
        self.category
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn frame(&self) -> &WindowFrameState {
        &self.frame
    }

    pub fn content(&self) -> Option<&PreviewContent> {
        self.content.as_ref()
    }

    pub fn download_state(&self) -> &DownloadState {
        &self.download
    }

    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    fn release_resource<U: ObjectUrls + ?Sized>(&mut self, urls: &U) {
        if let Some(handle) = self.resource.take() {
            urls.release(handle);
        }
    }
}

/// Render snapshot of one window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowView {
    pub id: WindowId,
    pub document_id: u64,
    pub descriptor: Rc<FileDescriptor>,
    pub category: FileCategory,
    pub viewport: ViewportState,
    pub frame: WindowFrameState,
    pub content: Option<PreviewContent>,
    pub download: DownloadState,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct PreviewWindowManager {
    windows: Vec<PreviewWindow>,
    active: Option<WindowId>,
    viewport: Viewport,
    canvas_offset: Point,
    next_window_id: WindowId,
    next_stack_order: u64,
    next_generation: u64,
}

impl PreviewWindowManager {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            windows: Vec::new(),
            active: None,
            viewport,
            canvas_offset: Point::ORIGIN,
            next_window_id: 1,
            next_stack_order: 1,
            next_generation: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, id: WindowId) -> Option<&PreviewWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn windows(&self) -> impl Iterator<Item = &PreviewWindow> {
        self.windows.iter()
    }

    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn views(&self) -> Vec<WindowView> {
        self.windows
            .iter()
            .map(|w| WindowView {
                id: w.id,
                document_id: w.document_id,
                descriptor: w.descriptor.clone(),
                category: w.category,
                viewport: w.viewport.clone(),
                frame: w.frame.clone(),
                content: w.content.clone(),
                download: w.download.clone(),
                is_active: self.active == Some(w.id),
            })
            .collect()
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut PreviewWindow> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    fn take_stack_order(&mut self) -> u64 {
        let order = self.next_stack_order;
        self.next_stack_order += 1;
        order
    }

    fn take_ticket(&mut self, window_id: WindowId) -> LoadTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        LoadTicket {
            window_id,
            generation,
        }
    }

    fn topmost(&self) -> Option<&PreviewWindow> {
        self.windows.iter().max_by_key(|w| w.frame.stack_order())
    }

    /// Offset from the top-most window; starts a new column when the next
    /// step would leave the viewport vertically, and wraps to the cascade
    /// origin when it would leave horizontally. A spot another window already
    /// occupies is nudged until it is free.
    fn cascade_origin(&self, frame_size: Size) -> Point {
        let candidate = match self.topmost() {
            None => CASCADE_ORIGIN,
            Some(top) => {
                let base = top.frame.origin();
                let next = Point::new(base.x + CASCADE_STEP_PX, base.y + CASCADE_STEP_PX);
                let fits_x = next.x + frame_size.width <= self.viewport.width;
                let fits_y = next.y + frame_size.height <= self.viewport.height;
                match (fits_x, fits_y) {
                    (true, true) => next,
                    (true, false) => Point::new(next.x, CASCADE_ORIGIN.y),
                    (false, _) => CASCADE_ORIGIN,
                }
            }
        };

        let mut origin = clamp_origin(candidate, frame_size, self.viewport);
        for _ in 0..self.windows.len() {
            if !self.windows.iter().any(|w| w.frame.origin() == origin) {
                break;
            }
            let nudged = Point::new(origin.x + CASCADE_NUDGE_PX, origin.y + CASCADE_NUDGE_PX);
            origin = clamp_origin(nudged, frame_size, self.viewport);
        }
        origin
    }

    /// Allocate a window and return the load the caller must start.
    pub fn open(&mut self, document_id: u64, descriptor: Rc<FileDescriptor>) -> LoadRequest {
        let id = self.next_window_id;
        self.next_window_id += 1;

        let size = self.viewport.default_frame_size();
        let origin = self.cascade_origin(size);
        let stack_order = self.take_stack_order();
        let frame = WindowFrameState::new(origin, size, stack_order, self.viewport);
        let category = classify(&descriptor);
        let ticket = self.take_ticket(id);

        info!(
            "opening preview window {id} for document {document_id} file {} ({})",
            descriptor.id,
            category.label()
        );

        self.windows.push(PreviewWindow {
            id,
            document_id,
            descriptor: descriptor.clone(),
            category,
            viewport: ViewportState::default(),
            frame,
            content: None,
            resource: None,
            generation: ticket.generation,
            download: DownloadState::Idle,
        });
        self.active = Some(id);

        LoadRequest {
            ticket,
            document_id,
            descriptor,
            category,
        }
    }

    /// Load a new descriptor into an open window. The previous resource is
    /// released, the viewport reset, and any in-flight load made stale.
    pub fn replace_descriptor<U: ObjectUrls + ?Sized>(
        &mut self,
        id: WindowId,
        descriptor: Rc<FileDescriptor>,
        urls: &U,
    ) -> Option<LoadRequest> {
        let ticket = self.take_ticket(id);
        let window = self.window_mut(id)?;
        window.release_resource(urls);
        window.category = classify(&descriptor);
        window.descriptor = descriptor.clone();
        window.viewport.begin_load();
        window.content = None;
        window.generation = ticket.generation;

        Some(LoadRequest {
            ticket,
            document_id: window.document_id,
            descriptor,
            category: window.category,
        })
    }

    /// Put the window back into loading under a fresh ticket, keeping its
    /// descriptor until re-read metadata arrives.
    pub fn begin_reload<U: ObjectUrls + ?Sized>(
        &mut self,
        id: WindowId,
        urls: &U,
    ) -> Option<LoadRequest> {
        let current = self.get(id)?.descriptor.clone();
        self.replace_descriptor(id, current, urls)
    }

    /// Swap re-read metadata into a pending load. Returns `None` when the
    /// window closed or a newer ticket was issued meanwhile.
    pub fn refresh_descriptor(
        &mut self,
        ticket: LoadTicket,
        descriptor: Rc<FileDescriptor>,
    ) -> Option<LoadRequest> {
        let window = self.window_mut(ticket.window_id)?;
        if window.generation != ticket.generation {
            return None;
        }
        window.category = classify(&descriptor);
        window.descriptor = descriptor.clone();

        Some(LoadRequest {
            ticket,
            document_id: window.document_id,
            descriptor,
            category: window.category,
        })
    }

    /// Apply a finished resolution. Results for closed windows or superseded
    /// tickets are dropped, and any resource they carry is released.
    pub fn settle<U: ObjectUrls + ?Sized>(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<ResolvedSource, ResolveError>,
        urls: &U,
    ) -> Settlement {
        let Some(window) = self.window_mut(ticket.window_id) else {
            debug!("dropping load for closed window {}", ticket.window_id);
            release_outcome(outcome, urls);
            return Settlement::Closed;
        };
        if window.generation != ticket.generation {
            debug!("dropping stale load for window {}", ticket.window_id);
            release_outcome(outcome, urls);
            return Settlement::Stale;
        }

        match outcome {
            Ok(resolved) => {
                let (content, resource) = resolved.into_parts();
                window.release_resource(urls);
                window.resource = resource;
                window.content = Some(content);
                window.viewport.mark_ready();
            }
            Err(e) => {
                warn!("preview window {} failed to load: {e}", window.id);
                window.content = None;
                window.viewport.mark_error(e.to_string());
            }
        }
        Settlement::Applied
    }

    /// Raise to the top and make active. Position is untouched.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let Some(top) = self.topmost().map(|w| (w.id, w.frame.stack_order())) else {
            return false;
        };
        if self.get(id).is_none() {
            return false;
        }
        self.active = Some(id);
        if top.0 == id {
            return true;
        }
        let order = self.take_stack_order();
        if let Some(window) = self.window_mut(id) {
            window.frame.set_stack_order(order);
        }
        true
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Release the window's resource and remove it. Unknown ids are a no-op.
    pub fn close<U: ObjectUrls + ?Sized>(&mut self, id: WindowId, urls: &U) -> bool {
        let Some(index) = self.windows.iter().position(|w| w.id == id) else {
            return false;
        };
        let mut window = self.windows.remove(index);
        window.release_resource(urls);
        if self.active == Some(id) {
            self.active = None;
        }
        info!("closed preview window {id}");
        true
    }

    /// Close every window, e.g. when the console unmounts.
    pub fn close_all<U: ObjectUrls + ?Sized>(&mut self, urls: &U) {
        for mut window in self.windows.drain(..) {
            window.release_resource(urls);
        }
        self.active = None;
    }

    /// Track where the window canvas sits; pointer positions are client
    /// coordinates and are translated into canvas space.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas_offset = canvas.offset;
        self.set_viewport(canvas.viewport);
    }

    fn to_canvas(&self, client: Point) -> Point {
        Canvas::new(self.canvas_offset, self.viewport).to_local(client)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        for window in &mut self.windows {
            window.frame.fit_to(viewport);
        }
    }

    pub fn begin_drag(&mut self, id: WindowId, pointer_id: i32, pointer: Point) -> bool {
        self.focus(id);
        let pointer = self.to_canvas(pointer);
        self.window_mut(id)
            .map(|w| w.frame.begin_drag(pointer_id, pointer))
            .unwrap_or(false)
    }

    pub fn begin_resize(&mut self, id: WindowId, pointer_id: i32, pointer: Point) -> bool {
        self.focus(id);
        let pointer = self.to_canvas(pointer);
        self.window_mut(id)
            .map(|w| w.frame.begin_resize(pointer_id, pointer))
            .unwrap_or(false)
    }

    pub fn pointer_moved(&mut self, id: WindowId, pointer_id: i32, pointer: Point) -> bool {
        let pointer = self.to_canvas(pointer);
        let viewport = self.viewport;
        self.window_mut(id)
            .map(|w| w.frame.pointer_moved(pointer_id, pointer, viewport))
            .unwrap_or(false)
    }

    pub fn pointer_released(&mut self, id: WindowId, pointer_id: i32) -> bool {
        self.window_mut(id)
            .map(|w| w.frame.pointer_released(pointer_id))
            .unwrap_or(false)
    }

    pub fn toggle_minimize(&mut self, id: WindowId) {
        if let Some(window) = self.window_mut(id) {
            window.frame.toggle_minimize();
        }
    }

    pub fn toggle_maximize(&mut self, id: WindowId) {
        let viewport = self.viewport;
        if let Some(window) = self.window_mut(id) {
            window.frame.toggle_maximize(viewport);
        }
    }

    pub fn zoom_in(&mut self, id: WindowId) -> bool {
        self.window_mut(id)
            .map(|w| w.viewport.zoom_in(w.category))
            .unwrap_or(false)
    }

    pub fn zoom_out(&mut self, id: WindowId) -> bool {
        self.window_mut(id)
            .map(|w| w.viewport.zoom_out(w.category))
            .unwrap_or(false)
    }

    pub fn rotate(&mut self, id: WindowId) -> bool {
        self.window_mut(id)
            .map(|w| w.viewport.rotate(w.category))
            .unwrap_or(false)
    }

    /// Route a shortcut to the active window. With no active window, or a
    /// minimized one, the shortcut is discarded.
    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> ShortcutOutcome {
        let Some(id) = self.active else {
            return ShortcutOutcome::Discarded;
        };
        match self.get(id) {
            Some(window) if !window.frame.minimized() => {}
            _ => return ShortcutOutcome::Discarded,
        }
        match shortcut {
            Shortcut::ZoomIn => {
                self.zoom_in(id);
                ShortcutOutcome::Handled(id)
            }
            Shortcut::ZoomOut => {
                self.zoom_out(id);
                ShortcutOutcome::Handled(id)
            }
            Shortcut::Rotate => {
                self.rotate(id);
                ShortcutOutcome::Handled(id)
            }
            Shortcut::Download => ShortcutOutcome::Download(id),
            Shortcut::Close => ShortcutOutcome::Close(id),
        }
    }

    /// Mark a download as in flight. Returns `None` when one already is.
    pub fn begin_download(&mut self, id: WindowId) -> Option<(u64, Rc<FileDescriptor>)> {
        let window = self.window_mut(id)?;
        if window.download == DownloadState::InFlight {
            return None;
        }
        window.download = DownloadState::InFlight;
        Some((window.document_id, window.descriptor.clone()))
    }

    pub fn finish_download(&mut self, id: WindowId, result: Result<(), String>) {
        let Some(window) = self.window_mut(id) else {
            return;
        };
        window.download = match result {
            Ok(()) => DownloadState::Idle,
            Err(message) => DownloadState::Failed(message),
        };
    }

    /// Clear a failure notice; an in-flight download is left alone.
    pub fn dismiss_download_notice(&mut self, id: WindowId) {
        if let Some(window) = self.window_mut(id) {
            if matches!(window.download, DownloadState::Failed(_)) {
                window.download = DownloadState::Idle;
            }
        }
    }
}

fn release_outcome<U: ObjectUrls + ?Sized>(
    outcome: Result<ResolvedSource, ResolveError>,
    urls: &U,
) {
    if let Ok(resolved) = outcome {
        let (_, resource) = resolved.into_parts();
        if let Some(handle) = resource {
            urls.release(handle);
        }
    }
}
