//! Window frame geometry and the pointer drag/resize protocol.
//!
//! Clamping is total: every input produces an in-bounds frame, so there is no
//! error path for geometry.

pub const MIN_FRAME_WIDTH: i32 = 320;
pub const MIN_FRAME_HEIGHT: i32 = 200;
pub const DEFAULT_FRAME_WIDTH: i32 = 760;
pub const DEFAULT_FRAME_HEIGHT: i32 = 560;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

/// Area available to frames, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    pub fn size(self) -> Size {
        Size::new(self.width.max(0), self.height.max(0))
    }

    /// Default frame size: 80% of the viewport, at least the minimum, never
    /// larger than the viewport.
    pub fn default_frame_size(self) -> Size {
        let width = (self.width * 4 / 5).max(DEFAULT_FRAME_WIDTH.min(self.width));
        let height = (self.height * 4 / 5).max(DEFAULT_FRAME_HEIGHT.min(self.height));
        clamp_size(Size::new(width, height), Point::ORIGIN, self)
    }
}

/// The element frames are laid out in: its client-space offset and its size.
/// Frame origins are canvas-local; pointer events arrive in client space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub offset: Point,
    pub viewport: Viewport,
}

impl Canvas {
    pub fn new(offset: Point, viewport: Viewport) -> Self {
        Self { offset, viewport }
    }

    pub fn to_local(self, client: Point) -> Point {
        Point::new(client.x - self.offset.x, client.y - self.offset.y)
    }
}

/// Keep the frame origin inside `[0, vw - fw] x [0, vh - fh]`; the upper
/// bound is floored at 0 when the frame is larger than the viewport.
pub fn clamp_origin(origin: Point, size: Size, viewport: Viewport) -> Point {
    let max_x = (viewport.width - size.width).max(0);
    let max_y = (viewport.height - size.height).max(0);
    Point {
        x: origin.x.clamp(0, max_x),
        y: origin.y.clamp(0, max_y),
    }
}

/// Respect the minimum size unless the viewport itself is smaller, and never
/// let the frame extend past the viewport from `origin`.
pub fn clamp_size(size: Size, origin: Point, viewport: Viewport) -> Size {
    let cap_w = (viewport.width - origin.x.max(0)).max(0);
    let cap_h = (viewport.height - origin.y.max(0)).max(0);
    Size {
        width: size.width.max(MIN_FRAME_WIDTH).min(cap_w),
        height: size.height.max(MIN_FRAME_HEIGHT).min(cap_h),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    Drag,
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Interaction {
    mode: InteractionMode,
    pointer_id: i32,
    /// Drag: pointer minus frame origin. Resize: pointer minus frame size.
    anchor: Point,
}

/// Frame state of one preview window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowFrameState {
    origin: Point,
    size: Size,
    minimized: bool,
    maximized: bool,
    stack_order: u64,
    restore_rect: Option<Rect>,
    interaction: Option<Interaction>,
}

impl WindowFrameState {
    pub fn new(origin: Point, size: Size, stack_order: u64, viewport: Viewport) -> Self {
        let size = clamp_size(size, Point::ORIGIN, viewport);
        Self {
            origin: clamp_origin(origin, size, viewport),
            size,
            minimized: false,
            maximized: false,
            stack_order,
            restore_rect: None,
            interaction: None,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect {
            origin: self.origin,
            size: self.size,
        }
    }

    pub fn minimized(&self) -> bool {
        self.minimized
    }

    pub fn maximized(&self) -> bool {
        self.maximized
    }

    pub fn stack_order(&self) -> u64 {
        self.stack_order
    }

    pub(crate) fn set_stack_order(&mut self, order: u64) {
        self.stack_order = order;
    }

    pub fn drag_in_progress(&self) -> bool {
        matches!(
            self.interaction,
            Some(Interaction {
                mode: InteractionMode::Drag,
                ..
            })
        )
    }

    pub fn interaction_mode(&self) -> Option<InteractionMode> {
        self.interaction.map(|i| i.mode)
    }

    /// Start a title-bar drag. Ignored while maximized or while another
    /// interaction is running.
    pub fn begin_drag(&mut self, pointer_id: i32, pointer: Point) -> bool {
        if self.maximized || self.interaction.is_some() {
            return false;
        }
        self.interaction = Some(Interaction {
            mode: InteractionMode::Drag,
            pointer_id,
            anchor: Point::new(pointer.x - self.origin.x, pointer.y - self.origin.y),
        });
        true
    }

    /// Start a resize from the bottom-right handle.
    pub fn begin_resize(&mut self, pointer_id: i32, pointer: Point) -> bool {
        if self.maximized || self.minimized || self.interaction.is_some() {
            return false;
        }
        self.interaction = Some(Interaction {
            mode: InteractionMode::Resize,
            pointer_id,
            anchor: Point::new(pointer.x - self.size.width, pointer.y - self.size.height),
        });
        true
    }

    /// Apply a pointer move. Moves from other pointers are ignored.
    pub fn pointer_moved(&mut self, pointer_id: i32, pointer: Point, viewport: Viewport) -> bool {
        let Some(active) = self.interaction else {
            return false;
        };
        if active.pointer_id != pointer_id {
            return false;
        }

        match active.mode {
            InteractionMode::Drag => {
                let next = Point::new(pointer.x - active.anchor.x, pointer.y - active.anchor.y);
                let next = clamp_origin(next, self.size, viewport);
                let changed = next != self.origin;
                self.origin = next;
                changed
            }
            InteractionMode::Resize => {
                let next = Size::new(pointer.x - active.anchor.x, pointer.y - active.anchor.y);
                let next = clamp_size(next, self.origin, viewport);
                let changed = next != self.size;
                self.size = next;
                changed
            }
        }
    }

    pub fn pointer_released(&mut self, pointer_id: i32) -> bool {
        match self.interaction {
            Some(active) if active.pointer_id == pointer_id => {
                self.interaction = None;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_minimize(&mut self) {
        self.minimized = !self.minimized;
        self.interaction = None;
    }

    pub fn toggle_maximize(&mut self, viewport: Viewport) {
        self.interaction = None;
        if self.maximized {
            self.maximized = false;
            let restore = self.restore_rect.take().unwrap_or(self.rect());
            self.size = clamp_size(restore.size, Point::ORIGIN, viewport);
            self.origin = clamp_origin(restore.origin, self.size, viewport);
        } else {
            self.restore_rect = Some(self.rect());
            self.maximized = true;
            self.origin = Point::ORIGIN;
            self.size = viewport.size();
        }
    }

    /// Re-establish the geometry invariants after the viewport changed.
    pub fn fit_to(&mut self, viewport: Viewport) {
        if self.maximized {
            self.origin = Point::ORIGIN;
            self.size = viewport.size();
            return;
        }
        self.size = clamp_size(self.size, Point::ORIGIN, viewport);
        self.origin = clamp_origin(self.origin, self.size, viewport);
    }
}
