use crate::viewers::classify::FileCategory;

/// Zoom is kept in quarter steps so repeated edits never drift.
const ZOOM_STEP_QUARTERS: u8 = 1;
const MIN_ZOOM_QUARTERS: u8 = 1; // 0.25
const MAX_ZOOM_QUARTERS: u8 = 12; // 3.0
const DEFAULT_ZOOM_QUARTERS: u8 = 4; // 1.0

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Per-window view state: load phase plus the zoom/rotation transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportState {
    phase: ViewPhase,
    zoom_quarters: u8,
    rotation: Rotation,
    error_message: Option<String>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            phase: ViewPhase::Loading,
            zoom_quarters: DEFAULT_ZOOM_QUARTERS,
            rotation: Rotation::Deg0,
            error_message: None,
        }
    }
}

impl ViewportState {
    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn zoom_factor(&self) -> f64 {
        f64::from(self.zoom_quarters) * 0.25
    }

    pub fn zoom_percent(&self) -> u16 {
        u16::from(self.zoom_quarters) * 25
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn rotation_degrees(&self) -> u16 {
        self.rotation.degrees()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Enter `Loading` with default transform. The only way out of `Error`.
    pub fn begin_load(&mut self) {
        *self = Self::default();
    }

    /// Returns false when the viewport is not loading (stale completion).
    pub fn mark_ready(&mut self) -> bool {
        if self.phase != ViewPhase::Loading {
            return false;
        }
        self.phase = ViewPhase::Ready;
        true
    }

    pub fn mark_error(&mut self, message: impl Into<String>) -> bool {
        if self.phase != ViewPhase::Loading {
            return false;
        }
        self.phase = ViewPhase::Error;
        self.error_message = Some(message.into());
        true
    }

    pub fn zoom_in(&mut self, category: FileCategory) -> bool {
        if !self.can_transform(category.supports_zoom()) {
            return false;
        }
        let next = (self.zoom_quarters + ZOOM_STEP_QUARTERS).min(MAX_ZOOM_QUARTERS);
        let changed = next != self.zoom_quarters;
        self.zoom_quarters = next;
        changed
    }

    pub fn zoom_out(&mut self, category: FileCategory) -> bool {
        if !self.can_transform(category.supports_zoom()) {
            return false;
        }
        let next = self
            .zoom_quarters
            .saturating_sub(ZOOM_STEP_QUARTERS)
            .max(MIN_ZOOM_QUARTERS);
        let changed = next != self.zoom_quarters;
        self.zoom_quarters = next;
        changed
    }

    /// Plain text ignores rotation entirely.
    pub fn rotate(&mut self, category: FileCategory) -> bool {
        if !self.can_transform(category.supports_rotation()) {
            return false;
        }
        self.rotation = self.rotation.next();
        true
    }

    pub fn can_zoom(&self, category: FileCategory) -> bool {
        self.can_transform(category.supports_zoom())
    }

    pub fn can_rotate(&self, category: FileCategory) -> bool {
        self.can_transform(category.supports_rotation())
    }

    fn can_transform(&self, supported: bool) -> bool {
        supported && self.phase == ViewPhase::Ready
    }
}
