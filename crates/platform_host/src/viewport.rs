//! Host viewport contracts queried on every layout decision.

use std::{cell::Cell, rc::Rc};

use serde::{Deserialize, Serialize};

/// Viewport widths at or below this value are treated as mobile layouts.
pub const DEFAULT_MOBILE_BREAKPOINT: i32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Current size of the host rendering surface.
pub struct Viewport {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Whether the host reports a touch-first mobile layout.
    pub mobile: bool,
}

impl Viewport {
    /// Builds a viewport whose mobile flag follows [`DEFAULT_MOBILE_BREAKPOINT`].
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            mobile: width <= DEFAULT_MOBILE_BREAKPOINT,
        }
    }
}

/// Host service reporting the current viewport. The shell never owns viewport sizing.
pub trait ViewportService {
    /// Returns the viewport as of this call.
    fn viewport(&self) -> Viewport;
}

#[derive(Debug, Clone)]
/// Viewport service backed by a shared cell, for headless hosts and tests.
pub struct FixedViewport {
    current: Rc<Cell<Viewport>>,
}

impl FixedViewport {
    /// Creates a viewport service reporting `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            current: Rc::new(Cell::new(viewport)),
        }
    }

    /// Replaces the reported viewport, as a host resize would.
    pub fn set(&self, viewport: Viewport) {
        self.current.set(viewport);
    }
}

impl ViewportService for FixedViewport {
    fn viewport(&self) -> Viewport {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_flag_follows_breakpoint() {
        assert!(Viewport::new(768, 1024).mobile);
        assert!(!Viewport::new(769, 1024).mobile);
    }

    #[test]
    fn fixed_viewport_reports_latest_resize() {
        let service = FixedViewport::new(Viewport::new(1280, 800));
        let handle = service.clone();
        handle.set(Viewport::new(640, 480));
        assert_eq!(service.viewport(), Viewport::new(640, 480));
    }
}
