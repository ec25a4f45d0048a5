//! Drag/resize geometry engine and maximize presentation math.
//!
//! Nothing here touches [`DesktopState`](crate::model::DesktopState). Each window owns one
//! [`GestureState`]; the runtime commits the final rect through the reducer on release.

use platform_host::Viewport;
use serde::{Deserialize, Serialize};

use crate::config::ShellConfig;
use crate::model::{Point, ResizeEdge, WindowInstance, WindowRect};

/// Allowed range for a dragged window's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Boundary {
    /// Viewport minus the desktop edge margin, with the taskbar strip removed at the bottom.
    pub fn for_viewport(viewport: Viewport, config: &ShellConfig) -> Self {
        Self {
            left: config.edge_margin,
            top: config.edge_margin,
            right: viewport.width - config.edge_margin,
            bottom: viewport.height - config.edge_margin - config.taskbar_height,
        }
    }

    pub fn clamp(self, point: Point) -> Point {
        Point::new(
            clamp_axis(point.x, self.left, self.right),
            clamp_axis(point.y, self.top, self.bottom),
        )
    }
}

/// `max(min, min(raw, max))`. A viewport smaller than its margins collapses onto `min`.
pub fn clamp_axis(raw: i32, min: i32, max: i32) -> i32 {
    min.max(raw.min(max))
}

/// Full-viewport presentation, bleeding `maximized_bleed` px past each edge.
pub fn maximized_rect(viewport: Viewport, config: &ShellConfig) -> WindowRect {
    let bleed = config.maximized_bleed;
    WindowRect {
        x: -bleed,
        y: -bleed,
        w: viewport.width + 2 * bleed,
        h: viewport.height - config.taskbar_height + 2 * bleed,
    }
}

/// Whether the window is presented fullscreen, either maximized or forced by a mobile layout.
pub fn presented_maximized(window: &WindowInstance, viewport: Viewport) -> bool {
    window.maximized || viewport.mobile
}

/// Rect the window occupies on screen right now.
pub fn effective_rect(
    window: &WindowInstance,
    viewport: Viewport,
    config: &ShellConfig,
) -> WindowRect {
    if presented_maximized(window, viewport) {
        maximized_rect(viewport, config)
    } else {
        window.geometry
    }
}

/// New top-left for a drag: pointer minus grab offset, clamped per axis.
pub fn drag_position(pointer: Point, grab_offset: Point, boundary: Boundary) -> Point {
    boundary.clamp(Point::new(
        pointer.x.saturating_sub(grab_offset.x),
        pointer.y.saturating_sub(grab_offset.y),
    ))
}

/// Applies a pointer delta to the active edge(s). The opposite edges stay fixed, also when the
/// minimum size floor kicks in.
pub fn resize_rect(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    config: &ShellConfig,
) -> WindowRect {
    let mut rect = start;
    if edge.moves_east() {
        rect.w = start.w.saturating_add(dx).max(config.min_window_width);
    }
    if edge.moves_west() {
        rect.w = start.w.saturating_sub(dx).max(config.min_window_width);
        rect.x = start.right().saturating_sub(rect.w);
    }
    if edge.moves_south() {
        rect.h = start.h.saturating_add(dy).max(config.min_window_height);
    }
    if edge.moves_north() {
        rect.h = start.h.saturating_sub(dy).max(config.min_window_height);
        rect.y = start.bottom().saturating_sub(rect.h);
    }
    rect
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Part of a window under the pointer.
pub enum HitRegion {
    Resize(ResizeEdge),
    TitleBar,
    Content,
    Outside,
}

/// Classifies `pointer` against the window's on-screen rect.
///
/// Resize borders win over the title bar; they only exist on resizable windows shown restored.
/// Windows with invisible chrome have no shell title bar.
pub fn hit_test(
    window: &WindowInstance,
    pointer: Point,
    viewport: Viewport,
    config: &ShellConfig,
) -> HitRegion {
    let rect = effective_rect(window, viewport, config);
    if !rect.contains(pointer) {
        return HitRegion::Outside;
    }

    if window.resizable && !presented_maximized(window, viewport) {
        let threshold = config.resize_threshold;
        let edge = ResizeEdge::from_flags(
            pointer.y.saturating_sub(rect.y) < threshold,
            rect.bottom().saturating_sub(pointer.y) <= threshold,
            rect.right().saturating_sub(pointer.x) <= threshold,
            pointer.x.saturating_sub(rect.x) < threshold,
        );
        if let Some(edge) = edge {
            return HitRegion::Resize(edge);
        }
    }

    if !window.chrome.invisible && pointer.y.saturating_sub(rect.y) < config.title_bar_height {
        HitRegion::TitleBar
    } else {
        HitRegion::Content
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Per-window gesture machine. Moves always recompute from the gesture start and the latest
/// pointer, so coalesced or dropped move events never accumulate error.
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        grab_offset: Point,
        current: WindowRect,
    },
    Resizing {
        edge: ResizeEdge,
        pointer_start: Point,
        rect_start: WindowRect,
        current: WindowRect,
    },
}

impl GestureState {
    /// Starts a gesture for a pointer-down in `region`, or stays idle when the window does not
    /// accept one (maximized, mobile, non-resizable, or a non-handle region).
    pub fn begin(
        window: &WindowInstance,
        pointer: Point,
        region: HitRegion,
        viewport: Viewport,
    ) -> Self {
        if presented_maximized(window, viewport) {
            return Self::Idle;
        }
        match region {
            HitRegion::TitleBar => Self::Dragging {
                grab_offset: Point::new(
                    pointer.x.saturating_sub(window.geometry.x),
                    pointer.y.saturating_sub(window.geometry.y),
                ),
                current: window.geometry,
            },
            HitRegion::Resize(edge) if window.resizable => Self::Resizing {
                edge,
                pointer_start: pointer,
                rect_start: window.geometry,
                current: window.geometry,
            },
            _ => Self::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Rect to present while a gesture is live.
    pub fn live_rect(&self) -> Option<WindowRect> {
        match self {
            Self::Idle => None,
            Self::Dragging { current, .. } | Self::Resizing { current, .. } => Some(*current),
        }
    }

    /// Applies the latest pointer position and returns the new live rect.
    pub fn update(
        &mut self,
        pointer: Point,
        viewport: Viewport,
        config: &ShellConfig,
    ) -> Option<WindowRect> {
        match self {
            Self::Idle => None,
            Self::Dragging {
                grab_offset,
                current,
            } => {
                let boundary = Boundary::for_viewport(viewport, config);
                let origin = drag_position(pointer, *grab_offset, boundary);
                *current = current.at(origin);
                Some(*current)
            }
            Self::Resizing {
                edge,
                pointer_start,
                rect_start,
                current,
            } => {
                let dx = pointer.x.saturating_sub(pointer_start.x);
                let dy = pointer.y.saturating_sub(pointer_start.y);
                *current = resize_rect(*rect_start, *edge, dx, dy, config);
                Some(*current)
            }
        }
    }

    /// Ends the gesture (release or cancel alike) and returns the rect to commit.
    pub fn finish(&mut self) -> Option<WindowRect> {
        let committed = self.live_rect();
        *self = Self::Idle;
        committed
    }
}
