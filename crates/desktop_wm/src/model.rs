use desktop_app_contract::{AppKind, WindowChrome};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IconId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn at(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    pub fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Overlap test with inclusive edges, so a zero-area rect touching `other` still counts.
    pub fn intersects(self, other: WindowRect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInstance {
    pub id: WindowId,
    pub app_kind: AppKind,
    pub title: String,
    pub icon: String,
    /// Restored-state bounds. Left untouched while maximized.
    pub geometry: WindowRect,
    pub z_index: u64,
    pub minimized: bool,
    pub maximized: bool,
    pub resizable: bool,
    pub allows_multiple_instances: bool,
    pub chrome: WindowChrome,
    pub inject: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTarget {
    App(AppKind),
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub id: IconId,
    pub title: String,
    pub icon: String,
    pub target: IconTarget,
    #[serde(default)]
    pub is_focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    #[default]
    Window,
    Icon,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    #[default]
    Running,
    LoggingOff,
    ShuttingDown,
}

/// Rubber-band rectangle spanned between the press point and the latest pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRegion {
    pub anchor: Point,
    pub current: Point,
}

impl SelectionRegion {
    pub fn rect(self) -> WindowRect {
        let x = self.anchor.x.min(self.current.x);
        let y = self.anchor.y.min(self.current.y);
        WindowRect {
            x,
            y,
            w: (self.anchor.x - self.current.x).abs(),
            h: (self.anchor.y - self.current.y).abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    /// Open windows in insertion order. Stacking is defined by `z_index` alone.
    pub windows: Vec<WindowInstance>,
    pub next_window_id: u64,
    pub next_z_index: u64,
    pub icons: Vec<DesktopIcon>,
    pub focus_target: FocusTarget,
    pub selection_region: Option<SelectionRegion>,
    pub power_state: PowerState,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            next_window_id: 1,
            next_z_index: 1,
            icons: Vec::new(),
            focus_target: FocusTarget::Desktop,
            selection_region: None,
            power_state: PowerState::Running,
        }
    }
}

impl DesktopState {
    pub fn with_icons(icons: Vec<DesktopIcon>) -> Self {
        Self {
            icons,
            ..Self::default()
        }
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowInstance> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn icon(&self, icon_id: IconId) -> Option<&DesktopIcon> {
        self.icons.iter().find(|icon| icon.id == icon_id)
    }

    pub fn windows_of_kind(&self, app_kind: AppKind) -> impl Iterator<Item = &WindowInstance> {
        self.windows.iter().filter(move |w| w.app_kind == app_kind)
    }

    /// Windows ordered back to front.
    pub fn stacking_order(&self) -> Vec<&WindowInstance> {
        let mut ordered: Vec<&WindowInstance> = self.windows.iter().collect();
        ordered.sort_by_key(|w| w.z_index);
        ordered
    }

    pub fn has_visible_window(&self) -> bool {
        self.windows.iter().any(|w| !w.minimized)
    }

    pub fn focused_icon_ids(&self) -> Vec<IconId> {
        self.icons
            .iter()
            .filter(|icon| icon.is_focused)
            .map(|icon| icon.id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_kind: AppKind,
    pub title: String,
    pub icon: String,
    pub geometry: WindowRect,
    pub resizable: bool,
    pub allows_multiple_instances: bool,
    #[serde(default)]
    pub chrome: WindowChrome,
    /// Open directly in maximized presentation (compact viewports).
    #[serde(default)]
    pub maximized: bool,
    #[serde(default)]
    pub inject: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub fn from_flags(north: bool, south: bool, east: bool, west: bool) -> Option<Self> {
        match (north, south, east, west) {
            (true, _, true, _) => Some(Self::NorthEast),
            (true, _, _, true) => Some(Self::NorthWest),
            (_, true, true, _) => Some(Self::SouthEast),
            (_, true, _, true) => Some(Self::SouthWest),
            (true, _, _, _) => Some(Self::North),
            (_, true, _, _) => Some(Self::South),
            (_, _, true, _) => Some(Self::East),
            (_, _, _, true) => Some(Self::West),
            _ => None,
        }
    }

    pub fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }
}
