//! Reducer actions and the single transition function for the desktop state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{
    DesktopState, FocusTarget, IconId, OpenWindowRequest, Point, PowerState, SelectionRegion,
    WindowId, WindowRect,
};
use crate::window_manager::{
    bring_to_front, close_window, minimize_window, open_window, set_geometry, toggle_maximize,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Actions accepted by [`reduce_desktop`].
pub enum DesktopAction {
    /// Open a window, or refocus the live instance of a single-instance app.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id. Accepted whether or not the window is focused.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Raise a window and give windows the focus.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Flip a resizable window between restored and maximized.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Commit restored bounds after a drag or resize gesture.
    SetGeometry {
        /// Window whose bounds changed.
        window_id: WindowId,
        /// New restored bounds.
        rect: WindowRect,
    },
    /// Focus exactly one desktop icon.
    FocusIcon {
        /// Icon to focus.
        icon_id: IconId,
    },
    /// Replace the icon selection with `icon_ids`.
    SelectIcons {
        /// Icons to mark focused.
        icon_ids: Vec<IconId>,
    },
    /// Give the desktop background the focus and clear icon focus.
    FocusDesktop,
    /// Start a rubber-band selection at `anchor`.
    BeginSelect {
        /// Press point of the selection.
        anchor: Point,
    },
    /// Move the free corner of the active selection.
    UpdateSelect {
        /// Current pointer position.
        pointer: Point,
    },
    /// Finish the active selection.
    EndSelect,
    /// Enter a power-off flow.
    PowerOff {
        /// Requested power state.
        target: PowerState,
    },
    /// Abort a pending power-off flow.
    CancelPowerOff,
}

impl DesktopAction {
    /// Stable token for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::OpenWindow(_) => "open_window",
            Self::CloseWindow { .. } => "close_window",
            Self::FocusWindow { .. } => "focus_window",
            Self::MinimizeWindow { .. } => "minimize_window",
            Self::ToggleMaximize { .. } => "toggle_maximize",
            Self::SetGeometry { .. } => "set_geometry",
            Self::FocusIcon { .. } => "focus_icon",
            Self::SelectIcons { .. } => "select_icons",
            Self::FocusDesktop => "focus_desktop",
            Self::BeginSelect { .. } => "begin_select",
            Self::UpdateSelect { .. } => "update_select",
            Self::EndSelect => "end_select",
            Self::PowerOff { .. } => "power_off",
            Self::CancelPowerOff => "cancel_power_off",
        }
    }
}

/// Applies `action` to `state` and returns the next state.
///
/// The input is never mutated. When the action changes nothing (stale ids, gated gestures,
/// repeated focus) the input `Arc` itself is returned, so callers can detect no-ops with
/// [`Arc::ptr_eq`].
pub fn reduce_desktop(state: &Arc<DesktopState>, action: DesktopAction) -> Arc<DesktopState> {
    let kind = action.kind();
    let mut next = DesktopState::clone(state);
    apply(&mut next, action);

    if next == **state {
        tracing::trace!(action = kind, "desktop action left state unchanged");
        return Arc::clone(state);
    }
    tracing::debug!(
        action = kind,
        windows = next.windows.len(),
        focus = ?next.focus_target,
        "desktop action applied"
    );
    Arc::new(next)
}

fn apply(state: &mut DesktopState, action: DesktopAction) {
    match action {
        DesktopAction::OpenWindow(req) => {
            open_window(state, req);
        }
        DesktopAction::CloseWindow { window_id } => {
            close_window(state, window_id);
        }
        DesktopAction::FocusWindow { window_id } => {
            if state.window(window_id).is_some() {
                bring_to_front(state, window_id);
                state.focus_target = FocusTarget::Window;
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            if state.focus_target == FocusTarget::Window {
                minimize_window(state, window_id);
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            if state.focus_target == FocusTarget::Window {
                toggle_maximize(state, window_id);
            }
        }
        DesktopAction::SetGeometry { window_id, rect } => {
            set_geometry(state, window_id, rect);
        }
        DesktopAction::FocusIcon { icon_id } => {
            if state.icon(icon_id).is_some() {
                for icon in &mut state.icons {
                    icon.is_focused = icon.id == icon_id;
                }
                state.focus_target = FocusTarget::Icon;
            }
        }
        DesktopAction::SelectIcons { icon_ids } => {
            for icon in &mut state.icons {
                icon.is_focused = icon_ids.contains(&icon.id);
            }
            state.focus_target = FocusTarget::Icon;
        }
        DesktopAction::FocusDesktop => focus_desktop(state),
        DesktopAction::BeginSelect { anchor } => {
            focus_desktop(state);
            state.selection_region = Some(SelectionRegion {
                anchor,
                current: anchor,
            });
        }
        DesktopAction::UpdateSelect { pointer } => {
            if let Some(region) = state.selection_region.as_mut() {
                region.current = pointer;
            }
        }
        DesktopAction::EndSelect => state.selection_region = None,
        DesktopAction::PowerOff { target } => state.power_state = target,
        DesktopAction::CancelPowerOff => state.power_state = PowerState::Running,
    }
}

fn focus_desktop(state: &mut DesktopState) {
    state.focus_target = FocusTarget::Desktop;
    for icon in &mut state.icons {
        icon.is_focused = false;
    }
}
