//! Window registry transitions used by the desktop reducer.
//!
//! Every helper mutates a working copy of [`DesktopState`] and reports whether anything
//! changed. Unknown ids are ignored. Counters only grow, so a freed id or z-index is never
//! handed out again and no renumbering is ever needed.

use crate::model::{
    DesktopState, FocusTarget, OpenWindowRequest, WindowId, WindowInstance, WindowRect,
};

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn next_z_index(state: &mut DesktopState) -> u64 {
    let z_index = state.next_z_index;
    state.next_z_index = state.next_z_index.saturating_add(1);
    z_index
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Option<&mut WindowInstance> {
    state.windows.iter_mut().find(|w| w.id == window_id)
}

/// Opens a window, or refocuses the existing instance of a single-instance app kind.
pub fn open_window(state: &mut DesktopState, req: OpenWindowRequest) -> WindowId {
    if !req.allows_multiple_instances {
        let existing = state.windows_of_kind(req.app_kind).next().map(|w| w.id);
        if let Some(existing) = existing {
            bring_to_front(state, existing);
            state.focus_target = FocusTarget::Window;
            return existing;
        }
    }

    let id = next_window_id(state);
    let z_index = next_z_index(state);
    state.windows.push(WindowInstance {
        id,
        app_kind: req.app_kind,
        title: req.title,
        icon: req.icon,
        geometry: req.geometry,
        z_index,
        minimized: false,
        maximized: req.maximized && req.resizable,
        resizable: req.resizable,
        allows_multiple_instances: req.allows_multiple_instances,
        chrome: req.chrome,
        inject: req.inject,
    });
    state.focus_target = FocusTarget::Window;
    id
}

/// Raises `window_id` above every other window and un-minimizes it.
///
/// Raising the window that is already focused on top is a no-op, so repeated clicks do not
/// burn z-indices.
pub fn bring_to_front(state: &mut DesktopState, window_id: WindowId) -> bool {
    let top_z = state.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
    let focus_on_windows = state.focus_target == FocusTarget::Window;
    let Some(window) = state.window(window_id) else {
        return false;
    };
    if focus_on_windows && !window.minimized && window.z_index == top_z {
        return false;
    }

    let z_index = next_z_index(state);
    if let Some(window) = find_window_mut(state, window_id) {
        window.z_index = z_index;
        window.minimized = false;
    }
    true
}

/// Removes `window_id` and hands focus to the next owner.
pub fn close_window(state: &mut DesktopState, window_id: WindowId) -> bool {
    let before = state.windows.len();
    state.windows.retain(|w| w.id != window_id);
    if state.windows.len() == before {
        return false;
    }
    settle_window_focus(state);
    true
}

/// Hides `window_id` without touching its z-index.
pub fn minimize_window(state: &mut DesktopState, window_id: WindowId) -> bool {
    let Some(window) = find_window_mut(state, window_id) else {
        return false;
    };
    if window.minimized {
        return false;
    }
    window.minimized = true;
    settle_window_focus(state);
    true
}

/// Flips maximized presentation. Non-resizable windows never maximize.
pub fn toggle_maximize(state: &mut DesktopState, window_id: WindowId) -> bool {
    match find_window_mut(state, window_id) {
        Some(window) if window.resizable => {
            window.maximized = !window.maximized;
            true
        }
        _ => false,
    }
}

/// Commits restored-state bounds from a finished gesture. Ignored while maximized so the
/// pre-maximize geometry survives until restore.
pub fn set_geometry(state: &mut DesktopState, window_id: WindowId, rect: WindowRect) -> bool {
    match find_window_mut(state, window_id) {
        Some(window) if !window.maximized && window.geometry != rect => {
            window.geometry = rect;
            true
        }
        _ => false,
    }
}

/// Focus owner once no window can hold it: a focused icon, else the desktop.
pub fn fallback_focus_target(state: &DesktopState) -> FocusTarget {
    if state.icons.iter().any(|icon| icon.is_focused) {
        FocusTarget::Icon
    } else {
        FocusTarget::Desktop
    }
}

fn settle_window_focus(state: &mut DesktopState) {
    if state.focus_target == FocusTarget::Window && !state.has_visible_window() {
        state.focus_target = fallback_focus_target(state);
    }
}
