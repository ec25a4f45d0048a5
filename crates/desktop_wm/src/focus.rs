//! Focus and stacking policy: derived focus queries plus the gates that decide which chrome,
//! taskbar and selection gestures turn into reducer actions.

use desktop_app_contract::ChromeButton;
use serde::{Deserialize, Serialize};

use crate::model::{DesktopState, FocusTarget, IconId, SelectionRegion, WindowId, WindowRect};
use crate::reducer::DesktopAction;

/// Window owning focus: the highest `z_index` among non-minimized windows, and only while the
/// focus target is [`FocusTarget::Window`]. Always derived, never stored.
pub fn focused_window_id(state: &DesktopState) -> Option<WindowId> {
    if state.focus_target != FocusTarget::Window {
        return None;
    }
    state
        .windows
        .iter()
        .filter(|w| !w.minimized)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id)
}

pub fn is_focused(state: &DesktopState, window_id: WindowId) -> bool {
    focused_window_id(state) == Some(window_id)
}

/// Action for a title-bar button click, or `None` when the click is swallowed.
///
/// Close works on any window. Minimize and maximize only act on the focused window, so a
/// background window has to be activated first. Mobile layouts have no minimize.
pub fn chrome_control_action(
    state: &DesktopState,
    window_id: WindowId,
    button: ChromeButton,
    mobile: bool,
) -> Option<DesktopAction> {
    let window = state.window(window_id)?;
    if !window.chrome.has_button(button) {
        return None;
    }
    match button {
        ChromeButton::Close => Some(DesktopAction::CloseWindow { window_id }),
        ChromeButton::Minimize if !mobile && is_focused(state, window_id) => {
            Some(DesktopAction::MinimizeWindow { window_id })
        }
        ChromeButton::Maximize if window.resizable && is_focused(state, window_id) => {
            Some(DesktopAction::ToggleMaximize { window_id })
        }
        _ => None,
    }
}

/// Action for a title-bar double click: toggles maximize on resizable windows.
pub fn title_bar_double_click_action(
    state: &DesktopState,
    window_id: WindowId,
) -> Option<DesktopAction> {
    state
        .window(window_id)
        .filter(|w| w.resizable && !w.chrome.invisible)
        .map(|_| DesktopAction::ToggleMaximize { window_id })
}

/// Action for a double click on the title-bar icon: closes the window, focused or not. Windows
/// with invisible chrome draw no icon.
pub fn title_icon_double_click_action(
    state: &DesktopState,
    window_id: WindowId,
) -> Option<DesktopAction> {
    state
        .window(window_id)
        .filter(|w| !w.chrome.invisible)
        .map(|_| DesktopAction::CloseWindow { window_id })
}

/// Taskbar button behavior: the focused window minimizes, any other window is focused.
pub fn taskbar_action(
    state: &DesktopState,
    window_id: WindowId,
    mobile: bool,
) -> Option<DesktopAction> {
    state.window(window_id)?;
    if is_focused(state, window_id) {
        if mobile {
            None
        } else {
            Some(DesktopAction::MinimizeWindow { window_id })
        }
    } else {
        Some(DesktopAction::FocusWindow { window_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub title: String,
    pub icon: String,
    pub focused: bool,
    pub minimized: bool,
}

/// Taskbar buttons in window insertion order.
pub fn taskbar_entries(state: &DesktopState) -> Vec<TaskbarEntry> {
    let focused = focused_window_id(state);
    state
        .windows
        .iter()
        .filter(|w| w.chrome.show_in_taskbar)
        .map(|w| TaskbarEntry {
            window_id: w.id,
            title: w.title.clone(),
            icon: w.icon.clone(),
            focused: focused == Some(w.id),
            minimized: w.minimized,
        })
        .collect()
}

/// Icons whose host-measured bounds touch the rubber-band rectangle.
pub fn icons_in_region(layout: &[(IconId, WindowRect)], region: SelectionRegion) -> Vec<IconId> {
    let rect = region.rect();
    layout
        .iter()
        .filter(|(_, bounds)| bounds.intersects(rect))
        .map(|(id, _)| *id)
        .collect()
}
