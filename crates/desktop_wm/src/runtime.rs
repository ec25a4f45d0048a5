//! Desktop runtime facade.
//!
//! [`DesktopRuntime`] owns the reducer state, the app catalog, the shell config, the host
//! services and one [`GestureState`] per window under a live pointer gesture. Hosts feed it raw
//! input (launches, pointer events, chrome clicks) and read back [`WindowLayout`] values.

use std::{collections::HashMap, sync::Arc};

use desktop_app_contract::{ChromeButton, WindowChrome, WindowCommand, WindowContentProps};
use platform_host::{HostServices, Viewport};
use serde::{Deserialize, Serialize};

use crate::apps::{
    confirm_power_off_actions, resolve_launch, AppCatalog, LaunchResolution, LaunchTarget,
};
use crate::config::ShellConfig;
use crate::focus::{
    chrome_control_action, focused_window_id, icons_in_region, is_focused, taskbar_action,
    taskbar_entries, title_bar_double_click_action, title_icon_double_click_action, TaskbarEntry,
};
use crate::geometry::{effective_rect, hit_test, presented_maximized, GestureState, HitRegion};
use crate::model::{DesktopState, IconId, Point, WindowId, WindowRect};
use crate::reducer::{reduce_desktop, DesktopAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Presentation of one window as the host should draw it.
pub struct WindowLayout {
    pub window_id: WindowId,
    pub title: String,
    pub icon: String,
    /// On-screen rect: the live gesture rect, the maximized rect, or the restored geometry.
    pub rect: WindowRect,
    pub z_index: u64,
    pub visible: bool,
    pub focused: bool,
    pub maximized: bool,
    pub chrome: WindowChrome,
    pub props: WindowContentProps,
}

/// Single-threaded owner of the desktop state and the in-flight pointer gestures.
pub struct DesktopRuntime {
    state: Arc<DesktopState>,
    catalog: AppCatalog,
    config: ShellConfig,
    host: HostServices,
    gestures: HashMap<WindowId, GestureState>,
}

impl DesktopRuntime {
    pub fn new(
        host: HostServices,
        catalog: AppCatalog,
        config: ShellConfig,
        state: DesktopState,
    ) -> Self {
        Self {
            state: Arc::new(state),
            catalog,
            config,
            host,
            gestures: HashMap::new(),
        }
    }

    /// Runtime with the catalog's power-on state: default icons plus the boot apps.
    pub fn boot(host: HostServices, catalog: AppCatalog, config: ShellConfig) -> Self {
        let state = catalog.boot_state(host.viewport.viewport(), &config);
        tracing::debug!(windows = state.windows.len(), "desktop booted");
        Self::new(host, catalog, config, state)
    }

    pub fn state(&self) -> &Arc<DesktopState> {
        &self.state
    }

    pub fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.host.viewport.viewport()
    }

    /// Runs `action` through the reducer. Returns whether the state changed.
    pub fn dispatch(&mut self, action: DesktopAction) -> bool {
        let next = reduce_desktop(&self.state, action);
        if Arc::ptr_eq(&next, &self.state) {
            return false;
        }
        self.state = next;
        self.prune_gestures();
        true
    }

    /// Resolves and performs a launch. External targets go to the host and leave state as is.
    pub fn launch(&mut self, target: &LaunchTarget) -> bool {
        let viewport = self.viewport();
        match resolve_launch(&self.catalog, &self.state, target, viewport, &self.config) {
            LaunchResolution::External(url) => {
                tracing::debug!(%url, "opening external target");
                self.host.external_url.open_url(&url);
                false
            }
            LaunchResolution::Dispatch(action) => self.dispatch(action),
            LaunchResolution::Ignore => {
                tracing::trace!(launch = ?target, "stale launch target ignored");
                false
            }
        }
    }

    /// Confirms the power-off modal.
    pub fn confirm_power_off(&mut self) -> bool {
        let viewport = self.viewport();
        let mut changed = false;
        for action in confirm_power_off_actions(&self.catalog, viewport, &self.config) {
            changed |= self.dispatch(action);
        }
        changed
    }

    /// Pointer-down on a window in a host-resolved region. Focuses the window first, then starts
    /// a drag or resize when the region is a handle. Returns whether a gesture started.
    pub fn window_pointer_down(
        &mut self,
        window_id: WindowId,
        pointer: Point,
        region: HitRegion,
    ) -> bool {
        if self.state.window(window_id).is_none() {
            return false;
        }
        self.dispatch(DesktopAction::FocusWindow { window_id });

        let viewport = self.viewport();
        let gesture = match self.state.window(window_id) {
            Some(window) => GestureState::begin(window, pointer, region, viewport),
            None => GestureState::Idle,
        };
        if gesture.is_idle() {
            self.gestures.remove(&window_id);
            return false;
        }
        self.gestures.insert(window_id, gesture);
        true
    }

    /// Pointer-down classified with [`hit_test`] against the stored geometry.
    ///
    /// The window is focused even when the pointer falls outside its stored rect. Content-sized
    /// windows have no known extent here, so they never start a gesture this way; hosts that
    /// measure them should call [`Self::window_pointer_down`] with their own region.
    pub fn window_pointer_down_at(&mut self, window_id: WindowId, pointer: Point) -> HitRegion {
        let viewport = self.viewport();
        let region = match self.state.window(window_id) {
            Some(window) => hit_test(window, pointer, viewport, &self.config),
            None => return HitRegion::Outside,
        };
        self.window_pointer_down(window_id, pointer, region);
        region
    }

    /// Feeds the latest pointer position to the window's gesture and returns the live rect.
    pub fn window_pointer_move(
        &mut self,
        window_id: WindowId,
        pointer: Point,
    ) -> Option<WindowRect> {
        let viewport = self.viewport();
        self.gestures
            .get_mut(&window_id)?
            .update(pointer, viewport, &self.config)
    }

    /// Ends the gesture and commits the final rect.
    pub fn window_pointer_up(&mut self, window_id: WindowId) -> bool {
        self.finish_gesture(window_id)
    }

    /// Abandons the gesture. The last live rect is committed, the same as a release.
    pub fn window_pointer_cancel(&mut self, window_id: WindowId) -> bool {
        self.finish_gesture(window_id)
    }

    fn finish_gesture(&mut self, window_id: WindowId) -> bool {
        let Some(rect) = self
            .gestures
            .remove(&window_id)
            .and_then(|mut gesture| gesture.finish())
        else {
            return false;
        };
        self.dispatch(DesktopAction::SetGeometry { window_id, rect })
    }

    pub fn title_bar_double_click(&mut self, window_id: WindowId) -> bool {
        match title_bar_double_click_action(&self.state, window_id) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    pub fn chrome_control(&mut self, window_id: WindowId, button: ChromeButton) -> bool {
        let mobile = self.viewport().mobile;
        match chrome_control_action(&self.state, window_id, button, mobile) {
            Some(action) => self.dispatch(action),
            None => {
                tracing::trace!(window = window_id.0, ?button, "chrome control swallowed");
                false
            }
        }
    }

    pub fn taskbar_click(&mut self, window_id: WindowId) -> bool {
        let mobile = self.viewport().mobile;
        match taskbar_action(&self.state, window_id, mobile) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    /// Applies a command emitted by a window's content. Minimize follows the same focus gate as
    /// the title-bar button; close is always honored.
    pub fn run_window_command(&mut self, command: WindowCommand) -> bool {
        match command {
            WindowCommand::Close(id) => self.dispatch(DesktopAction::CloseWindow {
                window_id: WindowId(id),
            }),
            WindowCommand::Minimize(id) => {
                let window_id = WindowId(id);
                if self.viewport().mobile || !is_focused(&self.state, window_id) {
                    tracing::trace!(window = id, "content minimize swallowed");
                    return false;
                }
                self.dispatch(DesktopAction::MinimizeWindow { window_id })
            }
        }
    }

    /// Double-click on the title-bar icon closes the window.
    pub fn title_icon_double_click(&mut self, window_id: WindowId) -> bool {
        match title_icon_double_click_action(&self.state, window_id) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    pub fn icon_click(&mut self, icon_id: IconId) -> bool {
        self.dispatch(DesktopAction::FocusIcon { icon_id })
    }

    /// Pointer-down on the bare desktop: starts a rubber-band selection.
    pub fn desktop_pointer_down(&mut self, pointer: Point) -> bool {
        self.dispatch(DesktopAction::BeginSelect { anchor: pointer })
    }

    /// Extends the selection and marks the icons whose host-measured bounds it touches.
    pub fn desktop_pointer_move(&mut self, pointer: Point, icons: &[(IconId, WindowRect)]) -> bool {
        let mut changed = self.dispatch(DesktopAction::UpdateSelect { pointer });
        if let Some(region) = self.state.selection_region {
            let icon_ids = icons_in_region(icons, region);
            if icon_ids != self.state.focused_icon_ids() {
                changed |= self.dispatch(DesktopAction::SelectIcons { icon_ids });
            }
        }
        changed
    }

    pub fn desktop_pointer_up(&mut self) -> bool {
        self.dispatch(DesktopAction::EndSelect)
    }

    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        taskbar_entries(&self.state)
    }

    /// Windows in stacking order, bottom first.
    pub fn window_layouts(&self) -> Vec<WindowLayout> {
        let viewport = self.viewport();
        let focused = focused_window_id(&self.state);
        self.state
            .stacking_order()
            .into_iter()
            .map(|window| {
                let rect = self
                    .gestures
                    .get(&window.id)
                    .and_then(GestureState::live_rect)
                    .unwrap_or_else(|| effective_rect(window, viewport, &self.config));
                let is_focused = focused == Some(window.id);
                WindowLayout {
                    window_id: window.id,
                    title: window.title.clone(),
                    icon: window.icon.clone(),
                    rect,
                    z_index: window.z_index,
                    visible: !window.minimized,
                    focused: is_focused,
                    maximized: presented_maximized(window, viewport),
                    chrome: window.chrome.clone(),
                    props: WindowContentProps {
                        window_id: window.id.0,
                        is_focused,
                        mobile: viewport.mobile,
                        on_close: WindowCommand::Close(window.id.0),
                        on_minimize: (!viewport.mobile)
                            .then_some(WindowCommand::Minimize(window.id.0)),
                        inject: window.inject.clone(),
                    },
                }
            })
            .collect()
    }

    fn prune_gestures(&mut self) {
        let state = &self.state;
        let viewport = self.host.viewport.viewport();
        self.gestures.retain(|id, _| {
            state
                .window(*id)
                .is_some_and(|w| !w.minimized && !presented_maximized(w, viewport))
        });
    }
}

impl std::fmt::Debug for DesktopRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopRuntime")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("gestures", &self.gestures)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use desktop_app_contract::AppKind;
    use platform_host::{FixedViewport, MemoryExternalUrlService};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::FocusTarget;

    struct Harness {
        runtime: DesktopRuntime,
        viewport: FixedViewport,
        urls: MemoryExternalUrlService,
    }

    fn harness(viewport: Viewport) -> Harness {
        let fixed = FixedViewport::new(viewport);
        let urls = MemoryExternalUrlService::default();
        let host = HostServices::new(Rc::new(fixed.clone()), Rc::new(urls.clone()));
        let catalog = AppCatalog::builtin();
        let state = DesktopState::with_icons(catalog.icons().to_vec());
        Harness {
            runtime: DesktopRuntime::new(host, catalog, ShellConfig::default(), state),
            viewport: fixed,
            urls,
        }
    }

    fn desktop() -> Viewport {
        Viewport::new(1280, 800)
    }

    fn open_notepad(runtime: &mut DesktopRuntime) -> WindowId {
        assert!(runtime.launch(&LaunchTarget::App(AppKind::Notepad)));
        focused_window_id(runtime.state()).expect("notepad focused")
    }

    #[test]
    fn boot_opens_boot_apps() {
        let host = HostServices::headless(desktop());
        let runtime = DesktopRuntime::boot(host, AppCatalog::builtin(), ShellConfig::default());
        assert_eq!(runtime.state().windows.len(), 2);
        assert_eq!(runtime.state().focus_target, FocusTarget::Window);
    }

    #[test]
    fn external_icons_open_through_host_only() {
        let mut h = harness(desktop());
        let before = Arc::clone(h.runtime.state());
        assert!(!h.runtime.launch(&LaunchTarget::Icon(IconId(0))));
        assert_eq!(h.urls.opened(), vec!["https://example.com/"]);
        assert!(Arc::ptr_eq(&before, h.runtime.state()));
    }

    #[test]
    fn title_bar_drag_commits_on_release() {
        let mut h = harness(desktop());
        let id = open_notepad(&mut h.runtime);

        assert_eq!(
            h.runtime.window_pointer_down_at(id, Point::new(400, 75)),
            HitRegion::TitleBar
        );
        assert_eq!(
            h.runtime.window_pointer_move(id, Point::new(500, 175)),
            Some(WindowRect::new(370, 160, 660, 500))
        );
        let live = h.runtime.window_layouts();
        assert_eq!(live[0].rect, WindowRect::new(370, 160, 660, 500));
        assert_eq!(
            h.runtime.state().window(id).map(|w| w.geometry),
            Some(WindowRect::new(270, 60, 660, 500))
        );

        assert!(h.runtime.window_pointer_up(id));
        assert_eq!(
            h.runtime.state().window(id).map(|w| w.geometry),
            Some(WindowRect::new(370, 160, 660, 500))
        );
        assert_eq!(h.runtime.window_pointer_move(id, Point::new(0, 0)), None);
    }

    #[test]
    fn east_border_resizes_and_cancel_commits_last_rect() {
        let mut h = harness(desktop());
        let id = open_notepad(&mut h.runtime);

        assert_eq!(
            h.runtime.window_pointer_down_at(id, Point::new(925, 300)),
            HitRegion::Resize(crate::model::ResizeEdge::East)
        );
        h.runtime.window_pointer_move(id, Point::new(1025, 300));
        assert!(h.runtime.window_pointer_cancel(id));
        assert_eq!(
            h.runtime.state().window(id).map(|w| w.geometry),
            Some(WindowRect::new(270, 60, 760, 500))
        );
    }

    #[test]
    fn pointer_down_on_background_window_focuses_it() {
        let mut h = harness(desktop());
        let first = open_notepad(&mut h.runtime);
        let second = open_notepad(&mut h.runtime);
        assert_ne!(first, second);

        h.runtime.window_pointer_down(first, Point::new(300, 300), HitRegion::Content);
        assert_eq!(focused_window_id(h.runtime.state()), Some(first));
    }

    #[test]
    fn closing_a_window_drops_its_gesture() {
        let mut h = harness(desktop());
        let id = open_notepad(&mut h.runtime);
        assert!(h.runtime.window_pointer_down(id, Point::new(400, 75), HitRegion::TitleBar));
        assert!(h.runtime.chrome_control(id, ChromeButton::Close));
        assert_eq!(h.runtime.window_pointer_move(id, Point::new(10, 10)), None);
        assert!(!h.runtime.window_pointer_up(id));
        assert_eq!(h.runtime.state().focus_target, FocusTarget::Desktop);
    }

    #[test]
    fn mobile_layouts_present_fullscreen_without_minimize() {
        let mut h = harness(desktop());
        let id = open_notepad(&mut h.runtime);
        h.viewport.set(Viewport::new(390, 844));

        let layout = &h.runtime.window_layouts()[0];
        assert!(layout.maximized);
        assert_eq!(layout.rect, WindowRect::new(-3, -3, 396, 820));
        assert_eq!(layout.props.on_minimize, None);
        assert!(!h.runtime.run_window_command(WindowCommand::Minimize(id.0)));
        assert!(!h.runtime.window_pointer_down(id, Point::new(100, 10), HitRegion::TitleBar));
    }

    #[test]
    fn taskbar_click_minimizes_then_restores() {
        let mut h = harness(desktop());
        let id = open_notepad(&mut h.runtime);
        assert!(h.runtime.taskbar_click(id));
        assert!(h.runtime.state().window(id).is_some_and(|w| w.minimized));
        assert!(h.runtime.taskbar_click(id));
        assert_eq!(focused_window_id(h.runtime.state()), Some(id));
    }

    #[test]
    fn content_minimize_requires_focus() {
        let mut h = harness(desktop());
        let back = open_notepad(&mut h.runtime);
        assert!(h.runtime.launch(&LaunchTarget::App(AppKind::Paint)));
        let front = focused_window_id(h.runtime.state()).expect("paint focused");

        let before = Arc::clone(h.runtime.state());
        assert!(!h.runtime.run_window_command(WindowCommand::Minimize(back.0)));
        assert!(Arc::ptr_eq(&before, h.runtime.state()));

        assert!(h.runtime.run_window_command(WindowCommand::Minimize(front.0)));
        assert!(h.runtime.state().window(front).is_some_and(|w| w.minimized));
        assert!(h.runtime.run_window_command(WindowCommand::Close(front.0)));
        assert!(h.runtime.run_window_command(WindowCommand::Close(back.0)));
        assert!(h.runtime.state().windows.is_empty());
    }

    #[test]
    fn title_icon_double_click_closes_background_windows_too() {
        let mut h = harness(desktop());
        let back = open_notepad(&mut h.runtime);
        let front = open_notepad(&mut h.runtime);
        assert!(h.runtime.title_icon_double_click(back));
        assert!(h.runtime.state().window(back).is_none());
        assert_eq!(focused_window_id(h.runtime.state()), Some(front));
        assert!(!h.runtime.title_icon_double_click(back));
    }

    #[test]
    fn pointer_down_focuses_content_sized_windows() {
        let mut h = harness(desktop());
        assert!(h.runtime.launch(&LaunchTarget::App(AppKind::Minesweeper)));
        let mines = focused_window_id(h.runtime.state()).expect("minesweeper focused");
        let notepad = open_notepad(&mut h.runtime);
        assert_eq!(focused_window_id(h.runtime.state()), Some(notepad));

        assert_eq!(
            h.runtime.window_pointer_down_at(mines, Point::new(200, 190)),
            HitRegion::Outside
        );
        assert_eq!(focused_window_id(h.runtime.state()), Some(mines));
        assert_eq!(h.runtime.window_pointer_move(mines, Point::new(300, 300)), None);
    }

    #[test]
    fn content_commands_route_to_reducer() {
        let mut h = harness(desktop());
        let id = open_notepad(&mut h.runtime);
        let props = h.runtime.window_layouts()[0].props.clone();
        assert!(h.runtime.run_window_command(props.on_close));
        assert!(h.runtime.state().window(id).is_none());
    }

    #[test]
    fn rubber_band_selects_touching_icons() {
        let mut h = harness(desktop());
        let icons = [
            (IconId(0), WindowRect::new(10, 10, 70, 70)),
            (IconId(1), WindowRect::new(10, 100, 70, 70)),
        ];
        assert!(h.runtime.desktop_pointer_down(Point::new(40, 40)));
        assert!(h.runtime.desktop_pointer_move(Point::new(60, 60), &icons));
        assert_eq!(h.runtime.state().focused_icon_ids(), vec![IconId(0)]);
        assert!(h.runtime.desktop_pointer_move(Point::new(60, 120), &icons));
        assert_eq!(
            h.runtime.state().focused_icon_ids(),
            vec![IconId(0), IconId(1)]
        );
        assert!(h.runtime.desktop_pointer_up());
        assert_eq!(h.runtime.state().selection_region, None);
    }

    #[test]
    fn confirming_power_off_closes_modal_and_reports_error() {
        let mut h = harness(desktop());
        h.runtime.launch(&LaunchTarget::Menu("Turn Off Computer".to_string()));
        assert!(h.runtime.confirm_power_off());
        let state = h.runtime.state();
        assert_eq!(state.power_state, crate::model::PowerState::Running);
        assert_eq!(state.windows[0].app_kind, AppKind::ErrorBox);
    }
}
