use std::sync::Arc;

use desktop_app_contract::{AppKind, ChromeButton};
use desktop_wm::geometry::Boundary;
use desktop_wm::{
    focused_window_id, reduce_desktop, AppCatalog, DesktopAction, DesktopRuntime, DesktopState,
    FocusTarget, HitRegion, IconId, LaunchTarget, Point, ShellConfig, WindowId, WindowRect,
};
use platform_host::{HostServices, Viewport};
use pretty_assertions::assert_eq;

fn desktop() -> Viewport {
    Viewport::new(1280, 800)
}

fn open(
    catalog: &AppCatalog,
    state: &Arc<DesktopState>,
    app_kind: AppKind,
) -> Arc<DesktopState> {
    let req = catalog.open_request(app_kind, desktop(), &ShellConfig::default());
    reduce_desktop(state, DesktopAction::OpenWindow(req))
}

fn empty_runtime() -> DesktopRuntime {
    let catalog = AppCatalog::builtin();
    let state = DesktopState::with_icons(catalog.icons().to_vec());
    DesktopRuntime::new(
        HostServices::headless(desktop()),
        catalog,
        ShellConfig::default(),
        state,
    )
}

/// Deterministic pointer walk; large steps regularly leave the viewport.
fn pointer_walk(seed: u64, steps: usize) -> Vec<Point> {
    let mut x = seed;
    (0..steps)
        .map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let px = ((x >> 33) % 8000) as i32 - 4000;
            let py = ((x >> 17) % 8000) as i32 - 4000;
            Point::new(px, py)
        })
        .collect()
}

#[test]
fn window_lifecycle_scenario() {
    let catalog = AppCatalog::builtin();
    let mut state = Arc::new(DesktopState::with_icons(catalog.icons().to_vec()));

    state = open(&catalog, &state, AppKind::MyComputer);
    state = open(&catalog, &state, AppKind::MyComputer);
    assert_eq!(state.windows_of_kind(AppKind::MyComputer).count(), 1);
    let a = state.windows[0].id;
    assert_eq!(focused_window_id(&state), Some(a));

    state = reduce_desktop(&state, DesktopAction::CloseWindow { window_id: a });
    assert!(state.windows.is_empty());
    assert_eq!(state.focus_target, FocusTarget::Desktop);

    state = open(&catalog, &state, AppKind::MyComputer);
    state = open(&catalog, &state, AppKind::Notepad);
    state = open(&catalog, &state, AppKind::Notepad);
    assert_eq!(state.windows.len(), 3);
    let ids: Vec<WindowId> = state.windows.iter().map(|w| w.id).collect();
    let z: Vec<u64> = state.windows.iter().map(|w| w.z_index).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(z.windows(2).all(|pair| pair[0] < pair[1]));

    let topmost = ids[2];
    state = reduce_desktop(&state, DesktopAction::MinimizeWindow { window_id: topmost });
    assert_eq!(focused_window_id(&state), Some(ids[1]));

    state = reduce_desktop(&state, DesktopAction::FocusIcon { icon_id: IconId(2) });
    assert_eq!(state.focused_icon_ids(), vec![IconId(2)]);
    state = reduce_desktop(
        &state,
        DesktopAction::BeginSelect {
            anchor: Point::new(40, 40),
        },
    );
    state = reduce_desktop(&state, DesktopAction::EndSelect);
    assert_eq!(state.selection_region, None);
    assert!(state.focused_icon_ids().is_empty());
}

#[test]
fn single_instance_kinds_never_duplicate() {
    let catalog = AppCatalog::builtin();
    let mut state = Arc::new(DesktopState::default());
    for round in 0..6 {
        state = open(&catalog, &state, AppKind::MyComputer);
        if round % 2 == 0 {
            let id = state.windows[0].id;
            state = reduce_desktop(&state, DesktopAction::MinimizeWindow { window_id: id });
            assert!(state.windows[0].minimized);
        }
        assert_eq!(state.windows_of_kind(AppKind::MyComputer).count(), 1);
    }
    assert!(!state.windows[0].minimized);
}

#[test]
fn focused_window_is_never_minimized() {
    let catalog = AppCatalog::builtin();
    let mut state = Arc::new(DesktopState::default());
    for _ in 0..4 {
        state = open(&catalog, &state, AppKind::Notepad);
    }
    for step in 0..12u64 {
        let target = WindowId(1 + step % 4);
        let action = if step % 3 == 0 {
            DesktopAction::FocusWindow { window_id: target }
        } else {
            DesktopAction::MinimizeWindow { window_id: target }
        };
        state = reduce_desktop(&state, action);
        if let Some(id) = focused_window_id(&state) {
            let window = state.window(id).expect("focused window exists");
            assert!(!window.minimized);
            let top = state
                .windows
                .iter()
                .filter(|w| !w.minimized)
                .map(|w| w.z_index)
                .max();
            assert_eq!(Some(window.z_index), top);
        }
    }
}

#[test]
fn counters_strictly_increase_across_a_session() {
    let catalog = AppCatalog::builtin();
    let mut state = Arc::new(DesktopState::default());
    let mut seen_ids = Vec::new();
    let mut last_z = 0;
    for round in 0..10 {
        state = open(&catalog, &state, AppKind::Paint);
        let newest = state.windows.last().expect("window");
        assert!(newest.z_index > last_z);
        last_z = newest.z_index;
        assert!(!seen_ids.contains(&newest.id));
        seen_ids.push(newest.id);
        if round % 3 == 0 {
            state = reduce_desktop(&state, DesktopAction::CloseWindow { window_id: newest.id });
        }
    }
}

#[test]
fn drag_never_leaves_the_boundary() {
    let mut runtime = empty_runtime();
    runtime.launch(&LaunchTarget::App(AppKind::Notepad));
    let id = focused_window_id(runtime.state()).expect("notepad");
    let boundary = Boundary::for_viewport(desktop(), runtime.config());

    assert!(runtime.window_pointer_down(id, Point::new(400, 75), HitRegion::TitleBar));
    for pointer in pointer_walk(7, 200) {
        let rect = runtime.window_pointer_move(id, pointer).expect("live drag");
        assert!((boundary.left..=boundary.right).contains(&rect.x), "{rect:?}");
        assert!((boundary.top..=boundary.bottom).contains(&rect.y), "{rect:?}");
    }
    runtime.window_pointer_up(id);
    let committed = runtime.state().window(id).expect("window").geometry;
    assert!((boundary.left..=boundary.right).contains(&committed.x));
    assert!((boundary.top..=boundary.bottom).contains(&committed.y));
}

#[test]
fn maximize_twice_restores_geometry() {
    let mut runtime = empty_runtime();
    runtime.launch(&LaunchTarget::App(AppKind::Notepad));
    let id = focused_window_id(runtime.state()).expect("notepad");
    let before = runtime.state().window(id).expect("window").geometry;

    assert!(runtime.chrome_control(id, ChromeButton::Maximize));
    assert_eq!(
        runtime.window_layouts()[0].rect,
        WindowRect::new(-3, -3, 1286, 776)
    );
    assert!(runtime.title_bar_double_click(id));
    assert_eq!(runtime.state().window(id).expect("window").geometry, before);
    assert_eq!(runtime.window_layouts()[0].rect, before);
}

#[test]
fn resize_floor_holds_for_every_edge() {
    let config = ShellConfig::default();
    for (pointer, edge) in [
        (Point::new(927, 300), "east"),
        (Point::new(272, 300), "west"),
        (Point::new(500, 558), "south"),
        (Point::new(500, 62), "north"),
    ] {
        let mut runtime = empty_runtime();
        runtime.launch(&LaunchTarget::App(AppKind::Notepad));
        let id = focused_window_id(runtime.state()).expect("notepad");
        let region = runtime.window_pointer_down_at(id, pointer);
        assert!(matches!(region, HitRegion::Resize(_)), "{edge}: {region:?}");
        for far in pointer_walk(11, 50) {
            let rect = runtime.window_pointer_move(id, far).expect("live resize");
            assert!(rect.w >= config.min_window_width, "{edge}: {rect:?}");
            assert!(rect.h >= config.min_window_height, "{edge}: {rect:?}");
        }
    }
}
