//! Replay script format and the loop that feeds it to a [`DesktopRuntime`].

use std::sync::Arc;

use desktop_app_contract::ChromeButton;
use desktop_wm::{
    DesktopAction, DesktopRuntime, HitRegion, IconId, LaunchTarget, Point, WindowId, WindowRect,
};
use platform_host::{FixedViewport, Viewport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayScript {
    #[serde(default)]
    pub viewport: Option<ViewportSize>,
    #[serde(default)]
    pub events: Vec<ReplayEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    Launch {
        target: LaunchTarget,
    },
    Dispatch {
        action: DesktopAction,
    },
    /// Without `region` the runtime hit-tests the stored geometry.
    PointerDown {
        window_id: WindowId,
        x: i32,
        y: i32,
        #[serde(default)]
        region: Option<HitRegion>,
    },
    PointerMove {
        window_id: WindowId,
        x: i32,
        y: i32,
    },
    PointerUp {
        window_id: WindowId,
    },
    PointerCancel {
        window_id: WindowId,
    },
    DoubleClick {
        window_id: WindowId,
    },
    TitleIconDoubleClick {
        window_id: WindowId,
    },
    Control {
        window_id: WindowId,
        button: ChromeButton,
    },
    Taskbar {
        window_id: WindowId,
    },
    IconClick {
        icon_id: IconId,
    },
    SelectStart {
        x: i32,
        y: i32,
    },
    SelectMove {
        x: i32,
        y: i32,
        #[serde(default)]
        icons: Vec<(IconId, WindowRect)>,
    },
    SelectEnd,
    ConfirmPowerOff,
    Resize {
        width: i32,
        height: i32,
    },
}

impl ReplayEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Launch { .. } => "launch",
            Self::Dispatch { .. } => "dispatch",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerCancel { .. } => "pointer_cancel",
            Self::DoubleClick { .. } => "double_click",
            Self::TitleIconDoubleClick { .. } => "title_icon_double_click",
            Self::Control { .. } => "control",
            Self::Taskbar { .. } => "taskbar",
            Self::IconClick { .. } => "icon_click",
            Self::SelectStart { .. } => "select_start",
            Self::SelectMove { .. } => "select_move",
            Self::SelectEnd => "select_end",
            Self::ConfirmPowerOff => "confirm_power_off",
            Self::Resize { .. } => "resize",
        }
    }
}

/// Feeds every event to `runtime`. Returns how many events changed the desktop state.
pub fn replay(
    runtime: &mut DesktopRuntime,
    viewport: &FixedViewport,
    events: &[ReplayEvent],
) -> usize {
    let mut changed = 0;
    for (step, event) in events.iter().enumerate() {
        let applied = apply_event(runtime, viewport, event);
        tracing::debug!(step, event = event.name(), changed = applied, "replayed");
        if applied {
            changed += 1;
        }
    }
    changed
}

fn apply_event(
    runtime: &mut DesktopRuntime,
    viewport: &FixedViewport,
    event: &ReplayEvent,
) -> bool {
    match event {
        ReplayEvent::Launch { target } => runtime.launch(target),
        ReplayEvent::Dispatch { action } => runtime.dispatch(action.clone()),
        ReplayEvent::PointerDown {
            window_id,
            x,
            y,
            region,
        } => {
            let before = Arc::clone(runtime.state());
            let pointer = Point::new(*x, *y);
            match region {
                Some(region) => {
                    runtime.window_pointer_down(*window_id, pointer, *region);
                }
                None => {
                    runtime.window_pointer_down_at(*window_id, pointer);
                }
            }
            !Arc::ptr_eq(&before, runtime.state())
        }
        ReplayEvent::PointerMove { window_id, x, y } => {
            runtime.window_pointer_move(*window_id, Point::new(*x, *y));
            false
        }
        ReplayEvent::PointerUp { window_id } => runtime.window_pointer_up(*window_id),
        ReplayEvent::PointerCancel { window_id } => runtime.window_pointer_cancel(*window_id),
        ReplayEvent::DoubleClick { window_id } => runtime.title_bar_double_click(*window_id),
        ReplayEvent::TitleIconDoubleClick { window_id } => {
            runtime.title_icon_double_click(*window_id)
        }
        ReplayEvent::Control { window_id, button } => runtime.chrome_control(*window_id, *button),
        ReplayEvent::Taskbar { window_id } => runtime.taskbar_click(*window_id),
        ReplayEvent::IconClick { icon_id } => runtime.icon_click(*icon_id),
        ReplayEvent::SelectStart { x, y } => runtime.desktop_pointer_down(Point::new(*x, *y)),
        ReplayEvent::SelectMove { x, y, icons } => {
            runtime.desktop_pointer_move(Point::new(*x, *y), icons)
        }
        ReplayEvent::SelectEnd => runtime.desktop_pointer_up(),
        ReplayEvent::ConfirmPowerOff => runtime.confirm_power_off(),
        ReplayEvent::Resize { width, height } => {
            viewport.set(Viewport::new(*width, *height));
            false
        }
    }
}
