//! App catalog and launch resolution.
//!
//! Launch specs come from the TOML manifests under `manifests/`, validated by the build script
//! and embedded as JSON. Resolution keys on [`AppKind`] alone, so an icon and a start-menu entry
//! for the same app share single-instance enforcement.

use desktop_app_contract::{AppKind, LaunchSpec, WindowChrome, WindowOffset, WindowSize};
use platform_host::Viewport;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::ShellConfig;
use crate::model::{
    DesktopIcon, DesktopState, IconId, IconTarget, OpenWindowRequest, PowerState, WindowRect,
};
use crate::reducer::DesktopAction;
use crate::window_manager::open_window;

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

/// Message shown by the error box for start-menu entries with no mapped app.
pub const APP_NOT_FOUND_MESSAGE: &str = "C:\\\nApplication not found";

/// Height assumed for centering a content-sized dialog.
const AUTO_DIALOG_HEIGHT: i32 = 120;

#[derive(Debug, Error)]
/// Errors raised while building an [`AppCatalog`].
pub enum CatalogError {
    /// Embedded or supplied JSON failed to parse.
    #[error("failed to parse app catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A TOML manifest document failed to parse.
    #[error("failed to parse app manifest: {0}")]
    Toml(#[from] toml::de::Error),
    /// Two launch specs declare the same kind.
    #[error("duplicate launch spec for `{0}`")]
    DuplicateApp(AppKind),
    /// Two desktop icons share an id.
    #[error("duplicate desktop icon id {0}")]
    DuplicateIcon(u32),
}

#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    apps: Vec<LaunchSpec>,
    #[serde(default)]
    icons: Vec<DesktopIcon>,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Launch specs by app kind plus the default desktop icon set.
pub struct AppCatalog {
    specs: Vec<LaunchSpec>,
    icons: Vec<DesktopIcon>,
}

impl AppCatalog {
    /// Catalog compiled from the bundled manifests.
    ///
    /// The build script already validated the manifests; should the embedded JSON still fail to
    /// parse, the failure is logged and an empty catalog is returned. Launches then resolve to
    /// the error box, which keeps dispatch total.
    pub fn builtin() -> Self {
        match Self::from_json(APP_CATALOG_JSON, DESKTOP_ICONS_JSON) {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::error!("built-in app catalog is unusable: {err}");
                Self::default()
            }
        }
    }

    /// Builds a catalog from JSON arrays of launch specs and icons.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed input and a duplicate error when kinds or
    /// icon ids repeat.
    pub fn from_json(apps: &str, icons: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(apps)?, serde_json::from_str(icons)?)
    }

    /// Builds a catalog from a TOML document with `[[apps]]` and `[[icons]]` tables.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Toml`] for malformed input and a duplicate error when kinds or
    /// icon ids repeat.
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = toml::from_str(raw)?;
        Self::new(document.apps, document.icons)
    }

    /// Builds a catalog from already-parsed parts.
    ///
    /// # Errors
    ///
    /// Returns a duplicate error when kinds or icon ids repeat.
    pub fn new(specs: Vec<LaunchSpec>, icons: Vec<DesktopIcon>) -> Result<Self, CatalogError> {
        for (idx, spec) in specs.iter().enumerate() {
            if specs[..idx].iter().any(|s| s.app_kind == spec.app_kind) {
                return Err(CatalogError::DuplicateApp(spec.app_kind));
            }
        }
        for (idx, icon) in icons.iter().enumerate() {
            if icons[..idx].iter().any(|i| i.id == icon.id) {
                return Err(CatalogError::DuplicateIcon(icon.id.0));
            }
        }
        Ok(Self { specs, icons })
    }

    pub fn spec(&self, app_kind: AppKind) -> Option<&LaunchSpec> {
        self.specs.iter().find(|spec| spec.app_kind == app_kind)
    }

    pub fn specs(&self) -> &[LaunchSpec] {
        &self.specs
    }

    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    /// Desktop state at power-on: the default icons plus every `open_on_boot` app.
    pub fn boot_state(&self, viewport: Viewport, config: &ShellConfig) -> DesktopState {
        let mut state = DesktopState::with_icons(self.icons.clone());
        for spec in self.specs.iter().filter(|spec| spec.open_on_boot) {
            let mut req = request_from_spec(spec, viewport, config, Value::Null);
            if let Some(size) = spec.boot_size {
                req.geometry.w = size.width;
                req.geometry.h = size.height;
            }
            if let Some(offset) = spec.boot_offset {
                req.geometry.x = offset.x;
                req.geometry.y = offset.y;
            }
            open_window(&mut state, req);
        }
        state
    }

    /// Open request for `app_kind`, or the not-found error box when the kind has no spec.
    pub fn open_request(
        &self,
        app_kind: AppKind,
        viewport: Viewport,
        config: &ShellConfig,
    ) -> OpenWindowRequest {
        match self.spec(app_kind) {
            Some(spec) => request_from_spec(spec, viewport, config, Value::Null),
            None => {
                tracing::warn!(app = %app_kind, "no launch spec; opening error box");
                self.error_request(Some(APP_NOT_FOUND_MESSAGE), viewport, config)
            }
        }
    }

    /// Open request for the error box, optionally injecting a message.
    pub fn error_request(
        &self,
        message: Option<&str>,
        viewport: Viewport,
        config: &ShellConfig,
    ) -> OpenWindowRequest {
        let inject = message.map_or(Value::Null, |message| json!({ "message": message }));
        match self.spec(AppKind::ErrorBox) {
            Some(spec) => request_from_spec(spec, viewport, config, inject),
            None => request_from_spec(&error_box_spec(), viewport, config, inject),
        }
    }
}

impl DesktopState {
    /// Desktop state at power-on for `catalog`. See [`AppCatalog::boot_state`].
    pub fn boot(catalog: &AppCatalog, viewport: Viewport, config: &ShellConfig) -> Self {
        catalog.boot_state(viewport, config)
    }
}

/// Fallback error-box spec for catalogs that do not declare one.
pub fn error_box_spec() -> LaunchSpec {
    LaunchSpec {
        app_kind: AppKind::ErrorBox,
        title: "C:\\".to_string(),
        icon: "error".to_string(),
        default_size: WindowSize {
            width: 380,
            height: 0,
        },
        default_offset: WindowOffset::default(),
        resizable: false,
        allows_multiple_instances: true,
        chrome: WindowChrome {
            invisible: false,
            buttons: vec![desktop_app_contract::ChromeButton::Close],
            show_in_taskbar: false,
        },
        centered: true,
        open_on_boot: false,
        boot_size: None,
        boot_offset: None,
    }
}

fn request_from_spec(
    spec: &LaunchSpec,
    viewport: Viewport,
    config: &ShellConfig,
    inject: Value,
) -> OpenWindowRequest {
    let size = spec.default_size;
    let offset = if spec.centered {
        let height = if size.height > 0 {
            size.height
        } else {
            AUTO_DIALOG_HEIGHT
        };
        WindowOffset {
            x: (viewport.width - size.width) / 2,
            y: (viewport.height - height) / 2,
        }
    } else {
        spec.default_offset
    };
    OpenWindowRequest {
        app_kind: spec.app_kind,
        title: spec.title.clone(),
        icon: spec.icon.clone(),
        geometry: WindowRect::new(offset.x, offset.y, size.width, size.height),
        resizable: spec.resizable,
        allows_multiple_instances: spec.allows_multiple_instances,
        chrome: spec.chrome.clone(),
        maximized: spec.resizable && viewport.width < config.compact_width,
        inject,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
/// What the user activated to ask for an app.
pub enum LaunchTarget {
    /// Double-click or tap on a desktop icon.
    Icon(IconId),
    /// Start-menu entry by label.
    Menu(String),
    /// Direct request for an app kind.
    App(AppKind),
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of [`resolve_launch`].
pub enum LaunchResolution {
    /// Open this URL with the host; desktop state is untouched.
    External(String),
    /// Dispatch this action.
    Dispatch(DesktopAction),
    /// Stale target; nothing to do.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Meaning of a start-menu label.
pub enum MenuEntry {
    App(AppKind),
    Power(PowerState),
    Unknown,
}

pub fn menu_entry(label: &str) -> MenuEntry {
    match label {
        "Internet" => MenuEntry::App(AppKind::InternetExplorer),
        "Minesweeper" => MenuEntry::App(AppKind::Minesweeper),
        "My Computer" => MenuEntry::App(AppKind::MyComputer),
        "Notepad" => MenuEntry::App(AppKind::Notepad),
        "Winamp" => MenuEntry::App(AppKind::Winamp),
        "Paint" => MenuEntry::App(AppKind::Paint),
        "Log Off" => MenuEntry::Power(PowerState::LoggingOff),
        "Turn Off Computer" => MenuEntry::Power(PowerState::ShuttingDown),
        _ => MenuEntry::Unknown,
    }
}

/// Translates a launch intent into an external navigation or a reducer action.
pub fn resolve_launch(
    catalog: &AppCatalog,
    state: &DesktopState,
    target: &LaunchTarget,
    viewport: Viewport,
    config: &ShellConfig,
) -> LaunchResolution {
    let open = |app_kind| {
        LaunchResolution::Dispatch(DesktopAction::OpenWindow(
            catalog.open_request(app_kind, viewport, config),
        ))
    };
    match target {
        LaunchTarget::Icon(icon_id) => match state.icon(*icon_id).map(|icon| &icon.target) {
            Some(IconTarget::External(url)) => LaunchResolution::External(url.clone()),
            Some(IconTarget::App(app_kind)) => open(*app_kind),
            None => LaunchResolution::Ignore,
        },
        LaunchTarget::Menu(label) => match menu_entry(label) {
            MenuEntry::App(app_kind) => open(app_kind),
            MenuEntry::Power(target) => {
                LaunchResolution::Dispatch(DesktopAction::PowerOff { target })
            }
            MenuEntry::Unknown => LaunchResolution::Dispatch(DesktopAction::OpenWindow(
                catalog.error_request(Some(APP_NOT_FOUND_MESSAGE), viewport, config),
            )),
        },
        LaunchTarget::App(app_kind) => open(*app_kind),
    }
}

/// Actions for confirming the power-off modal: the shell cannot actually power down, so the
/// modal closes and an error box explains that.
pub fn confirm_power_off_actions(
    catalog: &AppCatalog,
    viewport: Viewport,
    config: &ShellConfig,
) -> [DesktopAction; 2] {
    [
        DesktopAction::CancelPowerOff,
        DesktopAction::OpenWindow(catalog.error_request(None, viewport, config)),
    ]
}
