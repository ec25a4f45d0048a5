//! Shared contract types between the desktop window manager core and the content providers it
//! hosts.
//!
//! The core never inspects what a provider renders. It hands each provider a
//! [`WindowContentProps`] value and forwards any [`WindowCommand`] the provider emits back into
//! its own dispatch loop.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// Identifies which content provider a window hosts.
///
/// Single-instance enforcement compares kinds, never the UI element that triggered a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppKind {
    /// Embedded web browser.
    InternetExplorer,
    /// Minesweeper game.
    Minesweeper,
    /// File-system overview.
    MyComputer,
    /// Spreadsheet/chart view.
    MyChart,
    /// Plain text editor.
    Notepad,
    /// Media player with its own skinned chrome.
    Winamp,
    /// Paint tool.
    Paint,
    /// Synthetic error display used for unresolvable launches.
    ErrorBox,
}

impl AppKind {
    /// Every built-in app kind in catalog order.
    pub const ALL: [AppKind; 8] = [
        AppKind::InternetExplorer,
        AppKind::Minesweeper,
        AppKind::MyComputer,
        AppKind::MyChart,
        AppKind::Notepad,
        AppKind::Winamp,
        AppKind::Paint,
        AppKind::ErrorBox,
    ];

    /// Returns the kebab-case token used in manifests and scripts.
    pub const fn token(self) -> &'static str {
        match self {
            Self::InternetExplorer => "internet-explorer",
            Self::Minesweeper => "minesweeper",
            Self::MyComputer => "my-computer",
            Self::MyChart => "my-chart",
            Self::Notepad => "notepad",
            Self::Winamp => "winamp",
            Self::Paint => "paint",
            Self::ErrorBox => "error-box",
        }
    }

    /// Parses a kebab-case token.
    pub fn from_token(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.token() == raw)
    }
}

impl std::fmt::Display for AppKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Title-bar control buttons a window may expose.
pub enum ChromeButton {
    /// Hide the window to the taskbar.
    Minimize,
    /// Toggle between restored and maximized geometry.
    Maximize,
    /// Close the window.
    Close,
}

/// Window size requested by a launch spec. A zero dimension means "sized by content".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// Top-left offset requested by a launch spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowOffset {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

fn default_buttons() -> Vec<ChromeButton> {
    vec![
        ChromeButton::Minimize,
        ChromeButton::Maximize,
        ChromeButton::Close,
    ]
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Title-bar presentation declared by a launch spec.
pub struct WindowChrome {
    /// When true the app draws its own frame and the shell title bar is hidden.
    #[serde(default)]
    pub invisible: bool,
    /// Buttons present in the title bar.
    #[serde(default = "default_buttons")]
    pub buttons: Vec<ChromeButton>,
    /// Whether the window gets a taskbar button.
    #[serde(default = "default_true")]
    pub show_in_taskbar: bool,
}

impl Default for WindowChrome {
    fn default() -> Self {
        Self {
            invisible: false,
            buttons: default_buttons(),
            show_in_taskbar: true,
        }
    }
}

impl WindowChrome {
    /// Returns whether `button` is present in the title bar.
    pub fn has_button(&self, button: ChromeButton) -> bool {
        self.buttons.contains(&button)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Launch description for one app kind.
pub struct LaunchSpec {
    /// Content provider hosted by windows of this spec.
    pub app_kind: AppKind,
    /// Title-bar and taskbar title.
    pub title: String,
    /// Icon asset id.
    pub icon: String,
    /// Initial restored size.
    pub default_size: WindowSize,
    /// Initial restored top-left offset.
    pub default_offset: WindowOffset,
    /// Whether interactive resize and maximize are permitted.
    pub resizable: bool,
    /// Whether more than one window of this kind may exist at once.
    pub allows_multiple_instances: bool,
    /// Title-bar presentation.
    #[serde(default)]
    pub chrome: WindowChrome,
    /// Center the window in the viewport instead of using `default_offset`.
    #[serde(default)]
    pub centered: bool,
    /// Open a window of this kind when the desktop boots.
    #[serde(default)]
    pub open_on_boot: bool,
    /// Boot-time size, when it differs from `default_size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_size: Option<WindowSize>,
    /// Boot-time offset, when it differs from `default_offset`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_offset: Option<WindowOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "window_id", rename_all = "kebab-case")]
/// Request emitted by a content provider for its own window.
pub enum WindowCommand {
    /// Close the window.
    Close(WindowRuntimeId),
    /// Minimize the window.
    Minimize(WindowRuntimeId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Props handed to a content provider on every render.
pub struct WindowContentProps {
    /// Window hosting the content.
    pub window_id: WindowRuntimeId,
    /// Whether the hosting window currently owns focus.
    pub is_focused: bool,
    /// Whether the host viewport is in mobile layout.
    pub mobile: bool,
    /// Command the content emits to close its window.
    pub on_close: WindowCommand,
    /// Command the content emits to minimize its window; absent on mobile layouts.
    pub on_minimize: Option<WindowCommand>,
    /// App-specific props injected at launch time.
    pub inject: Value,
}

/// Render contract implemented by every content provider.
pub trait WindowContent {
    /// Output produced for the host's rendering surface.
    type View;

    /// Renders content for one window.
    fn render(&self, props: &WindowContentProps) -> Self::View;
}

impl<V, F> WindowContent for F
where
    F: Fn(&WindowContentProps) -> V,
{
    type View = V;

    fn render(&self, props: &WindowContentProps) -> V {
        self(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_kind_tokens_round_trip_through_serde() {
        for kind in AppKind::ALL {
            let encoded = serde_json::to_string(&kind).expect("serialize kind");
            assert_eq!(encoded, format!("\"{}\"", kind.token()));
            assert_eq!(AppKind::from_token(kind.token()), Some(kind));
        }
        assert_eq!(AppKind::from_token("solitaire"), None);
    }

    #[test]
    fn chrome_defaults_expose_every_button() {
        let chrome: WindowChrome = serde_json::from_str("{}").expect("empty chrome");
        assert!(chrome.has_button(ChromeButton::Minimize));
        assert!(chrome.has_button(ChromeButton::Close));
        assert!(chrome.show_in_taskbar);
        assert!(!chrome.invisible);
    }

    #[test]
    fn closures_implement_the_render_contract() {
        let provider = |props: &WindowContentProps| format!("window {}", props.window_id);
        let props = WindowContentProps {
            window_id: 7,
            is_focused: true,
            mobile: false,
            on_close: WindowCommand::Close(7),
            on_minimize: Some(WindowCommand::Minimize(7)),
            inject: Value::Null,
        };
        assert_eq!(provider.render(&props), "window 7");
    }
}
