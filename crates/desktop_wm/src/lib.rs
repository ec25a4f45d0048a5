//! Desktop-shell window manager core.
//!
//! State lives in [`DesktopState`] and only changes through [`reduce_desktop`]. Around it sit the
//! app catalog and launch resolver ([`apps`]), the drag/resize engine ([`geometry`]), the focus
//! and stacking policy ([`focus`]), and two drivers: the single-threaded [`DesktopRuntime`]
//! facade and the [`mailbox`] actor for multi-threaded embedders.

pub mod apps;
pub mod config;
pub mod content;
pub mod focus;
pub mod geometry;
pub mod mailbox;
pub mod model;
pub mod reducer;
pub mod runtime;
pub mod window_manager;

pub use apps::{resolve_launch, AppCatalog, CatalogError, LaunchResolution, LaunchTarget};
pub use config::{ConfigError, ShellConfig};
pub use content::ContentRegistry;
pub use focus::{focused_window_id, TaskbarEntry};
pub use geometry::{GestureState, HitRegion};
pub use mailbox::{mailbox, DesktopActor, DesktopMailbox, MailboxError};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction};
pub use runtime::{DesktopRuntime, WindowLayout};
