//! Typed host-capability contracts consumed by the desktop window manager.
//!
//! The shell core depends only on these traits. Concrete adapters for a browser or native
//! surface implement them outside the core; this crate ships the headless and in-memory
//! adapters used by tools and tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod external_url;
pub mod host;
pub mod viewport;

pub use external_url::{ExternalUrlService, MemoryExternalUrlService, NoopExternalUrlService};
pub use host::HostServices;
pub use viewport::{FixedViewport, Viewport, ViewportService, DEFAULT_MOBILE_BREAKPOINT};
