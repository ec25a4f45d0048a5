//! Shared host bundle handed to the desktop runtime at construction.

use std::rc::Rc;

use crate::{
    ExternalUrlService, FixedViewport, NoopExternalUrlService, Viewport, ViewportService,
};

#[derive(Clone)]
/// Host capabilities consumed by the desktop runtime.
pub struct HostServices {
    /// Viewport size and mobile-layout queries.
    pub viewport: Rc<dyn ViewportService>,
    /// Fire-and-forget external navigation.
    pub external_url: Rc<dyn ExternalUrlService>,
}

impl HostServices {
    /// Builds a host bundle from explicit adapters.
    pub fn new(
        viewport: Rc<dyn ViewportService>,
        external_url: Rc<dyn ExternalUrlService>,
    ) -> Self {
        Self {
            viewport,
            external_url,
        }
    }

    /// Builds a headless host with a fixed viewport and no external navigation.
    pub fn headless(viewport: Viewport) -> Self {
        Self::new(
            Rc::new(FixedViewport::new(viewport)),
            Rc::new(NoopExternalUrlService),
        )
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("viewport", &self.viewport.viewport())
            .finish_non_exhaustive()
    }
}
