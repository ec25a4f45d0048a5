//! External URL host-service contracts.

use std::{cell::RefCell, rc::Rc};

/// Host service for opening external URLs outside the desktop shell.
///
/// Calls are fire-and-forget: the shell core never waits on the host's navigation result.
pub trait ExternalUrlService {
    /// Opens a URL using the host's external navigation mechanism.
    fn open_url(&self, url: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op external URL service for unsupported targets.
pub struct NoopExternalUrlService;

impl ExternalUrlService for NoopExternalUrlService {
    fn open_url(&self, _url: &str) {}
}

#[derive(Debug, Clone, Default)]
/// In-memory external URL service that records every opened URL.
///
/// Clones share the same log, so a test can keep one handle while the runtime owns another.
pub struct MemoryExternalUrlService {
    opened: Rc<RefCell<Vec<String>>>,
}

impl MemoryExternalUrlService {
    /// Returns the URLs opened so far, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl ExternalUrlService for MemoryExternalUrlService {
    fn open_url(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_service_shares_log_between_clones() {
        let service = MemoryExternalUrlService::default();
        let handle = service.clone();
        service.open_url("https://example.com/");
        service.open_url("https://example.org/");
        assert_eq!(
            handle.opened(),
            vec!["https://example.com/", "https://example.org/"]
        );
    }
}
