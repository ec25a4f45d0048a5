//! Registry of window content providers keyed by app kind.

use std::collections::HashMap;

use desktop_app_contract::{AppKind, WindowContent, WindowContentProps};

/// Content providers producing views of type `V`.
pub struct ContentRegistry<V> {
    providers: HashMap<AppKind, Box<dyn WindowContent<View = V>>>,
}

impl<V> Default for ContentRegistry<V> {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }
}

impl<V> ContentRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` for `app_kind`, replacing any previous one.
    pub fn register<C>(&mut self, app_kind: AppKind, provider: C) -> &mut Self
    where
        C: WindowContent<View = V> + 'static,
    {
        if self.providers.insert(app_kind, Box::new(provider)).is_some() {
            tracing::debug!(app = %app_kind, "content provider replaced");
        }
        self
    }

    pub fn contains(&self, app_kind: AppKind) -> bool {
        self.providers.contains_key(&app_kind)
    }

    /// Renders a window's content. Kinds without a provider render nothing.
    pub fn render(&self, app_kind: AppKind, props: &WindowContentProps) -> Option<V> {
        self.providers
            .get(&app_kind)
            .map(|provider| provider.render(props))
    }
}

impl<V> std::fmt::Debug for ContentRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&AppKind> = self.providers.keys().collect();
        kinds.sort();
        f.debug_struct("ContentRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::WindowCommand;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;

    fn props(inject: Value) -> WindowContentProps {
        WindowContentProps {
            window_id: 7,
            is_focused: true,
            mobile: false,
            on_close: WindowCommand::Close(7),
            on_minimize: Some(WindowCommand::Minimize(7)),
            inject,
        }
    }

    struct ErrorText;

    impl WindowContent for ErrorText {
        type View = String;

        fn render(&self, props: &WindowContentProps) -> String {
            props
                .inject
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("An error occurred")
                .to_string()
        }
    }

    #[test]
    fn renders_registered_providers_only() {
        let mut registry = ContentRegistry::new();
        registry
            .register(AppKind::ErrorBox, ErrorText)
            .register(AppKind::Notepad, |props: &WindowContentProps| {
                format!("notepad #{}", props.window_id)
            });

        assert_eq!(
            registry.render(AppKind::ErrorBox, &props(json!({ "message": "C:\\" }))),
            Some("C:\\".to_string())
        );
        assert_eq!(
            registry.render(AppKind::Notepad, &props(Value::Null)),
            Some("notepad #7".to_string())
        );
        assert_eq!(registry.render(AppKind::Paint, &props(Value::Null)), None);
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = ContentRegistry::new();
        registry.register(AppKind::Paint, |_: &WindowContentProps| 1);
        registry.register(AppKind::Paint, |_: &WindowContentProps| 2);
        assert!(registry.contains(AppKind::Paint));
        assert_eq!(registry.render(AppKind::Paint, &props(Value::Null)), Some(2));
    }
}
