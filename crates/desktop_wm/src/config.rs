//! Shell layout tunables loaded from TOML.
//!
//! Every field falls back to its default when omitted, so an empty document is a valid
//! configuration.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading a [`ShellConfig`].
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML for [`ShellConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The document parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Geometry constants used by the drag/resize engine and launch placement.
pub struct ShellConfig {
    /// Margin kept free at the left, top and right viewport edges while dragging.
    pub edge_margin: i32,
    /// Height reserved at the bottom of the viewport for the taskbar.
    pub taskbar_height: i32,
    /// Distance from a window border that starts a resize instead of a drag.
    pub resize_threshold: i32,
    /// Height of the title-bar drag handle.
    pub title_bar_height: i32,
    /// Minimum width an interactive resize can produce.
    pub min_window_width: i32,
    /// Minimum height an interactive resize can produce.
    pub min_window_height: i32,
    /// Pixels a maximized window extends past each viewport edge to hide its rounded frame.
    pub maximized_bleed: i32,
    /// Viewports narrower than this open resizable apps maximized.
    pub compact_width: i32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            edge_margin: 1,
            taskbar_height: 30,
            resize_threshold: 10,
            title_bar_height: 25,
            min_window_width: 220,
            min_window_height: 140,
            maximized_bleed: 3,
            compact_width: 800,
        }
    }
}

impl ShellConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] for
    /// negative margins or non-positive minimum sizes.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the errors of
    /// [`ShellConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded shell config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("edge_margin", self.edge_margin),
            ("taskbar_height", self.taskbar_height),
            ("resize_threshold", self.resize_threshold),
            ("title_bar_height", self.title_bar_height),
            ("maximized_bleed", self.maximized_bleed),
            ("compact_width", self.compact_width),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, value)| *value < 0) {
            return Err(ConfigError::Invalid(format!("`{name}` must not be negative")));
        }
        if self.min_window_width <= 0 || self.min_window_height <= 0 {
            return Err(ConfigError::Invalid(
                "minimum window size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
