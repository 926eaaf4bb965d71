//! Window store configuration loaded from TOML.
//!
//! Every field has a default, so an empty document (or no document at all) yields the stock
//! desktop behavior: 800×600 windows, a 500 ms move/resize debounce, and three write attempts.

use platform_host::WindowSize;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Viewport, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Geometry defaults used by open, cascade, and new-window placement.
pub struct LayoutConfig {
    /// Size given to newly opened windows.
    pub default_window_size: WindowSize,
    /// Offset of the first new window on both axes.
    pub open_offset_base: f64,
    /// Diagonal step added per already-open window.
    pub open_offset_step: u64,
    /// The stepped part of the offset wraps at this value.
    pub open_offset_wrap: u64,
    /// Diagonal distance between cascaded windows.
    pub cascade_step: f64,
    /// Size every cascaded window is reset to.
    pub cascade_window_size: WindowSize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_window_size: WindowSize::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            open_offset_base: 40.0,
            open_offset_step: 20,
            open_offset_wrap: 100,
            cascade_step: 30.0,
            cascade_window_size: WindowSize::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Persistence timing and retry policy.
pub struct PersistenceConfig {
    /// Quiet period before a move/resize write is sent.
    pub debounce_ms: u64,
    /// Attempts per write before it is dead-lettered. Values below one are treated as one.
    pub max_attempts: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
/// Top-level [`crate::store::WindowStore`] configuration.
pub struct WindowStoreConfig {
    /// Initial layout area; the view updates it through `set_viewport`.
    pub viewport: Viewport,
    pub layout: LayoutConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Error)]
/// Configuration parse failures.
pub enum ConfigError {
    #[error("invalid window store config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid window store config: {0}")]
    Invalid(String),
}

impl WindowStoreConfig {
    /// Parses a TOML document, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] for a non-positive viewport or window size.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("viewport", self.viewport.width, self.viewport.height),
            (
                "layout.default_window_size",
                self.layout.default_window_size.width,
                self.layout.default_window_size.height,
            ),
            (
                "layout.cascade_window_size",
                self.layout.cascade_window_size.width,
                self.layout.cascade_window_size.height,
            ),
        ];
        for (name, width, height) in sizes {
            if !(width > 0.0 && height > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {width}x{height}"
                )));
            }
        }
        Ok(())
    }
}
