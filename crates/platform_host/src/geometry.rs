//! Window geometry value types shared by the runtime model and persisted window-state rows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
/// Top-left window position in layout-space pixels.
pub struct WindowPosition {
    /// Horizontal offset from the viewport origin.
    pub x: f64,
    /// Vertical offset from the viewport origin.
    pub y: f64,
}

impl WindowPosition {
    /// Creates a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
/// Window size in layout-space pixels.
pub struct WindowSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl WindowSize {
    /// Creates a size from its extents.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
