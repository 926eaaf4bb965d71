use std::collections::BTreeSet;

use platform_host::WindowStateRow;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub use platform_host::{WindowPosition, WindowSize};

/// Workspace that always exists, even with no windows in it.
pub const PRIMARY_WORKSPACE: u32 = 1;
pub const DEFAULT_WINDOW_WIDTH: f64 = 800.0;
pub const DEFAULT_WINDOW_HEIGHT: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
/// How a window's geometry was last derived.
pub enum WindowLayout {
    #[default]
    Floating,
    Tiling,
    Maximized,
    SnapLeft,
    SnapRight,
    SnapTop,
    SnapBottom,
    SnapTopLeft,
    SnapTopRight,
    SnapBottomLeft,
    SnapBottomRight,
}

impl WindowLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Floating => "floating",
            Self::Tiling => "tiling",
            Self::Maximized => "maximized",
            Self::SnapLeft => "snap-left",
            Self::SnapRight => "snap-right",
            Self::SnapTop => "snap-top",
            Self::SnapBottom => "snap-bottom",
            Self::SnapTopLeft => "snap-top-left",
            Self::SnapTopRight => "snap-top-right",
            Self::SnapBottomLeft => "snap-bottom-left",
            Self::SnapBottomRight => "snap-bottom-right",
        }
    }

    /// Parses a persisted layout tag, returning `None` for unknown values.
    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "floating" => Self::Floating,
            "tiling" => Self::Tiling,
            "maximized" => Self::Maximized,
            "snap-left" => Self::SnapLeft,
            "snap-right" => Self::SnapRight,
            "snap-top" => Self::SnapTop,
            "snap-bottom" => Self::SnapBottom,
            "snap-top-left" => Self::SnapTopLeft,
            "snap-top-right" => Self::SnapTopRight,
            "snap-bottom-left" => Self::SnapBottomLeft,
            "snap-bottom-right" => Self::SnapBottomRight,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Viewport edge or corner a window can be snapped to.
pub enum SnapEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapEdge {
    pub const ALL: [Self; 8] = [
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Layout tag recorded on a window snapped to this edge.
    pub fn layout(self) -> WindowLayout {
        match self {
            Self::Left => WindowLayout::SnapLeft,
            Self::Right => WindowLayout::SnapRight,
            Self::Top => WindowLayout::SnapTop,
            Self::Bottom => WindowLayout::SnapBottom,
            Self::TopLeft => WindowLayout::SnapTopLeft,
            Self::TopRight => WindowLayout::SnapTopRight,
            Self::BottomLeft => WindowLayout::SnapBottomLeft,
            Self::BottomRight => WindowLayout::SnapBottomRight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Size of the layout area windows are arranged in.
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Position plus size, as produced by the layout algorithms.
pub struct WindowRect {
    pub position: WindowPosition,
    pub size: WindowSize,
}

impl WindowRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: WindowPosition::new(x, y),
            size: WindowSize::new(width, height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Live state of one open application window.
pub struct WindowRecord {
    /// Gateway-assigned id; `None` until the window is first saved.
    pub id: Option<String>,
    pub app_id: String,
    pub position: WindowPosition,
    pub size: WindowSize,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub z_index: u64,
    pub layout: WindowLayout,
    pub workspace: u32,
}

impl WindowRecord {
    /// Creates a floating, unsaved window record.
    pub fn new(app_id: impl Into<String>, rect: WindowRect, z_index: u64, workspace: u32) -> Self {
        Self {
            id: None,
            app_id: app_id.into(),
            position: rect.position,
            size: rect.size,
            is_minimized: false,
            is_maximized: false,
            z_index,
            layout: WindowLayout::Floating,
            workspace,
        }
    }

    pub fn rect(&self) -> WindowRect {
        WindowRect {
            position: self.position,
            size: self.size,
        }
    }

    pub fn set_rect(&mut self, rect: WindowRect) {
        self.position = rect.position;
        self.size = rect.size;
    }

    /// Returns `true` when the window is shown in `workspace`.
    pub fn is_visible_in(&self, workspace: u32) -> bool {
        !self.is_minimized && self.workspace == workspace
    }

    /// Encodes the record as a gateway row, nesting layout and workspace in `state_data`.
    pub fn to_row(&self) -> WindowStateRow {
        WindowStateRow {
            id: self.id.clone(),
            app_id: self.app_id.clone(),
            position: self.position,
            size: self.size,
            is_minimized: self.is_minimized,
            is_maximized: self.is_maximized,
            z_index: self.z_index,
            state_data: json!({
                "layout": self.layout.as_str(),
                "workspace": self.workspace,
            }),
        }
    }

    /// Decodes a gateway row. A missing or unknown layout falls back to floating and a missing
    /// or zero workspace falls back to [`PRIMARY_WORKSPACE`].
    pub fn from_row(row: WindowStateRow) -> Self {
        let layout = row
            .state_data
            .get("layout")
            .and_then(Value::as_str)
            .and_then(WindowLayout::parse)
            .unwrap_or_default();
        let workspace = row
            .state_data
            .get("workspace")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= PRIMARY_WORKSPACE)
            .unwrap_or(PRIMARY_WORKSPACE);

        Self {
            id: row.id,
            app_id: row.app_id,
            position: row.position,
            size: row.size,
            is_minimized: row.is_minimized,
            is_maximized: row.is_maximized,
            z_index: row.z_index,
            layout,
            workspace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Authoritative in-memory window registry.
pub struct WindowStoreState {
    /// Open windows in open order (tile and cascade order).
    pub windows: Vec<WindowRecord>,
    pub active_app_id: Option<String>,
    pub current_workspace: u32,
    /// Known workspace numbers; always contains [`PRIMARY_WORKSPACE`].
    pub workspaces: BTreeSet<u32>,
    pub is_initialized: bool,
}

impl Default for WindowStoreState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            active_app_id: None,
            current_workspace: PRIMARY_WORKSPACE,
            workspaces: BTreeSet::from([PRIMARY_WORKSPACE]),
            is_initialized: false,
        }
    }
}

impl WindowStoreState {
    pub fn window(&self, app_id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.app_id == app_id)
    }

    pub fn window_mut(&mut self, app_id: &str) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.app_id == app_id)
    }

    /// App ids of every open window, in open order.
    pub fn open_apps(&self) -> Vec<String> {
        self.windows.iter().map(|w| w.app_id.clone()).collect()
    }

    /// App ids of minimized windows, in open order.
    pub fn minimized_apps(&self) -> Vec<String> {
        self.windows
            .iter()
            .filter(|w| w.is_minimized)
            .map(|w| w.app_id.clone())
            .collect()
    }

    /// Windows shown in the current workspace, in open order.
    pub fn visible_windows(&self) -> impl Iterator<Item = &WindowRecord> {
        let workspace = self.current_workspace;
        self.windows.iter().filter(move |w| w.is_visible_in(workspace))
    }

    /// Highest-z non-minimized window, if any.
    pub fn topmost_restored_app(&self) -> Option<String> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized)
            .max_by_key(|w| w.z_index)
            .map(|w| w.app_id.clone())
    }

    /// Rebuilds the known workspace set from the records, keeping [`PRIMARY_WORKSPACE`].
    pub fn recompute_workspaces(&mut self) {
        self.workspaces = self
            .windows
            .iter()
            .map(|w| w.workspace)
            .chain([PRIMARY_WORKSPACE])
            .collect();
    }
}
