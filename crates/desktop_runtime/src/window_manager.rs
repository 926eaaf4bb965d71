//! Shared window-manager transition helpers used by the window reducer.
//!
//! Everything here is pure geometry or stack bookkeeping over [`WindowStoreState`]; persistence
//! decisions stay in [`crate::reducer`].

use crate::{
    config::LayoutConfig,
    model::{SnapEdge, Viewport, WindowRect, WindowStoreState},
};

/// Returns the z-index that places a window above every open window.
pub fn next_z_index(state: &WindowStoreState) -> u64 {
    state
        .windows
        .iter()
        .map(|w| w.z_index)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Raises `app_id` to the top of the stack, un-minimizes it, and makes it the active window.
///
/// Returns `false` when no such window is open.
pub fn focus_window_internal(state: &mut WindowStoreState, app_id: &str) -> bool {
    let z_index = next_z_index(state);
    let Some(window) = state.window_mut(app_id) else {
        return false;
    };
    window.z_index = z_index;
    window.is_minimized = false;
    state.active_app_id = Some(app_id.to_string());
    true
}

/// Default rectangle for the `index`-th newly opened window.
///
/// Each new window steps diagonally from the base offset and wraps so windows never drift far
/// from the top-left corner.
pub fn open_window_rect(layout: &LayoutConfig, index: usize) -> WindowRect {
    let wrap = layout.open_offset_wrap.max(1);
    let step = (index as u64).saturating_mul(layout.open_offset_step) % wrap;
    let offset = layout.open_offset_base + step as f64;
    WindowRect {
        position: platform_host::WindowPosition::new(offset, offset),
        size: layout.default_window_size,
    }
}

/// Fixed half- or quarter-viewport rectangle for a snap edge.
pub fn snap_rect(edge: SnapEdge, viewport: Viewport) -> WindowRect {
    let half_w = viewport.width / 2.0;
    let half_h = viewport.height / 2.0;
    match edge {
        SnapEdge::Left => WindowRect::new(0.0, 0.0, half_w, viewport.height),
        SnapEdge::Right => WindowRect::new(half_w, 0.0, half_w, viewport.height),
        SnapEdge::Top => WindowRect::new(0.0, 0.0, viewport.width, half_h),
        SnapEdge::Bottom => WindowRect::new(0.0, half_h, viewport.width, half_h),
        SnapEdge::TopLeft => WindowRect::new(0.0, 0.0, half_w, half_h),
        SnapEdge::TopRight => WindowRect::new(half_w, 0.0, half_w, half_h),
        SnapEdge::BottomLeft => WindowRect::new(0.0, half_h, half_w, half_h),
        SnapEdge::BottomRight => WindowRect::new(half_w, half_h, half_w, half_h),
    }
}

/// Computes non-overlapping tile rectangles for `count` windows, in placement order.
///
/// One window fills the viewport, two split it vertically, three put the first window on the
/// left half and stack the other two on the right. Four or more use a row-major grid with
/// `ceil(sqrt(n))` columns.
pub fn tile_rects(count: usize, viewport: Viewport) -> Vec<WindowRect> {
    let full_w = viewport.width;
    let full_h = viewport.height;
    let half_w = full_w / 2.0;
    let half_h = full_h / 2.0;

    match count {
        0 => Vec::new(),
        1 => vec![WindowRect::new(0.0, 0.0, full_w, full_h)],
        2 => vec![
            WindowRect::new(0.0, 0.0, half_w, full_h),
            WindowRect::new(half_w, 0.0, half_w, full_h),
        ],
        3 => vec![
            WindowRect::new(0.0, 0.0, half_w, full_h),
            WindowRect::new(half_w, 0.0, half_w, half_h),
            WindowRect::new(half_w, half_h, half_w, half_h),
        ],
        _ => {
            let (cols, rows) = grid_dimensions(count);
            let cell_w = full_w / cols as f64;
            let cell_h = full_h / rows as f64;
            (0..count)
                .map(|index| {
                    let row = index / cols;
                    let col = index % cols;
                    WindowRect::new(col as f64 * cell_w, row as f64 * cell_h, cell_w, cell_h)
                })
                .collect()
        }
    }
}

/// Grid `(columns, rows)` used when tiling `count` windows.
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let mut cols = (count as f64).sqrt().ceil() as usize;
    // Guard against float rounding on perfect squares.
    while cols * cols < count {
        cols += 1;
    }
    while cols > 1 && (cols - 1) * (cols - 1) >= count {
        cols -= 1;
    }
    let rows = count.div_ceil(cols);
    (cols, rows)
}

/// Rectangle for the `index`-th window of a cascade.
pub fn cascade_rect(layout: &LayoutConfig, index: usize) -> WindowRect {
    let offset = layout.cascade_step * index as f64;
    WindowRect {
        position: platform_host::WindowPosition::new(offset, offset),
        size: layout.cascade_window_size,
    }
}
