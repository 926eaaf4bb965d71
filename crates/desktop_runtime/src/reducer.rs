//! Reducer actions, side-effect intents, and transition logic for the window store.

use thiserror::Error;

use crate::{
    config::LayoutConfig,
    model::{
        SnapEdge, Viewport, WindowLayout, WindowPosition, WindowRecord, WindowSize,
        WindowStoreState,
    },
    window_manager::{
        cascade_rect, focus_window_internal, next_z_index, open_window_rect, snap_rect,
        tile_rects,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_windows`] to mutate [`WindowStoreState`].
pub enum WindowAction {
    /// Open an app window, or refocus it when already open.
    OpenApp {
        /// App to open.
        app_id: String,
    },
    /// Close an app window.
    CloseApp {
        /// App to close.
        app_id: String,
    },
    /// Focus (and raise) a window.
    SetActiveApp {
        /// Window to focus.
        app_id: String,
    },
    /// Minimize a window.
    MinimizeApp {
        /// Window to minimize.
        app_id: String,
    },
    /// Restore a minimized window, or minimize a restored one.
    ToggleMinimize {
        /// Window to toggle.
        app_id: String,
    },
    /// Maximize a window.
    MaximizeApp {
        /// Window to maximize.
        app_id: String,
    },
    /// Return a maximized or minimized window to floating.
    RestoreApp {
        /// Window to restore.
        app_id: String,
    },
    /// Move a window (debounced persistence).
    MoveWindow {
        /// Window being moved.
        app_id: String,
        /// New top-left position.
        position: WindowPosition,
    },
    /// Resize a window (debounced persistence).
    ResizeWindow {
        /// Window being resized.
        app_id: String,
        /// New size.
        size: WindowSize,
    },
    /// Snap a window to a viewport half or quarter.
    SnapWindow {
        /// Window to snap.
        app_id: String,
        /// Target edge or corner.
        edge: SnapEdge,
        /// Layout area to snap within.
        viewport: Viewport,
    },
    /// Change the current workspace pointer.
    SwitchWorkspace {
        /// Workspace to show.
        workspace: u32,
    },
    /// Move a window to another workspace.
    SetWindowWorkspace {
        /// Window to move.
        app_id: String,
        /// Destination workspace.
        workspace: u32,
    },
    /// Tile every visible window of the current workspace.
    TileWindows {
        /// Layout area to fill.
        viewport: Viewport,
    },
    /// Cascade every visible window of the current workspace.
    CascadeWindows,
    /// Persist every open window.
    SyncToDatabase,
    /// Replace the registry with hydrated records.
    Hydrate {
        /// Records loaded from the gateway, in ascending z order.
        windows: Vec<WindowRecord>,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_windows`] for the store to execute.
pub enum RuntimeEffect {
    /// Write this window state now.
    PersistWindow(WindowRecord),
    /// Write this window state once the window has been quiet for the debounce period.
    PersistWindowDebounced(WindowRecord),
    /// Delete the persisted state of a closed window.
    DeleteWindow {
        /// App whose row should be removed.
        app_id: String,
    },
    /// Surface a user-visible notification.
    Notify {
        /// Short notification title.
        title: String,
        /// Notification body text.
        body: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that cannot apply to the current state.
pub enum ReducerError {
    /// The target window is not open.
    #[error("window `{0}` not found")]
    WindowNotFound(String),
    /// Workspace numbers start at one.
    #[error("invalid workspace {0}")]
    InvalidWorkspace(u32),
}

/// Applies a [`WindowAction`] to the window registry and collects resulting side effects.
///
/// State is left untouched whenever an error is returned.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action targets an app that is not open and
/// [`ReducerError::InvalidWorkspace`] for workspace `0`.
pub fn reduce_windows(
    state: &mut WindowStoreState,
    layout: &LayoutConfig,
    action: WindowAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        WindowAction::OpenApp { app_id } => {
            if state.window(&app_id).is_some() {
                focus_window_internal(state, &app_id);
            } else {
                let rect = open_window_rect(layout, state.windows.len());
                let record = WindowRecord::new(
                    app_id.clone(),
                    rect,
                    next_z_index(state),
                    state.current_workspace,
                );
                state.windows.push(record);
                state.active_app_id = Some(app_id.clone());
            }
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::CloseApp { app_id } => {
            let index = state
                .windows
                .iter()
                .position(|w| w.app_id == app_id)
                .ok_or_else(|| ReducerError::WindowNotFound(app_id.clone()))?;
            state.windows.remove(index);
            if state.active_app_id.as_deref() == Some(app_id.as_str()) {
                state.active_app_id = state.topmost_restored_app();
            }
            effects.push(RuntimeEffect::DeleteWindow { app_id });
        }
        WindowAction::SetActiveApp { app_id } => {
            focus_existing(state, &app_id)?;
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::MinimizeApp { app_id } => {
            minimize(state, &app_id)?;
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::ToggleMinimize { app_id } => {
            let minimized = find_window(state, &app_id)?.is_minimized;
            if minimized {
                focus_window_internal(state, &app_id);
            } else {
                minimize(state, &app_id)?;
            }
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::MaximizeApp { app_id } => {
            let window = find_window_mut(state, &app_id)?;
            window.is_maximized = true;
            window.layout = WindowLayout::Maximized;
            focus_window_internal(state, &app_id);
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::RestoreApp { app_id } => {
            let window = find_window_mut(state, &app_id)?;
            window.is_maximized = false;
            window.layout = WindowLayout::Floating;
            focus_window_internal(state, &app_id);
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::MoveWindow { app_id, position } => {
            let window = find_window_mut(state, &app_id)?;
            window.position = position;
            demote_to_floating(window);
            effects.push(RuntimeEffect::PersistWindowDebounced(window.clone()));
        }
        WindowAction::ResizeWindow { app_id, size } => {
            let window = find_window_mut(state, &app_id)?;
            window.size = size;
            demote_to_floating(window);
            effects.push(RuntimeEffect::PersistWindowDebounced(window.clone()));
        }
        WindowAction::SnapWindow {
            app_id,
            edge,
            viewport,
        } => {
            let window = find_window_mut(state, &app_id)?;
            window.set_rect(snap_rect(edge, viewport));
            window.is_minimized = false;
            window.is_maximized = false;
            window.layout = edge.layout();
            focus_window_internal(state, &app_id);
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::SwitchWorkspace { workspace } => {
            validate_workspace(workspace)?;
            state.current_workspace = workspace;
            state.workspaces.insert(workspace);
        }
        WindowAction::SetWindowWorkspace { app_id, workspace } => {
            validate_workspace(workspace)?;
            let window = find_window_mut(state, &app_id)?;
            window.workspace = workspace;
            state.workspaces.insert(workspace);
            effects.push(persist(state, &app_id)?);
        }
        WindowAction::TileWindows { viewport } => {
            let targets = visible_app_ids(state);
            if targets.is_empty() {
                return Ok(effects);
            }
            let rects = tile_rects(targets.len(), viewport);
            for (app_id, rect) in targets.iter().zip(rects) {
                let window = find_window_mut(state, app_id)?;
                window.set_rect(rect);
                window.is_maximized = false;
                window.layout = WindowLayout::Tiling;
                effects.push(RuntimeEffect::PersistWindow(window.clone()));
            }
            effects.push(RuntimeEffect::Notify {
                title: "Windows tiled".to_string(),
                body: format!("Arranged {} windows in a tiling layout.", targets.len()),
            });
        }
        WindowAction::CascadeWindows => {
            let targets = visible_app_ids(state);
            if targets.is_empty() {
                return Ok(effects);
            }
            let count = targets.len() as u64;
            for (index, app_id) in targets.iter().enumerate() {
                let rect = cascade_rect(layout, index);
                let window = find_window_mut(state, app_id)?;
                window.set_rect(rect);
                window.is_maximized = false;
                window.layout = WindowLayout::Floating;
                // First window ends on top; see DESIGN.md on the inverted stacking order.
                window.z_index = count - index as u64;
                effects.push(RuntimeEffect::PersistWindow(window.clone()));
            }
            effects.push(RuntimeEffect::Notify {
                title: "Windows cascaded".to_string(),
                body: format!("Cascaded {} windows.", targets.len()),
            });
        }
        WindowAction::SyncToDatabase => {
            effects.extend(
                state
                    .windows
                    .iter()
                    .cloned()
                    .map(RuntimeEffect::PersistWindow),
            );
        }
        WindowAction::Hydrate { windows } => {
            let current_workspace = state.current_workspace;
            *state = WindowStoreState {
                windows,
                current_workspace,
                is_initialized: true,
                ..WindowStoreState::default()
            };
            state.recompute_workspaces();
            state.workspaces.insert(current_workspace);
            state.active_app_id = state.topmost_restored_app();
        }
    }

    Ok(effects)
}

fn find_window<'a>(
    state: &'a WindowStoreState,
    app_id: &str,
) -> Result<&'a WindowRecord, ReducerError> {
    state
        .window(app_id)
        .ok_or_else(|| ReducerError::WindowNotFound(app_id.to_string()))
}

fn find_window_mut<'a>(
    state: &'a mut WindowStoreState,
    app_id: &str,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .window_mut(app_id)
        .ok_or_else(|| ReducerError::WindowNotFound(app_id.to_string()))
}

fn focus_existing(state: &mut WindowStoreState, app_id: &str) -> Result<(), ReducerError> {
    if focus_window_internal(state, app_id) {
        Ok(())
    } else {
        Err(ReducerError::WindowNotFound(app_id.to_string()))
    }
}

fn minimize(state: &mut WindowStoreState, app_id: &str) -> Result<(), ReducerError> {
    find_window_mut(state, app_id)?.is_minimized = true;
    if state.active_app_id.as_deref() == Some(app_id) {
        state.active_app_id = None;
    }
    Ok(())
}

fn demote_to_floating(window: &mut WindowRecord) {
    if window.layout != WindowLayout::Floating {
        window.layout = WindowLayout::Floating;
        window.is_maximized = false;
    }
}

fn persist(state: &WindowStoreState, app_id: &str) -> Result<RuntimeEffect, ReducerError> {
    find_window(state, app_id).map(|w| RuntimeEffect::PersistWindow(w.clone()))
}

fn visible_app_ids(state: &WindowStoreState) -> Vec<String> {
    state.visible_windows().map(|w| w.app_id.clone()).collect()
}

fn validate_workspace(workspace: u32) -> Result<(), ReducerError> {
    if workspace == 0 {
        Err(ReducerError::InvalidWorkspace(workspace))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowRect;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 700.0,
    };

    fn reduce(state: &mut WindowStoreState, action: WindowAction) -> Vec<RuntimeEffect> {
        reduce_windows(state, &LayoutConfig::default(), action).expect("reduce")
    }

    fn open(state: &mut WindowStoreState, app_id: &str) {
        reduce(
            state,
            WindowAction::OpenApp {
                app_id: app_id.to_string(),
            },
        );
    }

    fn window<'a>(state: &'a WindowStoreState, app_id: &str) -> &'a WindowRecord {
        state.window(app_id).expect("window present")
    }

    #[test]
    fn open_app_creates_cascaded_floating_window_in_current_workspace() {
        let mut state = WindowStoreState::default();
        state.current_workspace = 2;
        open(&mut state, "notes");
        open(&mut state, "terminal");

        let terminal = window(&state, "terminal");
        assert_eq!(terminal.rect(), WindowRect::new(60.0, 60.0, 800.0, 600.0));
        assert_eq!(terminal.layout, WindowLayout::Floating);
        assert_eq!(terminal.workspace, 2);
        assert_eq!(terminal.z_index, 2);
        assert_eq!(terminal.id, None);
        assert_eq!(state.active_app_id.as_deref(), Some("terminal"));
    }

    #[test]
    fn reopening_minimized_app_restores_and_raises_without_duplicating() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "terminal");
        reduce(
            &mut state,
            WindowAction::MinimizeApp {
                app_id: "notes".to_string(),
            },
        );

        let effects = reduce(
            &mut state,
            WindowAction::OpenApp {
                app_id: "notes".to_string(),
            },
        );

        assert_eq!(state.windows.len(), 2);
        let notes = window(&state, "notes");
        assert!(!notes.is_minimized);
        assert_eq!(notes.z_index, 3);
        assert_eq!(state.active_app_id.as_deref(), Some("notes"));
        assert_eq!(effects, vec![RuntimeEffect::PersistWindow(notes.clone())]);
    }

    #[test]
    fn close_active_app_refocuses_topmost_restored_window() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "mail");
        open(&mut state, "terminal");
        reduce(
            &mut state,
            WindowAction::MinimizeApp {
                app_id: "mail".to_string(),
            },
        );

        let effects = reduce(
            &mut state,
            WindowAction::CloseApp {
                app_id: "terminal".to_string(),
            },
        );

        assert_eq!(state.active_app_id.as_deref(), Some("notes"));
        assert_eq!(
            effects,
            vec![RuntimeEffect::DeleteWindow {
                app_id: "terminal".to_string()
            }]
        );
    }

    #[test]
    fn close_unknown_app_is_rejected_without_mutation() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        let before = state.clone();

        let err = reduce_windows(
            &mut state,
            &LayoutConfig::default(),
            WindowAction::CloseApp {
                app_id: "browser".to_string(),
            },
        )
        .expect_err("unknown app");

        assert_eq!(err, ReducerError::WindowNotFound("browser".to_string()));
        assert_eq!(state, before);
    }

    #[test]
    fn minimize_clears_focus_but_keeps_z_index() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        let z_before = window(&state, "notes").z_index;

        reduce(
            &mut state,
            WindowAction::MinimizeApp {
                app_id: "notes".to_string(),
            },
        );

        assert_eq!(state.active_app_id, None);
        assert_eq!(window(&state, "notes").z_index, z_before);
        assert_eq!(state.minimized_apps(), vec!["notes".to_string()]);
    }

    #[test]
    fn toggle_minimize_round_trips_focus() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        let toggle = WindowAction::ToggleMinimize {
            app_id: "notes".to_string(),
        };

        reduce(&mut state, toggle.clone());
        assert!(window(&state, "notes").is_minimized);
        assert_eq!(state.active_app_id, None);

        reduce(&mut state, toggle);
        assert!(!window(&state, "notes").is_minimized);
        assert_eq!(state.active_app_id.as_deref(), Some("notes"));
    }

    #[test]
    fn maximize_and_restore_toggle_layout_tag() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "terminal");

        reduce(
            &mut state,
            WindowAction::MaximizeApp {
                app_id: "notes".to_string(),
            },
        );
        let notes = window(&state, "notes");
        assert!(notes.is_maximized);
        assert_eq!(notes.layout, WindowLayout::Maximized);
        assert_eq!(notes.z_index, 3);
        assert_eq!(state.active_app_id.as_deref(), Some("notes"));

        reduce(
            &mut state,
            WindowAction::RestoreApp {
                app_id: "notes".to_string(),
            },
        );
        let notes = window(&state, "notes");
        assert!(!notes.is_maximized);
        assert_eq!(notes.layout, WindowLayout::Floating);
        assert_eq!(notes.z_index, 4);
    }

    #[test]
    fn moving_a_managed_window_demotes_it_to_floating() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        reduce(
            &mut state,
            WindowAction::MaximizeApp {
                app_id: "notes".to_string(),
            },
        );

        let effects = reduce(
            &mut state,
            WindowAction::MoveWindow {
                app_id: "notes".to_string(),
                position: WindowPosition::new(10.0, 20.0),
            },
        );

        let notes = window(&state, "notes");
        assert_eq!(notes.layout, WindowLayout::Floating);
        assert!(!notes.is_maximized);
        assert_eq!(
            effects,
            vec![RuntimeEffect::PersistWindowDebounced(notes.clone())]
        );
    }

    #[test]
    fn resizing_a_snapped_window_demotes_it_to_floating() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        reduce(
            &mut state,
            WindowAction::SnapWindow {
                app_id: "notes".to_string(),
                edge: SnapEdge::TopLeft,
                viewport: VIEWPORT,
            },
        );
        assert_eq!(window(&state, "notes").layout, WindowLayout::SnapTopLeft);

        reduce(
            &mut state,
            WindowAction::ResizeWindow {
                app_id: "notes".to_string(),
                size: WindowSize::new(320.0, 240.0),
            },
        );

        let notes = window(&state, "notes");
        assert_eq!(notes.layout, WindowLayout::Floating);
        assert_eq!(notes.size, WindowSize::new(320.0, 240.0));
    }

    #[test]
    fn snap_clears_minimized_and_maximized_and_raises() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "terminal");
        reduce(
            &mut state,
            WindowAction::MaximizeApp {
                app_id: "notes".to_string(),
            },
        );
        reduce(
            &mut state,
            WindowAction::MinimizeApp {
                app_id: "notes".to_string(),
            },
        );

        let effects = reduce(
            &mut state,
            WindowAction::SnapWindow {
                app_id: "notes".to_string(),
                edge: SnapEdge::Right,
                viewport: VIEWPORT,
            },
        );

        let notes = window(&state, "notes");
        assert_eq!(notes.rect(), WindowRect::new(500.0, 0.0, 500.0, 700.0));
        assert!(!notes.is_minimized);
        assert!(!notes.is_maximized);
        assert_eq!(notes.layout, WindowLayout::SnapRight);
        assert!(notes.z_index > window(&state, "terminal").z_index);
        assert_eq!(state.active_app_id.as_deref(), Some("notes"));
        assert_eq!(effects, vec![RuntimeEffect::PersistWindow(notes.clone())]);
    }

    #[test]
    fn switch_workspace_changes_only_the_pointer() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        let windows_before = state.windows.clone();

        let effects = reduce(&mut state, WindowAction::SwitchWorkspace { workspace: 3 });

        assert!(effects.is_empty());
        assert_eq!(state.windows, windows_before);
        assert_eq!(state.current_workspace, 3);
        assert_eq!(state.visible_windows().count(), 0);
    }

    #[test]
    fn workspace_zero_is_rejected() {
        let mut state = WindowStoreState::default();
        let err = reduce_windows(
            &mut state,
            &LayoutConfig::default(),
            WindowAction::SwitchWorkspace { workspace: 0 },
        )
        .expect_err("workspace zero");
        assert_eq!(err, ReducerError::InvalidWorkspace(0));
        assert_eq!(state.current_workspace, 1);
    }

    #[test]
    fn set_window_workspace_registers_new_workspace() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");

        let effects = reduce(
            &mut state,
            WindowAction::SetWindowWorkspace {
                app_id: "notes".to_string(),
                workspace: 4,
            },
        );

        assert_eq!(window(&state, "notes").workspace, 4);
        assert_eq!(state.workspaces, BTreeSet::from([1, 4]));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn tile_two_windows_splits_viewport_vertically() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "terminal");

        let effects = reduce(&mut state, WindowAction::TileWindows { viewport: VIEWPORT });

        assert_eq!(
            window(&state, "notes").rect(),
            WindowRect::new(0.0, 0.0, 500.0, 700.0)
        );
        assert_eq!(
            window(&state, "terminal").rect(),
            WindowRect::new(500.0, 0.0, 500.0, 700.0)
        );
        assert!(state.windows.iter().all(|w| w.layout == WindowLayout::Tiling));
        let writes = effects
            .iter()
            .filter(|e| matches!(e, RuntimeEffect::PersistWindow(_)))
            .count();
        assert_eq!(writes, 2);
        assert!(matches!(effects.last(), Some(RuntimeEffect::Notify { .. })));
    }

    #[test]
    fn tile_skips_minimized_and_other_workspace_windows() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "mail");
        open(&mut state, "terminal");
        reduce(
            &mut state,
            WindowAction::MinimizeApp {
                app_id: "mail".to_string(),
            },
        );
        reduce(
            &mut state,
            WindowAction::SetWindowWorkspace {
                app_id: "terminal".to_string(),
                workspace: 2,
            },
        );
        let mail_before = window(&state, "mail").clone();

        reduce(&mut state, WindowAction::TileWindows { viewport: VIEWPORT });

        assert_eq!(
            window(&state, "notes").rect(),
            WindowRect::new(0.0, 0.0, 1000.0, 700.0)
        );
        assert_eq!(window(&state, "mail"), &mail_before);
        assert_eq!(window(&state, "terminal").layout, WindowLayout::Floating);
    }

    #[test]
    fn tile_and_cascade_without_visible_windows_are_noops() {
        let mut state = WindowStoreState::default();
        assert!(reduce(&mut state, WindowAction::TileWindows { viewport: VIEWPORT }).is_empty());
        assert!(reduce(&mut state, WindowAction::CascadeWindows).is_empty());
    }

    #[test]
    fn cascade_places_windows_diagonally_with_first_on_top() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "mail");
        open(&mut state, "terminal");
        reduce(&mut state, WindowAction::TileWindows { viewport: VIEWPORT });

        reduce(&mut state, WindowAction::CascadeWindows);

        let placed = state
            .windows
            .iter()
            .map(|w| (w.app_id.as_str(), w.position.x, w.z_index, w.layout))
            .collect::<Vec<_>>();
        assert_eq!(
            placed,
            vec![
                ("notes", 0.0, 3, WindowLayout::Floating),
                ("mail", 30.0, 2, WindowLayout::Floating),
                ("terminal", 60.0, 1, WindowLayout::Floating),
            ]
        );
        assert!(state
            .windows
            .iter()
            .all(|w| w.size == WindowSize::new(800.0, 600.0)));
    }

    #[test]
    fn cascade_leaves_minimized_and_other_workspace_windows_untouched() {
        let mut state = WindowStoreState::default();
        for app in ["notes", "mail", "terminal", "music"] {
            open(&mut state, app);
        }
        reduce(
            &mut state,
            WindowAction::MinimizeApp {
                app_id: "mail".to_string(),
            },
        );
        reduce(
            &mut state,
            WindowAction::SetWindowWorkspace {
                app_id: "music".to_string(),
                workspace: 2,
            },
        );
        let mail_before = window(&state, "mail").clone();
        let music_before = window(&state, "music").clone();

        let effects = reduce(&mut state, WindowAction::CascadeWindows);

        assert_eq!(window(&state, "mail"), &mail_before);
        assert_eq!(window(&state, "music"), &music_before);
        let placed = ["notes", "terminal"]
            .into_iter()
            .map(|app| {
                let w = window(&state, app);
                (w.position, w.z_index)
            })
            .collect::<Vec<_>>();
        assert_eq!(
            placed,
            vec![
                (WindowPosition::new(0.0, 0.0), 2),
                (WindowPosition::new(30.0, 30.0), 1),
            ]
        );
        let written = effects
            .iter()
            .filter_map(|e| match e {
                RuntimeEffect::PersistWindow(w) => Some(w.app_id.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(written, vec!["notes", "terminal"]);
    }

    #[test]
    fn sync_to_database_persists_every_window_in_order() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "terminal");
        reduce(
            &mut state,
            WindowAction::MinimizeApp {
                app_id: "terminal".to_string(),
            },
        );

        let effects = reduce(&mut state, WindowAction::SyncToDatabase);
        let apps = effects
            .iter()
            .map(|e| match e {
                RuntimeEffect::PersistWindow(w) => w.app_id.as_str(),
                other => panic!("unexpected effect {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(apps, vec!["notes", "terminal"]);
    }

    #[test]
    fn hydrate_rebuilds_workspaces_and_focuses_topmost_restored_window() {
        let mut state = WindowStoreState::default();
        let mut notes = WindowRecord::new("notes", WindowRect::new(0.0, 0.0, 1.0, 1.0), 1, 3);
        notes.id = Some("ws-1".to_string());
        let terminal = WindowRecord::new("terminal", WindowRect::new(0.0, 0.0, 1.0, 1.0), 2, 1);
        let mut mail = WindowRecord::new("mail", WindowRect::new(0.0, 0.0, 1.0, 1.0), 5, 1);
        mail.is_minimized = true;

        reduce(
            &mut state,
            WindowAction::Hydrate {
                windows: vec![notes, terminal, mail],
            },
        );

        assert!(state.is_initialized);
        assert_eq!(state.workspaces, BTreeSet::from([1, 3]));
        assert_eq!(state.active_app_id.as_deref(), Some("terminal"));
        assert_eq!(state.open_apps(), vec!["notes", "terminal", "mail"]);
    }

    #[test]
    fn z_index_stays_strictly_increasing_after_cascade() {
        let mut state = WindowStoreState::default();
        open(&mut state, "notes");
        open(&mut state, "terminal");
        reduce(&mut state, WindowAction::CascadeWindows);

        reduce(
            &mut state,
            WindowAction::SetActiveApp {
                app_id: "terminal".to_string(),
            },
        );

        let terminal = window(&state, "terminal").z_index;
        assert!(state
            .windows
            .iter()
            .filter(|w| w.app_id != "terminal")
            .all(|w| w.z_index < terminal));
    }
}
