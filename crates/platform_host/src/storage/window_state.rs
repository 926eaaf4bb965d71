//! Window-state persistence contracts, row types, and in-memory adapters.
//!
//! The gateway stores one row per `(container, app_id)`. The container is resolved by the
//! adapter itself (for a server backend, from the signed-in user's active workspace container),
//! so callers never pass it explicitly.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::{WindowPosition, WindowSize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Persisted window-state row as stored by a [`WindowStateStore`].
pub struct WindowStateRow {
    /// Gateway-assigned row id, absent until the row is first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Application key hosted by the window.
    pub app_id: String,
    /// Top-left window position.
    pub position: WindowPosition,
    /// Window size.
    pub size: WindowSize,
    /// Whether the window is minimized.
    pub is_minimized: bool,
    /// Whether the window is maximized.
    pub is_maximized: bool,
    /// Stacking order.
    pub z_index: u64,
    /// Opaque secondary payload (layout tag and workspace number).
    #[serde(default)]
    pub state_data: Value,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Result of [`WindowStateStore::load_window_states`].
pub struct WindowStateLoad {
    /// Whether a workspace container exists for the current user.
    ///
    /// `false` is a valid outcome (new user with no prior state), not an error.
    pub found: bool,
    /// Persisted rows ordered by ascending `z_index`.
    pub rows: Vec<WindowStateRow>,
    /// Resolved container id, when one exists.
    pub container_id: Option<String>,
}

impl WindowStateLoad {
    /// Builds a "no container" load result.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Object-safe boxed future used by [`WindowStateStore`] async methods.
pub type WindowStateStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Persistence gateway for window-state rows in the current workspace container.
pub trait WindowStateStore {
    /// Loads every row for the current container.
    fn load_window_states<'a>(
        &'a self,
    ) -> WindowStateStoreFuture<'a, Result<WindowStateLoad, String>>;

    /// Creates or updates a row and returns its stored id.
    ///
    /// Rows with an `id` are updated by id. Rows without one are matched by `app_id` within
    /// the container and created when no match exists.
    fn upsert_window_state<'a>(
        &'a self,
        row: &'a WindowStateRow,
    ) -> WindowStateStoreFuture<'a, Result<String, String>>;

    /// Deletes any row for `app_id` in the current container. Missing rows are not an error.
    fn delete_window_state<'a>(
        &'a self,
        app_id: &'a str,
    ) -> WindowStateStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op gateway for unsupported targets and baseline tests.
pub struct NoopWindowStateStore;

impl WindowStateStore for NoopWindowStateStore {
    fn load_window_states<'a>(
        &'a self,
    ) -> WindowStateStoreFuture<'a, Result<WindowStateLoad, String>> {
        Box::pin(async { Ok(WindowStateLoad::not_found()) })
    }

    fn upsert_window_state<'a>(
        &'a self,
        row: &'a WindowStateRow,
    ) -> WindowStateStoreFuture<'a, Result<String, String>> {
        Box::pin(async move { Ok(row.id.clone().unwrap_or_default()) })
    }

    fn delete_window_state<'a>(
        &'a self,
        _app_id: &'a str,
    ) -> WindowStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One write observed by a [`MemoryWindowStateStore`].
pub enum WindowStateWrite {
    /// A row was upserted.
    Upsert(WindowStateRow),
    /// A row was deleted by app id.
    Delete(String),
}

#[derive(Debug, Default)]
struct MemoryWindowStates {
    container_id: Option<String>,
    rows: Vec<WindowStateRow>,
    next_row_id: u64,
    writes: Vec<WindowStateWrite>,
}

#[derive(Debug, Clone)]
/// In-memory gateway scoped to a single workspace container.
pub struct MemoryWindowStateStore {
    inner: Rc<RefCell<MemoryWindowStates>>,
}

impl Default for MemoryWindowStateStore {
    fn default() -> Self {
        Self::new("container-1")
    }
}

impl MemoryWindowStateStore {
    /// Creates a store backed by the container `container_id`.
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryWindowStates {
                container_id: Some(container_id.into()),
                next_row_id: 1,
                ..MemoryWindowStates::default()
            })),
        }
    }

    /// Creates a store with no container, mirroring a user without an active workspace.
    pub fn without_container() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryWindowStates {
                next_row_id: 1,
                ..MemoryWindowStates::default()
            })),
        }
    }

    /// Returns a copy of the stored rows in insertion order.
    pub fn rows(&self) -> Vec<WindowStateRow> {
        self.inner.borrow().rows.clone()
    }

    /// Returns every accepted write so far, oldest first.
    pub fn writes(&self) -> Vec<WindowStateWrite> {
        self.inner.borrow().writes.clone()
    }

    /// Forgets the recorded write log without touching stored rows.
    pub fn clear_writes(&self) {
        self.inner.borrow_mut().writes.clear();
    }
}

impl MemoryWindowStates {
    fn require_container(&self) -> Result<(), String> {
        if self.container_id.is_some() {
            Ok(())
        } else {
            Err("no active workspace container".to_string())
        }
    }

    fn upsert(&mut self, row: &WindowStateRow) -> Result<String, String> {
        self.require_container()?;

        let existing = match row.id.as_deref() {
            Some(id) => Some(
                self.rows
                    .iter()
                    .position(|stored| stored.id.as_deref() == Some(id))
                    .ok_or_else(|| format!("window state `{id}` not found"))?,
            ),
            None => self.rows.iter().position(|stored| stored.app_id == row.app_id),
        };

        self.writes.push(WindowStateWrite::Upsert(row.clone()));
        match existing {
            Some(index) => {
                let stored = &mut self.rows[index];
                let id = stored.id.clone().unwrap_or_default();
                *stored = WindowStateRow {
                    id: Some(id.clone()),
                    app_id: stored.app_id.clone(),
                    ..row.clone()
                };
                Ok(id)
            }
            None => {
                let id = format!("ws-{}", self.next_row_id);
                self.next_row_id = self.next_row_id.saturating_add(1);
                self.rows.push(WindowStateRow {
                    id: Some(id.clone()),
                    ..row.clone()
                });
                Ok(id)
            }
        }
    }
}

impl WindowStateStore for MemoryWindowStateStore {
    fn load_window_states<'a>(
        &'a self,
    ) -> WindowStateStoreFuture<'a, Result<WindowStateLoad, String>> {
        Box::pin(async move {
            let inner = self.inner.borrow();
            let Some(container_id) = inner.container_id.clone() else {
                return Ok(WindowStateLoad::not_found());
            };
            let mut rows = inner.rows.clone();
            rows.sort_by_key(|row| row.z_index);
            Ok(WindowStateLoad {
                found: true,
                rows,
                container_id: Some(container_id),
            })
        })
    }

    fn upsert_window_state<'a>(
        &'a self,
        row: &'a WindowStateRow,
    ) -> WindowStateStoreFuture<'a, Result<String, String>> {
        Box::pin(async move { self.inner.borrow_mut().upsert(row) })
    }

    fn delete_window_state<'a>(
        &'a self,
        app_id: &'a str,
    ) -> WindowStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.require_container()?;
            inner.writes.push(WindowStateWrite::Delete(app_id.to_string()));
            inner.rows.retain(|row| row.app_id != app_id);
            Ok(())
        })
    }
}
