//! The window store: an explicitly owned registry of open windows plus its persistence queue.
//!
//! Every mutation runs the reducer synchronously and returns immediately. Immediate writes are
//! queued as [`PersistCommand`]s, move/resize writes wait in a per-app [`WriteDebouncer`], and
//! [`WindowStore::flush`] or a host driver hands the queue to the [`PersistenceWorker`].
//! Mutations that target a window that is no longer open are silent no-ops.

use std::{collections::VecDeque, rc::Rc};

use leptos::logging;
use platform_host::{Clock, HostServices};

use crate::{
    config::WindowStoreConfig,
    model::{SnapEdge, Viewport, WindowPosition, WindowRecord, WindowSize, WindowStoreState},
    persistence::{
        load_windows, DeadLetter, PersistCommand, PersistReport, PersistenceError,
        PersistenceWorker, WriteDebouncer,
    },
    reducer::{reduce_windows, ReducerError, RuntimeEffect, WindowAction},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// User-visible notification raised by a store operation.
pub struct StoreNotification {
    pub title: String,
    pub body: String,
}

/// Authoritative window state container.
pub struct WindowStore {
    state: WindowStoreState,
    config: WindowStoreConfig,
    viewport: Viewport,
    clock: Rc<dyn Clock>,
    worker: PersistenceWorker,
    debouncer: WriteDebouncer,
    outbound: VecDeque<PersistCommand>,
    notifications: Vec<StoreNotification>,
}

impl WindowStore {
    /// Builds an empty, uninitialized store over the injected host services.
    pub fn new(host: HostServices, config: WindowStoreConfig) -> Self {
        Self {
            state: WindowStoreState::default(),
            viewport: config.viewport,
            clock: host.clock,
            worker: PersistenceWorker::new(host.window_states, config.persistence.max_attempts),
            debouncer: WriteDebouncer::new(config.persistence.debounce_ms),
            outbound: VecDeque::new(),
            notifications: Vec::new(),
            config,
        }
    }

    pub fn state(&self) -> &WindowStoreState {
        &self.state
    }

    pub fn config(&self) -> &WindowStoreConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the layout area used by snap and tile.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn worker(&self) -> &PersistenceWorker {
        &self.worker
    }

    pub fn open_apps(&self) -> Vec<String> {
        self.state.open_apps()
    }

    pub fn active_app_id(&self) -> Option<&str> {
        self.state.active_app_id.as_deref()
    }

    pub fn minimized_apps(&self) -> Vec<String> {
        self.state.minimized_apps()
    }

    pub fn window_data(&self, app_id: &str) -> Option<&WindowRecord> {
        self.state.window(app_id)
    }

    pub fn workspaces(&self) -> Vec<u32> {
        self.state.workspaces.iter().copied().collect()
    }

    pub fn current_workspace(&self) -> u32 {
        self.state.current_workspace
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized
    }

    pub fn visible_windows(&self) -> Vec<&WindowRecord> {
        self.state.visible_windows().collect()
    }

    /// Hydrates the registry from the gateway.
    ///
    /// Never fails: a missing container yields an empty registry and a gateway error is logged
    /// and also yields an empty registry. Either way the store ends up initialized.
    pub async fn initialize(&mut self) {
        let loaded = load_windows(self.worker.gateway().as_ref()).await;
        self.apply_hydration(loaded);
    }

    /// Applies a boot load result. Split from [`Self::initialize`] so hosts can run the load on
    /// their own executor without holding the store across the await.
    pub fn apply_hydration(
        &mut self,
        loaded: Result<Option<Vec<WindowRecord>>, PersistenceError>,
    ) {
        let windows = match loaded {
            Ok(Some(windows)) => windows,
            Ok(None) => Vec::new(),
            Err(err) => {
                logging::error!("{err}; starting with an empty desktop");
                Vec::new()
            }
        };
        self.debouncer.clear();
        self.dispatch(WindowAction::Hydrate { windows });
    }

    /// Runs one reducer action and schedules its side effects.
    pub fn dispatch(&mut self, action: WindowAction) {
        match reduce_windows(&mut self.state, &self.config.layout, action) {
            Ok(effects) => {
                for effect in effects {
                    self.run_effect(effect);
                }
            }
            Err(ReducerError::WindowNotFound(_)) => {}
            Err(err) => logging::warn!("window store: {err}"),
        }
    }

    fn run_effect(&mut self, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistWindow(record) => {
                self.debouncer.cancel(&record.app_id);
                self.outbound.push_back(PersistCommand::Upsert(record.to_row()));
            }
            RuntimeEffect::PersistWindowDebounced(record) => {
                let now = self.clock.now_ms();
                self.debouncer.schedule(record, now);
            }
            RuntimeEffect::DeleteWindow { app_id } => {
                self.debouncer.cancel(&app_id);
                self.outbound.push_back(PersistCommand::Delete { app_id });
            }
            RuntimeEffect::Notify { title, body } => {
                logging::log!("{title}: {body}");
                self.notifications.push(StoreNotification { title, body });
            }
        }
    }

    pub fn open_app(&mut self, app_id: &str) {
        self.dispatch(WindowAction::OpenApp {
            app_id: app_id.to_string(),
        });
    }

    pub fn close_app(&mut self, app_id: &str) {
        self.dispatch(WindowAction::CloseApp {
            app_id: app_id.to_string(),
        });
    }

    pub fn set_active_app(&mut self, app_id: &str) {
        self.dispatch(WindowAction::SetActiveApp {
            app_id: app_id.to_string(),
        });
    }

    pub fn minimize_app(&mut self, app_id: &str) {
        self.dispatch(WindowAction::MinimizeApp {
            app_id: app_id.to_string(),
        });
    }

    pub fn toggle_minimize(&mut self, app_id: &str) {
        self.dispatch(WindowAction::ToggleMinimize {
            app_id: app_id.to_string(),
        });
    }

    pub fn maximize_app(&mut self, app_id: &str) {
        self.dispatch(WindowAction::MaximizeApp {
            app_id: app_id.to_string(),
        });
    }

    pub fn restore_app(&mut self, app_id: &str) {
        self.dispatch(WindowAction::RestoreApp {
            app_id: app_id.to_string(),
        });
    }

    pub fn move_window(&mut self, app_id: &str, position: WindowPosition) {
        self.dispatch(WindowAction::MoveWindow {
            app_id: app_id.to_string(),
            position,
        });
    }

    pub fn resize_window(&mut self, app_id: &str, size: WindowSize) {
        self.dispatch(WindowAction::ResizeWindow {
            app_id: app_id.to_string(),
            size,
        });
    }

    pub fn snap_window(&mut self, app_id: &str, edge: SnapEdge) {
        self.dispatch(WindowAction::SnapWindow {
            app_id: app_id.to_string(),
            edge,
            viewport: self.viewport,
        });
    }

    pub fn snap_window_left(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::Left);
    }

    pub fn snap_window_right(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::Right);
    }

    pub fn snap_window_top(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::Top);
    }

    pub fn snap_window_bottom(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::Bottom);
    }

    pub fn snap_window_top_left(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::TopLeft);
    }

    pub fn snap_window_top_right(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::TopRight);
    }

    pub fn snap_window_bottom_left(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::BottomLeft);
    }

    pub fn snap_window_bottom_right(&mut self, app_id: &str) {
        self.snap_window(app_id, SnapEdge::BottomRight);
    }

    pub fn switch_workspace(&mut self, workspace: u32) {
        self.dispatch(WindowAction::SwitchWorkspace { workspace });
    }

    pub fn set_window_workspace(&mut self, app_id: &str, workspace: u32) {
        self.dispatch(WindowAction::SetWindowWorkspace {
            app_id: app_id.to_string(),
            workspace,
        });
    }

    pub fn tile_windows(&mut self) {
        self.dispatch(WindowAction::TileWindows {
            viewport: self.viewport,
        });
    }

    pub fn cascade_windows(&mut self) {
        self.dispatch(WindowAction::CascadeWindows);
    }

    /// Queues a write of every open window and sends the queue.
    pub async fn sync_to_database(&mut self) -> PersistReport {
        self.dispatch(WindowAction::SyncToDatabase);
        self.flush().await
    }

    /// Moves debounced writes whose quiet period has elapsed into the outbound queue.
    ///
    /// Writes for windows closed in the meantime are dropped.
    pub fn flush_due(&mut self) {
        let now = self.clock.now_ms();
        for record in self.debouncer.take_due(now) {
            if self.state.window(&record.app_id).is_some() {
                self.outbound
                    .push_back(PersistCommand::Upsert(record.to_row()));
            }
        }
    }

    /// Milliseconds until the earliest debounced write falls due.
    pub fn debounce_delay_ms(&self) -> Option<u64> {
        let now = self.clock.now_ms();
        self.debouncer
            .next_due_at()
            .map(|deadline| deadline.saturating_sub(now))
    }

    pub fn has_pending_debounced_write(&self, app_id: &str) -> bool {
        self.debouncer.is_pending(app_id)
    }

    /// Takes every queued command, leaving the queue empty.
    pub fn drain_commands(&mut self) -> Vec<PersistCommand> {
        self.outbound.drain(..).collect()
    }

    /// Promotes due debounced writes and sends the outbound queue through the worker.
    pub async fn flush(&mut self) -> PersistReport {
        self.flush_due();
        self.worker.submit(self.outbound.drain(..));
        self.worker.drain().await
    }

    /// Sends every queued and pending write immediately, ignoring debounce deadlines.
    pub async fn flush_all(&mut self) -> PersistReport {
        for record in self.debouncer.take_all() {
            if self.state.window(&record.app_id).is_some() {
                self.outbound
                    .push_back(PersistCommand::Upsert(record.to_row()));
            }
        }
        self.flush().await
    }

    pub fn take_notifications(&mut self) -> Vec<StoreNotification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.worker.dead_letters()
    }
}
