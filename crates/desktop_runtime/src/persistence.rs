//! Window-state persistence: boot hydration, per-window write debouncing, and the background
//! write worker.
//!
//! The store never waits on any of this. Mutations queue [`PersistCommand`]s and the worker
//! drains them against the [`WindowStateStore`] gateway, retrying a bounded number of times and
//! dead-lettering what still fails. Local state is never rolled back.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use leptos::logging;
use platform_host::{WindowStateRow, WindowStateStore};
use thiserror::Error;

use crate::model::WindowRecord;

#[derive(Debug, Clone, PartialEq)]
/// A single write against the persistence gateway.
pub enum PersistCommand {
    /// Create or update a window row.
    Upsert(WindowStateRow),
    /// Delete the row of a closed window.
    Delete {
        /// App whose row is removed.
        app_id: String,
    },
}

impl PersistCommand {
    /// App the command targets.
    pub fn app_id(&self) -> &str {
        match self {
            Self::Upsert(row) => &row.app_id,
            Self::Delete { app_id } => app_id,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Gateway failures observed by the persistence layer.
pub enum PersistenceError {
    #[error("window state load failed: {0}")]
    Load(String),
    #[error("saving window state for `{app_id}` failed: {message}")]
    Upsert { app_id: String, message: String },
    #[error("deleting window state for `{app_id}` failed: {message}")]
    Delete { app_id: String, message: String },
}

/// Loads persisted windows for boot hydration.
///
/// Returns `Ok(None)` when the gateway reports no workspace container, which is a valid empty
/// state for a new user.
///
/// # Errors
///
/// Returns [`PersistenceError::Load`] when the gateway itself fails.
pub async fn load_windows(
    gateway: &dyn WindowStateStore,
) -> Result<Option<Vec<WindowRecord>>, PersistenceError> {
    let load = gateway
        .load_window_states()
        .await
        .map_err(PersistenceError::Load)?;
    if !load.found {
        return Ok(None);
    }
    Ok(Some(
        load.rows.into_iter().map(WindowRecord::from_row).collect(),
    ))
}

#[derive(Debug, Clone)]
struct PendingWrite {
    record: WindowRecord,
    due_at_ms: u64,
}

/// Coalesces rapid move/resize writes per app.
///
/// Each app has its own slot: scheduling replaces that app's pending record and pushes its
/// deadline out, so interleaved drags on different windows never drop each other's final state.
#[derive(Debug)]
pub struct WriteDebouncer {
    pending: HashMap<String, PendingWrite>,
    settle_ms: u64,
}

impl WriteDebouncer {
    pub fn new(settle_ms: u64) -> Self {
        Self {
            pending: HashMap::new(),
            settle_ms,
        }
    }

    /// Replaces any pending write for the record's app; it becomes due `settle_ms` after `now_ms`.
    pub fn schedule(&mut self, record: WindowRecord, now_ms: u64) {
        let due_at_ms = now_ms.saturating_add(self.settle_ms);
        self.pending
            .insert(record.app_id.clone(), PendingWrite { record, due_at_ms });
    }

    /// Drops the pending write for `app_id`, returning whether one existed.
    pub fn cancel(&mut self, app_id: &str) -> bool {
        self.pending.remove(app_id).is_some()
    }

    /// Removes and returns every write due at `now_ms`, oldest deadline first.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<WindowRecord> {
        let mut due = self
            .pending
            .iter()
            .filter(|(_, write)| write.due_at_ms <= now_ms)
            .map(|(app_id, write)| (write.due_at_ms, app_id.clone()))
            .collect::<Vec<_>>();
        due.sort();
        due.into_iter()
            .filter_map(|(_, app_id)| self.pending.remove(&app_id))
            .map(|write| write.record)
            .collect()
    }

    /// Removes and returns every pending write regardless of deadline.
    pub fn take_all(&mut self) -> Vec<WindowRecord> {
        self.take_due(u64::MAX)
    }

    /// Earliest pending deadline, if any.
    pub fn next_due_at(&self) -> Option<u64> {
        self.pending.values().map(|write| write.due_at_ms).min()
    }

    pub fn is_pending(&self, app_id: &str) -> bool {
        self.pending.contains_key(app_id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A write that exhausted its retry budget.
pub struct DeadLetter {
    pub command: PersistCommand,
    pub error: PersistenceError,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Outcome counts for one [`PersistenceWorker::run`] batch.
pub struct PersistReport {
    pub written: usize,
    pub failed: usize,
}

/// Executes persistence commands against the gateway in order.
///
/// Clones share the gateway, the submission queue, and the dead-letter log. Commands submitted
/// from any clone reach the gateway in submission order: only one [`PersistenceWorker::drain`]
/// is active at a time and it keeps going until the queue is empty.
#[derive(Clone)]
pub struct PersistenceWorker {
    gateway: Rc<dyn WindowStateStore>,
    max_attempts: u32,
    queue: Rc<RefCell<VecDeque<PersistCommand>>>,
    draining: Rc<Cell<bool>>,
    dead_letters: Rc<RefCell<Vec<DeadLetter>>>,
}

struct DrainGuard(Rc<Cell<bool>>);

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl PersistenceWorker {
    pub fn new(gateway: Rc<dyn WindowStateStore>, max_attempts: u32) -> Self {
        Self {
            gateway,
            max_attempts: max_attempts.max(1),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            draining: Rc::new(Cell::new(false)),
            dead_letters: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn gateway(&self) -> Rc<dyn WindowStateStore> {
        self.gateway.clone()
    }

    /// Writes that failed after every attempt, oldest first.
    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters.borrow().clone()
    }

    /// Appends commands to the shared submission queue.
    pub fn submit(&self, commands: impl IntoIterator<Item = PersistCommand>) {
        self.queue.borrow_mut().extend(commands);
    }

    /// Number of submitted commands not yet taken by a drain.
    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Sends queued commands until the queue is empty, including commands submitted while
    /// earlier ones are in flight.
    ///
    /// Returns immediately with an empty report when another drain is already running; that
    /// drain picks up whatever was submitted.
    pub async fn drain(&self) -> PersistReport {
        let mut report = PersistReport::default();
        if self.draining.replace(true) {
            return report;
        }
        let _guard = DrainGuard(self.draining.clone());
        loop {
            let batch = self.queue.borrow_mut().drain(..).collect::<Vec<_>>();
            if batch.is_empty() {
                return report;
            }
            let ran = self.run(batch).await;
            report.written += ran.written;
            report.failed += ran.failed;
        }
    }

    /// Runs `commands` sequentially. Failures are logged and dead-lettered, never returned.
    pub async fn run(&self, commands: Vec<PersistCommand>) -> PersistReport {
        let mut report = PersistReport::default();
        for command in commands {
            match self.execute(&command).await {
                Ok(()) => report.written += 1,
                Err((error, attempts)) => {
                    logging::error!("{error} (gave up after {attempts} attempts)");
                    self.dead_letters.borrow_mut().push(DeadLetter {
                        command,
                        error,
                        attempts,
                    });
                    report.failed += 1;
                }
            }
        }
        report
    }

    async fn execute(&self, command: &PersistCommand) -> Result<(), (PersistenceError, u32)> {
        let mut attempt = 1;
        loop {
            match self.attempt(command).await {
                Ok(()) => return Ok(()),
                Err(error) if attempt < self.max_attempts => {
                    logging::warn!("{error}; retrying (attempt {attempt}/{})", self.max_attempts);
                    attempt += 1;
                }
                Err(error) => return Err((error, attempt)),
            }
        }
    }

    async fn attempt(&self, command: &PersistCommand) -> Result<(), PersistenceError> {
        match command {
            PersistCommand::Upsert(row) => self
                .gateway
                .upsert_window_state(row)
                .await
                .map(|_| ())
                .map_err(|message| PersistenceError::Upsert {
                    app_id: row.app_id.clone(),
                    message,
                }),
            PersistCommand::Delete { app_id } => self
                .gateway
                .delete_window_state(app_id)
                .await
                .map_err(|message| PersistenceError::Delete {
                    app_id: app_id.clone(),
                    message,
                }),
        }
    }
}
