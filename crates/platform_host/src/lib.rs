//! Typed host-domain contracts and shared models used by the desktop window runtime.
//!
//! This crate is the API-first boundary for window-state persistence. It exposes the shared
//! geometry values, the [`WindowStateStore`] gateway contract with in-memory adapters, and the
//! time sources used for debounced writes. Concrete server-backed gateways implement the trait
//! outside the runtime.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod geometry;
pub mod host;
pub mod storage;
pub mod time;

pub use geometry::{WindowPosition, WindowSize};
pub use host::HostServices;
pub use storage::window_state::{
    MemoryWindowStateStore, NoopWindowStateStore, WindowStateLoad, WindowStateRow,
    WindowStateStore, WindowStateStoreFuture, WindowStateWrite,
};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
