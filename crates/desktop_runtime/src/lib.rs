//! Window store for the browser desktop shell.
//!
//! [`WindowStore`] is the single authority over open windows: focus and z-order, minimize and
//! maximize, snap, tile and cascade layouts, and workspace membership. Every mutation is applied
//! synchronously through [`reduce_windows`]; persistence runs afterwards through the injected
//! [`platform_host::WindowStateStore`] gateway, with move/resize writes debounced per window.

pub mod config;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod shortcuts;
pub mod store;
pub mod window_manager;

pub use config::{ConfigError, LayoutConfig, PersistenceConfig, WindowStoreConfig};
pub use model::*;
pub use persistence::{
    load_windows, DeadLetter, PersistCommand, PersistReport, PersistenceError, PersistenceWorker,
    WriteDebouncer,
};
pub use reducer::{reduce_windows, ReducerError, RuntimeEffect, WindowAction};
pub use runtime_context::{
    provide_window_store, use_window_store, WindowStoreContext, WindowStoreProvider,
};
pub use shortcuts::{resolve_shortcut, KeyChord};
pub use store::{StoreNotification, WindowStore};
