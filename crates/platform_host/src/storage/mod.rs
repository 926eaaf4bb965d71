//! Persistence contracts for host-backed storage.

pub mod window_state;
