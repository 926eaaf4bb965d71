//! Host service bundle injected into the desktop window runtime.

use std::rc::Rc;

use crate::{Clock, NoopWindowStateStore, SystemClock, WindowStateStore};

/// Runtime-selected host services injected into the shared window runtime.
///
/// All environment-specific selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the runtime decoupled from backend details.
#[derive(Clone)]
pub struct HostServices {
    /// Window-state persistence gateway.
    pub window_states: Rc<dyn WindowStateStore>,
    /// Time source for debounced persistence.
    pub clock: Rc<dyn Clock>,
}

impl HostServices {
    /// Bundles a gateway with the wall clock.
    pub fn new(window_states: Rc<dyn WindowStateStore>) -> Self {
        Self {
            window_states,
            clock: Rc::new(SystemClock),
        }
    }

    /// Replaces the clock, typically with a [`crate::ManualClock`] in tests.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for HostServices {
    fn default() -> Self {
        Self::new(Rc::new(NoopWindowStateStore))
    }
}
