//! Leptos provider and context wiring for the window store.
//!
//! The provider owns one [`WindowStore`], mirrors its registry into a reactive signal after every
//! mutation, hands queued writes to the worker's single ordered drain, and arms a timeout for the
//! next debounced write. It also hydrates the registry at boot and installs the global window
//! shortcuts.

use std::time::Duration;

use leptos::{leptos_dom::helpers::TimeoutHandle, *};
use platform_host::HostServices;

use crate::{
    config::WindowStoreConfig,
    model::WindowStoreState,
    persistence::load_windows,
    reducer::WindowAction,
    shortcuts::{event_targets_text_input, resolve_shortcut, KeyChord},
    store::{StoreNotification, WindowStore},
};

#[derive(Clone, Copy)]
/// Leptos context for reading window state and mutating the [`WindowStore`].
pub struct WindowStoreContext {
    /// Reactive copy of the window registry.
    pub state: RwSignal<WindowStoreState>,
    /// Notifications raised by tile and cascade, drained by the view.
    pub notifications: RwSignal<Vec<StoreNotification>>,
    store: StoredValue<WindowStore>,
    flush_timer: StoredValue<Option<TimeoutHandle>>,
}

impl WindowStoreContext {
    /// Runs `f` against the store, then publishes state and schedules persistence.
    ///
    /// Returns `None` once the owning reactive scope has been disposed.
    pub fn update<O>(&self, f: impl FnOnce(&mut WindowStore) -> O) -> Option<O> {
        let output = self.store.try_update_value(f)?;
        self.publish();
        Some(output)
    }

    /// Dispatches one reducer action.
    pub fn dispatch(&self, action: WindowAction) {
        self.update(|store| store.dispatch(action));
    }

    /// Reads the store without publishing.
    pub fn with_store<O>(&self, f: impl FnOnce(&WindowStore) -> O) -> O {
        self.store.with_value(f)
    }

    fn publish(&self) {
        let Some((snapshot, commands, notices, delay, worker)) =
            self.store.try_update_value(|store| {
                store.flush_due();
                (
                    store.state().clone(),
                    store.drain_commands(),
                    store.take_notifications(),
                    store.debounce_delay_ms(),
                    store.worker().clone(),
                )
            })
        else {
            return;
        };

        if self.state.with_untracked(|current| current != &snapshot) {
            self.state.set(snapshot);
        }
        if !notices.is_empty() {
            self.notifications.update(|queue| queue.extend(notices));
        }
        if !commands.is_empty() {
            worker.submit(commands);
            spawn_local(async move {
                worker.drain().await;
            });
        }
        self.arm_flush_timer(delay);
    }

    fn arm_flush_timer(&self, delay_ms: Option<u64>) {
        if let Some(handle) = self.flush_timer.get_value() {
            handle.clear();
        }
        let Some(delay_ms) = delay_ms else {
            self.flush_timer.set_value(None);
            return;
        };

        let context = *self;
        match set_timeout_with_handle(move || context.publish(), Duration::from_millis(delay_ms))
        {
            Ok(handle) => self.flush_timer.set_value(Some(handle)),
            Err(err) => logging::warn!("schedule window state flush failed: {err:?}"),
        }
    }
}

/// Builds the store, provides [`WindowStoreContext`], and starts boot hydration.
pub fn provide_window_store(host: HostServices, config: WindowStoreConfig) -> WindowStoreContext {
    let context = WindowStoreContext {
        state: create_rw_signal(WindowStoreState::default()),
        notifications: create_rw_signal(Vec::new()),
        store: store_value(WindowStore::new(host, config)),
        flush_timer: store_value(None),
    };
    provide_context(context);
    install_boot_hydration(context);
    context
}

fn install_boot_hydration(context: WindowStoreContext) {
    let gateway = context.with_store(|store| store.worker().gateway());
    spawn_local(async move {
        let loaded = load_windows(gateway.as_ref()).await;
        context.update(|store| store.apply_hydration(loaded));
    });
}

fn install_window_shortcuts(context: WindowStoreContext) {
    let listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() {
            return;
        }
        let chord = KeyChord::from_keyboard_event(&ev);
        let in_text_input = event_targets_text_input(&ev);
        let action = context.with_store(|store| {
            resolve_shortcut(&chord, in_text_input, store.state(), store.viewport())
        });
        if let Some(action) = action {
            ev.prevent_default();
            context.dispatch(action);
        }
    });
    on_cleanup(move || listener.remove());
}

#[component]
/// Provides [`WindowStoreContext`] to descendant components.
pub fn WindowStoreProvider(
    /// Injected gateway and clock.
    host_services: HostServices,
    /// Store configuration; defaults when omitted.
    #[prop(optional)]
    config: Option<WindowStoreConfig>,
    children: Children,
) -> impl IntoView {
    let context = provide_window_store(host_services, config.unwrap_or_default());
    install_window_shortcuts(context);
    children().into_view()
}

/// Returns the current [`WindowStoreContext`].
///
/// # Panics
///
/// Panics if called outside [`WindowStoreProvider`] or [`provide_window_store`].
pub fn use_window_store() -> WindowStoreContext {
    use_context::<WindowStoreContext>().expect("WindowStoreContext not provided")
}
