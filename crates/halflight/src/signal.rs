//! System color-scheme signal source.
//!
//! The operating system's dark/light preference is an external signal
//! that can flip at any moment while the application runs. This module
//! abstracts it behind the [`SignalSource`] capability: a one-shot
//! `read()` plus a `subscribe(callback)` that returns a
//! [`Subscription`] guard. The abstraction exists so the provider can
//! be driven by a deterministic [`FakeSignal`] in tests instead of the
//! real environment.
//!
//! # Change notification
//!
//! `dark-light` is a query-only interface, so [`OsSignal`] realizes
//! change notification cooperatively: the host event loop calls
//! [`OsSignal::poll`] on its own schedule, and listeners fire only
//! when the detected mode actually flipped since the last poll.
//! Callbacks must therefore be treated as firing at an arbitrary
//! point relative to other code — possibly immediately after
//! subscribing, possibly never.
//!
//! # Callback isolation
//!
//! A panicking listener is caught per-callback; it neither crashes the
//! host nor prevents other listeners from being notified.
//!
//! # Example
//!
//! ```rust
//! use halflight::{FakeSignal, SignalSource};
//! use std::sync::{Arc, Mutex};
//!
//! let signal = FakeSignal::new(false);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut sub = signal.subscribe(Box::new(move |dark| {
//!     sink.lock().unwrap().push(dark);
//! }));
//!
//! signal.set_dark(true);   // flip: fires
//! signal.set_dark(true);   // no flip: silent
//! sub.unsubscribe();
//! signal.set_dark(false);  // unsubscribed: silent
//!
//! assert_eq!(*seen.lock().unwrap(), vec![true]);
//! ```

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use dark_light::{detect as detect_os_scheme, Mode as OsSchemeMode};

/// Listener callback invoked with the new "prefers dark" value.
pub type SignalCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Capability interface for the OS color-scheme signal.
///
/// Read-only: this subsystem never writes the system preference.
pub trait SignalSource: Send + Sync {
    /// One-shot query: does the environment currently prefer dark?
    ///
    /// Returns `None` when the query itself is unavailable (callers
    /// fall back toward light).
    fn read(&self) -> Option<bool>;

    /// Registers a change listener. The callback fires only on an
    /// actual flip reported by the environment, never on `subscribe`
    /// itself. Dropping (or unsubscribing) the returned guard removes
    /// the listener.
    fn subscribe(&self, callback: SignalCallback) -> Subscription;
}

/// Guard for an active signal subscription.
///
/// Unsubscribes on drop. [`unsubscribe`](Subscription::unsubscribe) is
/// idempotent: calling it twice, or after the source itself has been
/// torn down, is a no-op rather than an error.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Removes the listener. Safe to call any number of times.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Returns true if `unsubscribe` has not run yet.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Listener registry shared by the signal source implementations.
#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    map: Mutex<HashMap<u64, Arc<SignalCallback>>>,
}

impl Listeners {
    fn add(self: &Arc<Self>, callback: SignalCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.map.lock().unwrap().insert(id, Arc::new(callback));

        // Weak: unsubscribing after the source is gone must be a no-op.
        let registry: Weak<Listeners> = Arc::downgrade(self);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.map.lock().unwrap().remove(&id);
                }
            })),
        }
    }

    /// Notifies every listener, isolating panics per callback.
    fn notify(&self, dark: bool) {
        // Snapshot outside the lock so a callback can re-enter the
        // source (read, subscribe) without deadlocking.
        let snapshot: Vec<Arc<SignalCallback>> =
            self.map.lock().unwrap().values().cloned().collect();

        for callback in snapshot {
            let _ = catch_unwind(AssertUnwindSafe(|| callback(dark)));
        }
    }

    fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }
}

/// The real OS signal, backed by the `dark-light` crate.
///
/// `read()` queries the OS directly. Change detection is poll-driven:
/// call [`poll`](OsSignal::poll) from the host loop; listeners fire
/// only when the detected mode differs from the previous poll (or from
/// the initial read taken at construction).
pub struct OsSignal {
    listeners: Arc<Listeners>,
    last: Mutex<Option<bool>>,
}

impl OsSignal {
    /// Creates the source and snapshots the current OS mode as the
    /// baseline for flip detection.
    pub fn new() -> Self {
        let source = Self {
            listeners: Arc::new(Listeners::default()),
            last: Mutex::new(None),
        };
        *source.last.lock().unwrap() = source.read();
        source
    }

    /// Re-queries the OS and notifies listeners if the mode flipped
    /// since the last poll. Returns the freshly read value.
    pub fn poll(&self) -> Option<bool> {
        let now = self.read();
        let flipped = {
            let mut last = self.last.lock().unwrap();
            let changed = matches!((now, *last), (Some(n), Some(l)) if n != l);
            if now.is_some() {
                *last = now;
            }
            changed
        };
        if flipped {
            if let Some(dark) = now {
                self.listeners.notify(dark);
            }
        }
        now
    }
}

impl Default for OsSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for OsSignal {
    fn read(&self) -> Option<bool> {
        match detect_os_scheme() {
            OsSchemeMode::Dark => Some(true),
            OsSchemeMode::Light => Some(false),
        }
    }

    fn subscribe(&self, callback: SignalCallback) -> Subscription {
        self.listeners.add(callback)
    }
}

/// Deterministic signal source for tests.
///
/// Clones share the same state, so a test can keep a handle for
/// flipping the signal while the provider owns its own handle.
#[derive(Clone)]
pub struct FakeSignal {
    inner: Arc<FakeSignalInner>,
}

struct FakeSignalInner {
    dark: Mutex<Option<bool>>,
    listeners: Arc<Listeners>,
}

impl FakeSignal {
    /// Creates a signal currently reporting the given mode.
    pub fn new(dark: bool) -> Self {
        Self {
            inner: Arc::new(FakeSignalInner {
                dark: Mutex::new(Some(dark)),
                listeners: Arc::new(Listeners::default()),
            }),
        }
    }

    /// Creates a signal whose query is unavailable: `read()` returns
    /// `None` and no change ever fires.
    pub fn unavailable() -> Self {
        Self {
            inner: Arc::new(FakeSignalInner {
                dark: Mutex::new(None),
                listeners: Arc::new(Listeners::default()),
            }),
        }
    }

    /// Sets the reported mode, firing listeners only on an actual
    /// flip. Listeners run synchronously inside this call, matching
    /// the environment-driven callback model.
    pub fn set_dark(&self, dark: bool) {
        let flipped = {
            let mut current = self.inner.dark.lock().unwrap();
            let changed = *current != Some(dark);
            *current = Some(dark);
            changed
        };
        if flipped {
            self.inner.listeners.notify(dark);
        }
    }

    /// Number of live listeners; lets tests assert the provider's
    /// single-subscription discipline.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl SignalSource for FakeSignal {
    fn read(&self) -> Option<bool> {
        *self.inner.dark.lock().unwrap()
    }

    fn subscribe(&self, callback: SignalCallback) -> Subscription {
        self.inner.listeners.add(callback)
    }
}
