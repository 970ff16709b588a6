//! The stateful theme provider.
//!
//! [`ThemeProvider`] is the constructible context object at the heart
//! of the mechanism: it owns the persisted slot, the system signal
//! subscription, and the marker sink, and keeps the invariant
//!
//! ```text
//! resolved = preference            when preference != system
//!          = signal ? dark : light otherwise
//! ```
//!
//! true at every observable moment between [`attach`](ThemeProvider::attach)
//! and teardown.
//!
//! # Lifecycle
//!
//! - `new` wires the collaborators and derives an initial in-memory
//!   state, without touching the marker or the signal subscription.
//! - `attach` re-derives preference and resolved mode from storage and
//!   the live signal, applies the marker, and takes exclusive
//!   ownership of a single live subscription. For identical inputs
//!   this produces the same marker the startup guard already applied,
//!   which is the no-flicker property. Re-attaching fully releases the
//!   old subscription before creating the new one.
//! - `detach` (and `Drop`) release the subscription; the marker keeps
//!   its last value.
//!
//! # Signal callbacks
//!
//! The subscription callback always records the new signal value, but
//! re-resolves and re-applies the marker only while the active
//! preference is `System`. An explicit choice thus masks the signal
//! without tearing the subscription down: switching back to `System`
//! later observes the then-current value with no resubscribe.
//!
//! # Example
//!
//! ```rust
//! use halflight::{
//!     FakeSignal, MarkerSink, MemoryMarker, MemoryPreferenceStore, ColorMode, Preference,
//!     ThemeProvider,
//! };
//!
//! let signal = FakeSignal::new(true);
//! let marker = MemoryMarker::new();
//! let mut provider = ThemeProvider::new(
//!     Box::new(MemoryPreferenceStore::new()),
//!     std::sync::Arc::new(signal.clone()),
//!     Box::new(marker.clone()),
//! );
//! provider.attach();
//!
//! // Nothing stored: follow the system, which reports dark.
//! assert_eq!(provider.preference(), Preference::System);
//! assert_eq!(provider.resolved(), ColorMode::Dark);
//!
//! // The OS flips to light: re-resolved without any set call.
//! signal.set_dark(false);
//! assert_eq!(provider.resolved(), ColorMode::Light);
//! assert_eq!(marker.current(), Some(ColorMode::Light));
//! ```

use std::sync::{Arc, Mutex};

use crate::marker::MarkerSink;
use crate::mode::{resolve, ColorMode, Preference};
use crate::signal::{SignalSource, Subscription};
use crate::store::PreferenceStore;

/// State shared between the provider handle and its signal callback.
struct Shared {
    store: Box<dyn PreferenceStore>,
    marker: Box<dyn MarkerSink>,
    preference: Preference,
    system_dark: bool,
    resolved: ColorMode,
}

impl Shared {
    fn re_resolve(&mut self) {
        self.resolved = resolve(self.preference, self.system_dark);
    }
}

/// Stateful provider reconciling preference, system signal, and marker.
pub struct ThemeProvider {
    shared: Arc<Mutex<Shared>>,
    signal: Arc<dyn SignalSource>,
    subscription: Option<Subscription>,
}

impl ThemeProvider {
    /// Wires the provider to its collaborators and derives the initial
    /// in-memory state (stored preference, or `System` when the slot
    /// is absent or malformed; signal read, falling back to light).
    ///
    /// No marker is applied and no subscription is taken until
    /// [`attach`](Self::attach).
    pub fn new(
        store: Box<dyn PreferenceStore>,
        signal: Arc<dyn SignalSource>,
        marker: Box<dyn MarkerSink>,
    ) -> Self {
        let preference = store.load().unwrap_or_default();
        let system_dark = signal.read().unwrap_or(false);
        let resolved = resolve(preference, system_dark);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                store,
                marker,
                preference,
                system_dark,
                resolved,
            })),
            signal,
            subscription: None,
        }
    }

    /// Mounts the provider: re-derives state from storage and the live
    /// signal, applies the marker, and subscribes to signal changes.
    ///
    /// Idempotent in effect; a prior subscription is fully released
    /// before the new one is created, so at most one is ever live.
    pub fn attach(&mut self) {
        self.detach();

        {
            let mut shared = self.shared.lock().unwrap();
            shared.preference = shared.store.load().unwrap_or_default();
            shared.system_dark = self.signal.read().unwrap_or(false);
            shared.re_resolve();
            let mode = shared.resolved;
            shared.marker.apply(mode);
        }

        let shared = Arc::clone(&self.shared);
        self.subscription = Some(self.signal.subscribe(Box::new(move |dark| {
            let mut shared = shared.lock().unwrap();
            // Record the value unconditionally so a later switch back
            // to System observes the current signal; only re-resolve
            // while System is the active preference.
            shared.system_dark = dark;
            if shared.preference == Preference::System {
                shared.re_resolve();
                let mode = shared.resolved;
                shared.marker.apply(mode);
            }
        })));
    }

    /// Unmounts the provider, releasing the signal subscription. The
    /// marker keeps its last applied value.
    pub fn detach(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// True while a signal subscription is live.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// The current in-memory preference.
    pub fn preference(&self) -> Preference {
        self.shared.lock().unwrap().preference
    }

    /// The current resolved mode, in sync with the latest
    /// [`set_preference`](Self::set_preference) or signal change.
    pub fn resolved(&self) -> ColorMode {
        self.shared.lock().unwrap().resolved
    }

    /// Applies an explicit user choice: persists it, re-resolves
    /// against the live signal, and re-applies the marker.
    ///
    /// A storage write failure (restricted environment) is swallowed:
    /// the in-memory state and the marker still update, the choice
    /// just won't survive a restart. Nothing here is user-visible or
    /// fatal.
    pub fn set_preference(&self, preference: Preference) {
        let mut shared = self.shared.lock().unwrap();
        let _ = shared.store.save(preference);
        shared.preference = preference;
        if let Some(dark) = self.signal.read() {
            shared.system_dark = dark;
        }
        shared.re_resolve();
        let mode = shared.resolved;
        shared.marker.apply(mode);
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.lock().unwrap();
        f.debug_struct("ThemeProvider")
            .field("preference", &shared.preference)
            .field("resolved", &shared.resolved)
            .field("attached", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}
