//! # Halflight - Flicker-Free Theme Preference Management
//!
//! Halflight reconciles four things that all claim a say in whether an
//! application renders light or dark:
//!
//! - the user's stored preference (light, dark, or "follow system"),
//! - the operating system's live color-scheme signal, which can flip
//!   at any moment while the application runs,
//! - a value persisted across sessions, and
//! - the requirement that the very first paint already shows the
//!   correct mode, before any provider state exists.
//!
//! It publishes exactly one authoritative output: a resolved
//! [`ColorMode`] (never "system"), mirrored into a single root marker
//! that downstream styling keys off.
//!
//! ## The pieces
//!
//! - [`Preference`] / [`ColorMode`] / [`resolve`]: the data model and
//!   the pure resolution policy.
//! - [`PreferenceStore`] / [`FilePreferenceStore`]: the single
//!   persisted slot, written only on explicit user choices.
//! - [`SignalSource`] / [`OsSignal`]: the OS signal as a capability —
//!   one-shot `read()` plus `subscribe()` with a [`Subscription`]
//!   guard.
//! - [`MarkerSink`] / [`ProcessMarker`] / [`root_marker`]: the
//!   mutually-exclusive root marker.
//! - [`ThemeProvider`]: the stateful provider owning the subscription
//!   for its mounted lifetime.
//! - [`boot`]: the startup guard that applies the correct marker
//!   before the provider is constructed, so mounting the provider
//!   re-applies the same value and nothing visibly changes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use halflight::{boot, FilePreferenceStore, OsSignal, Preference, ProcessMarker, ThemeProvider};
//!
//! let slot = Path::new("app-state/theme");
//!
//! // First thing at startup, before any styling: correct first paint.
//! let initial = boot::startup(slot);
//! println!("painting {initial} from the start");
//!
//! // Once the app's runtime is up, mount the provider.
//! let mut provider = ThemeProvider::new(
//!     Box::new(FilePreferenceStore::new(slot)),
//!     Arc::new(OsSignal::new()),
//!     Box::new(ProcessMarker::new()),
//! );
//! provider.attach(); // same marker the guard applied: no flicker
//!
//! // Explicit user choice: persisted, re-resolved, re-applied.
//! provider.set_preference(Preference::Dark);
//! assert_eq!(halflight::root_marker(), Some(halflight::ColorMode::Dark));
//! ```
//!
//! ## Testing your integration
//!
//! Every environment touchpoint is a capability trait with a shipped
//! test double: [`MemoryPreferenceStore`], [`FakeSignal`] (including
//! an `unavailable()` mode), and [`MemoryMarker`] (which records every
//! application). No test needs a real OS signal or a real home
//! directory.

pub mod boot;
mod marker;
mod mode;
mod provider;
mod signal;
mod store;

pub use marker::{root_marker, MarkerSink, MemoryMarker, ProcessMarker};
pub use mode::{resolve, ColorMode, Preference};
pub use provider::ThemeProvider;
pub use signal::{FakeSignal, OsSignal, SignalCallback, SignalSource, Subscription};
pub use store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, StoreError};
