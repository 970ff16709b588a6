//! Startup guard: correct marker before the provider exists.
//!
//! The first paint must already show the right mode, and at that point
//! no provider, no subscription, and no in-memory state exist yet.
//! This module is the terminal-app analogue of an inline pre-runtime
//! script: a minimal routine the host calls first thing, before
//! constructing a [`ThemeProvider`](crate::ThemeProvider).
//!
//! It reads the persisted slot directly (bypassing the store types),
//! takes a one-shot signal read with no subscription, and applies the
//! marker through the same mutually-exclusive discipline as the
//! provider. The fallback chain is persisted → system → light, and no
//! step can raise: unreadable storage and unavailable signals both
//! degrade toward light.
//!
//! The resolution logic here is deliberately standalone rather than
//! shared with the provider's resolver — there is no shared runtime
//! state at this point, and the equivalence of the two paths is pinned
//! by the integration test matrix instead.

use std::path::Path;

use crate::marker::{MarkerSink, ProcessMarker};
use crate::mode::ColorMode;
use crate::signal::{OsSignal, SignalSource};

/// The pure startup fallback chain: persisted → system → light.
///
/// `stored` is the raw slot content (or `None` when unreadable);
/// `system_dark` is the one-shot signal read (or `None` when the query
/// is unavailable). Total: every input combination yields a concrete
/// mode.
pub fn startup_mode(stored: Option<&str>, system_dark: Option<bool>) -> ColorMode {
    match stored.map(str::trim) {
        Some("light") => ColorMode::Light,
        Some("dark") => ColorMode::Dark,
        // "system", absent, or malformed: defer to the signal,
        // defaulting the chain toward light.
        _ => match system_dark {
            Some(true) => ColorMode::Dark,
            Some(false) | None => ColorMode::Light,
        },
    }
}

/// Computes and applies the startup marker. Never raises.
///
/// Reads the slot file directly with plain `std::fs`; any read failure
/// is treated as "nothing stored". Returns the applied mode so hosts
/// can use it for their first frame.
pub fn apply_startup_marker(
    slot: &Path,
    signal: &dyn SignalSource,
    marker: &dyn MarkerSink,
) -> ColorMode {
    let stored = std::fs::read_to_string(slot).ok();
    let mode = startup_mode(stored.as_deref(), signal.read());
    marker.apply(mode);
    mode
}

/// Convenience wiring for hosts: OS signal, process-global marker.
///
/// Call once, synchronously, before any styling happens and before the
/// provider is constructed.
pub fn startup(slot: &Path) -> ColorMode {
    apply_startup_marker(slot, &OsSignal::new(), &ProcessMarker::new())
}
