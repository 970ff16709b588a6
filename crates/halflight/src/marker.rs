//! Root marker synchronization.
//!
//! The resolved color mode is published as a single observable marker
//! that downstream styling keys off — the terminal-app analogue of a
//! class on a document root. The marker slot holds exactly one of two
//! mutually exclusive values at a time; applying a value replaces any
//! prior one atomically, and applying the same value twice is a plain
//! idempotent overwrite, not a toggle.
//!
//! [`ProcessMarker`] writes the process-global slot read by
//! [`root_marker`]. [`MemoryMarker`] is a test double that records
//! every application so tests can assert write patterns, not just the
//! final value.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::mode::ColorMode;

/// Capability for publishing the resolved mode.
pub trait MarkerSink: Send + Sync {
    /// Publishes `mode`, replacing any previously applied value.
    /// Mutually exclusive by construction: the slot can never carry
    /// both values, and re-applying the current value is a no-op
    /// observable effect.
    fn apply(&self, mode: ColorMode);

    /// Reads back the currently applied marker, if any has been
    /// applied yet.
    fn current(&self) -> Option<ColorMode>;
}

static ROOT_MARKER: Lazy<Mutex<Option<ColorMode>>> = Lazy::new(|| Mutex::new(None));

/// Returns the process-global root marker.
///
/// `None` only before the startup guard (or a provider) has run;
/// afterwards always one of the two concrete modes. This is the
/// read-side consumed by styling code.
pub fn root_marker() -> Option<ColorMode> {
    *ROOT_MARKER.lock().unwrap()
}

/// Marker sink writing the process-global root slot.
///
/// All `ProcessMarker` instances share the one slot — there is one
/// "document root" per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMarker;

impl ProcessMarker {
    /// Creates the sink.
    pub fn new() -> Self {
        Self
    }
}

impl MarkerSink for ProcessMarker {
    fn apply(&self, mode: ColorMode) {
        *ROOT_MARKER.lock().unwrap() = Some(mode);
    }

    fn current(&self) -> Option<ColorMode> {
        root_marker()
    }
}

/// Recording marker sink for tests.
///
/// Clones share the same slot and history, so a test can hand the sink
/// to a provider and still inspect it.
#[derive(Debug, Clone, Default)]
pub struct MemoryMarker {
    applied: Arc<Mutex<Vec<ColorMode>>>,
}

impl MemoryMarker {
    /// Creates an empty marker slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value ever applied, in order.
    pub fn history(&self) -> Vec<ColorMode> {
        self.applied.lock().unwrap().clone()
    }

    /// Number of `apply` calls so far.
    pub fn apply_count(&self) -> usize {
        self.applied.lock().unwrap().len()
    }
}

impl MarkerSink for MemoryMarker {
    fn apply(&self, mode: ColorMode) {
        self.applied.lock().unwrap().push(mode);
    }

    fn current(&self) -> Option<ColorMode> {
        self.applied.lock().unwrap().last().copied()
    }
}
