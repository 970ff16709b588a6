//! End-to-end tests for the startup-guard / provider handshake.
//!
//! The central correctness property: for identical persisted and
//! system inputs, the marker applied by the startup guard equals the
//! first marker applied by the provider after attach. That equality is
//! what makes the handoff invisible — the provider's mount re-applies
//! the value the guard already published.

use std::sync::Arc;

use tempfile::TempDir;

use halflight::{
    boot, ColorMode, FakeSignal, FilePreferenceStore, MarkerSink, MemoryMarker, Preference,
    SignalSource, ThemeProvider,
};

/// Builds a slot file (or leaves it absent) inside a fresh temp dir.
fn slot_with(contents: Option<&str>) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let slot = dir.path().join("theme");
    if let Some(contents) = contents {
        std::fs::write(&slot, contents).unwrap();
    }
    (dir, slot)
}

fn attached_provider(
    slot: &std::path::Path,
    signal: &FakeSignal,
    marker: &MemoryMarker,
) -> ThemeProvider {
    let mut provider = ThemeProvider::new(
        Box::new(FilePreferenceStore::new(slot)),
        Arc::new(signal.clone()),
        Box::new(marker.clone()),
    );
    provider.attach();
    provider
}

// ============================================================================
// Guard / provider parity matrix
// ============================================================================

#[test]
fn test_guard_and_provider_agree_for_every_input_combination() {
    let stored_cases: [Option<&str>; 5] =
        [None, Some("light"), Some("dark"), Some("system"), Some("corrupted!")];
    let signal_cases = [
        FakeSignal::new(true),
        FakeSignal::new(false),
        FakeSignal::unavailable(),
    ];

    for stored in stored_cases {
        for signal in &signal_cases {
            let (_dir, slot) = slot_with(stored);

            let guard_marker = MemoryMarker::new();
            let guard_mode = boot::apply_startup_marker(&slot, signal, &guard_marker);

            let provider_marker = MemoryMarker::new();
            let provider = attached_provider(&slot, signal, &provider_marker);

            assert_eq!(
                guard_marker.current(),
                provider_marker.current(),
                "marker mismatch for stored={stored:?}, signal={:?}",
                signal.read(),
            );
            assert_eq!(guard_mode, provider.resolved());
        }
    }
}

#[test]
fn test_no_persisted_value_dark_signal_marker_unchanged_across_attach() {
    let (_dir, slot) = slot_with(None);
    let signal = FakeSignal::new(true);
    let marker = MemoryMarker::new();

    // Guard paints dark...
    let mode = boot::apply_startup_marker(&slot, &signal, &marker);
    assert_eq!(mode, ColorMode::Dark);

    // ...provider attaches into the same sink: defaults to System,
    // resolves to dark, marker value unchanged.
    let provider = attached_provider(&slot, &signal, &marker);
    assert_eq!(provider.preference(), Preference::System);
    assert_eq!(provider.resolved(), ColorMode::Dark);
    assert_eq!(marker.history(), vec![ColorMode::Dark, ColorMode::Dark]);
}

// ============================================================================
// Lifecycle scenarios over the real file store
// ============================================================================

#[test]
fn test_stored_light_overrides_dark_signal() {
    let (_dir, slot) = slot_with(Some("light"));
    let signal = FakeSignal::new(true);
    let marker = MemoryMarker::new();

    let provider = attached_provider(&slot, &signal, &marker);

    assert_eq!(provider.resolved(), ColorMode::Light);
    assert_eq!(marker.current(), Some(ColorMode::Light));
}

#[test]
fn test_set_round_trips_through_the_slot_file() {
    let (_dir, slot) = slot_with(Some("system"));
    let signal = FakeSignal::new(false);
    let marker = MemoryMarker::new();

    let provider = attached_provider(&slot, &signal, &marker);
    provider.set_preference(Preference::Dark);

    // Durable: a fresh read of the record returns the new value, and
    // the resolved mode flipped despite the light signal.
    assert_eq!(std::fs::read_to_string(&slot).unwrap(), "dark");
    assert_eq!(provider.resolved(), ColorMode::Dark);

    // A second session boots straight into the choice.
    let marker2 = MemoryMarker::new();
    let provider2 = attached_provider(&slot, &signal, &marker2);
    assert_eq!(provider2.preference(), Preference::Dark);
    assert_eq!(provider2.resolved(), ColorMode::Dark);
}

#[test]
fn test_live_flip_re_resolves_without_a_set_call() {
    let (_dir, slot) = slot_with(None);
    let signal = FakeSignal::new(true);
    let marker = MemoryMarker::new();

    let provider = attached_provider(&slot, &signal, &marker);
    assert_eq!(provider.resolved(), ColorMode::Dark);

    signal.set_dark(false);

    assert_eq!(provider.resolved(), ColorMode::Light);
    assert_eq!(marker.current(), Some(ColorMode::Light));
}

#[test]
fn test_unsubscribed_provider_ignores_flips_without_error() {
    let (_dir, slot) = slot_with(None);
    let signal = FakeSignal::new(true);
    let marker = MemoryMarker::new();

    let mut provider = attached_provider(&slot, &signal, &marker);
    provider.detach();
    let applies_before = marker.apply_count();

    signal.set_dark(false);

    assert_eq!(marker.apply_count(), applies_before);
    assert_eq!(marker.current(), Some(ColorMode::Dark));
}

#[test]
fn test_corrupted_slot_degrades_to_system_not_an_error() {
    let (_dir, slot) = slot_with(Some("\u{0}binary junk\u{7f}"));
    let signal = FakeSignal::new(true);
    let marker = MemoryMarker::new();

    let provider = attached_provider(&slot, &signal, &marker);

    assert_eq!(provider.preference(), Preference::System);
    assert_eq!(provider.resolved(), ColorMode::Dark);
}

#[test]
fn test_last_writer_wins_on_a_shared_slot() {
    // Two "browsing contexts" sharing one slot: no locking, the later
    // write simply wins. Intended behavior for a display preference.
    let (_dir, slot) = slot_with(None);
    let signal = FakeSignal::new(false);

    let provider_a = attached_provider(&slot, &signal, &MemoryMarker::new());
    let provider_b = attached_provider(&slot, &signal, &MemoryMarker::new());

    provider_a.set_preference(Preference::Dark);
    provider_b.set_preference(Preference::Light);

    assert_eq!(std::fs::read_to_string(&slot).unwrap(), "light");
}
