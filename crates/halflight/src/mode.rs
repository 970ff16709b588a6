//! Theme preference and resolved color mode types.
//!
//! Two enums carry the whole data model:
//!
//! - [`Preference`] is the user's stored intent: light, dark, or
//!   "follow the system". It is what gets persisted across sessions.
//! - [`ColorMode`] is the concrete, displayable value after applying
//!   the preference against the current system signal. It has only
//!   two variants, so a "system" value cannot leak into anything that
//!   consumes a resolved mode.
//!
//! The [`resolve`] function is the single place the two meet. It is
//! pure: no storage, no OS query, no marker writes.
//!
//! # Example
//!
//! ```rust
//! use halflight::{resolve, ColorMode, Preference};
//!
//! // Explicit preferences ignore the system signal entirely.
//! assert_eq!(resolve(Preference::Light, true), ColorMode::Light);
//!
//! // "Follow system" defers to the live signal at evaluation time.
//! assert_eq!(resolve(Preference::System, true), ColorMode::Dark);
//! assert_eq!(resolve(Preference::System, false), ColorMode::Light);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete, displayable color mode.
///
/// This is the output side of the mechanism: always `Light` or `Dark`,
/// never "system". Downstream styling keys off this value (directly or
/// through the root marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light mode (light background, dark text).
    Light,
    /// Dark mode (dark background, light text).
    Dark,
}

impl ColorMode {
    /// Returns the canonical lowercase name, matching the serde wire
    /// form and the root marker value.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's stored theme intent.
///
/// `System` means "defer to the operating system's live color-scheme
/// signal"; it is a valid preference but never a valid resolved value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    /// Always light, regardless of the system signal.
    Light,
    /// Always dark, regardless of the system signal.
    Dark,
    /// Follow the system signal (the default when nothing is stored).
    #[default]
    System,
}

impl Preference {
    /// Parses a canonical slot value. Returns `None` for anything that
    /// is not exactly `"light"`, `"dark"`, or `"system"` (after
    /// trimming surrounding whitespace).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Preference::Light),
            "dark" => Some(Preference::Dark),
            "system" => Some(Preference::System),
            _ => None,
        }
    }

    /// Normalizes an optional/untrusted stored value.
    ///
    /// Absent or malformed input is treated as "no stored preference"
    /// and becomes [`Preference::System`]. This is total: there is no
    /// input for which it fails.
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(Preference::parse).unwrap_or_default()
    }

    /// Returns the canonical lowercase name, matching the serde wire
    /// form and the persisted slot value.
    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Light => "light",
            Preference::Dark => "dark",
            Preference::System => "system",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a preference against the live system signal.
///
/// Explicit preferences win unconditionally; `System` defers entirely
/// to `system_dark` at the moment of the call — not to a snapshot
/// taken when the preference was set.
pub fn resolve(preference: Preference, system_dark: bool) -> ColorMode {
    match preference {
        Preference::Light => ColorMode::Light,
        Preference::Dark => ColorMode::Dark,
        Preference::System => {
            if system_dark {
                ColorMode::Dark
            } else {
                ColorMode::Light
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_explicit_ignores_signal() {
        for signal in [false, true] {
            assert_eq!(resolve(Preference::Light, signal), ColorMode::Light);
            assert_eq!(resolve(Preference::Dark, signal), ColorMode::Dark);
        }
    }

    #[test]
    fn test_resolve_system_follows_signal() {
        assert_eq!(resolve(Preference::System, true), ColorMode::Dark);
        assert_eq!(resolve(Preference::System, false), ColorMode::Light);
    }

    #[test]
    fn test_parse_canonical_values() {
        assert_eq!(Preference::parse("light"), Some(Preference::Light));
        assert_eq!(Preference::parse("dark"), Some(Preference::Dark));
        assert_eq!(Preference::parse("system"), Some(Preference::System));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Preference::parse(" dark\n"), Some(Preference::Dark));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Preference::parse(""), None);
        assert_eq!(Preference::parse("DARK"), None);
        assert_eq!(Preference::parse("darkish"), None);
        assert_eq!(Preference::parse("auto"), None);
    }

    #[test]
    fn test_normalize_defaults_to_system() {
        assert_eq!(Preference::normalize(None), Preference::System);
        assert_eq!(Preference::normalize(Some("")), Preference::System);
        assert_eq!(Preference::normalize(Some("banana")), Preference::System);
        assert_eq!(Preference::normalize(Some("dark")), Preference::Dark);
    }

    #[test]
    fn test_display_matches_slot_values() {
        assert_eq!(Preference::Light.to_string(), "light");
        assert_eq!(Preference::System.to_string(), "system");
        assert_eq!(ColorMode::Dark.to_string(), "dark");
    }

    #[test]
    fn test_serde_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Preference::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&ColorMode::Light).unwrap(), "\"light\"");
        let p: Preference = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(p, Preference::Dark);
    }

    proptest! {
        // Normalization must be total: arbitrary slot contents either
        // parse to a canonical value or fall back to System.
        #[test]
        fn normalize_never_panics(raw in ".*") {
            let pref = Preference::normalize(Some(&raw));
            prop_assert!(matches!(
                pref,
                Preference::Light | Preference::Dark | Preference::System
            ));
        }

        // Canonical names round-trip through normalization.
        #[test]
        fn canonical_names_round_trip(
            pref in prop_oneof![
                Just(Preference::Light),
                Just(Preference::Dark),
                Just(Preference::System),
            ]
        ) {
            prop_assert_eq!(Preference::normalize(Some(pref.as_str())), pref);
        }
    }
}
