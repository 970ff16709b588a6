//! Persisted preference slot.
//!
//! The mechanism persists exactly one value: the last explicitly
//! chosen [`Preference`]. The [`PreferenceStore`] trait abstracts
//! where that value lives so the provider can be tested without
//! touching the filesystem.
//!
//! Two implementations ship:
//!
//! - [`FilePreferenceStore`]: one file holding one lowercase value
//!   (`light`, `dark`, or `system`). This is the production store.
//! - [`MemoryPreferenceStore`]: a cloneable shared cell for tests.
//!
//! # Failure policy
//!
//! Reads never fail: an unreadable or malformed slot is simply "no
//! stored preference" and the caller falls back to
//! [`Preference::System`]. Writes report [`StoreError`] so callers can
//! decide; the provider swallows write failures by contract (a
//! restricted environment must not break theme switching for the
//! running session).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::mode::Preference;

/// Error type for preference slot writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot file (or a parent directory) could not be written.
    #[error("failed to persist preference to \"{path}\": {message}")]
    Write {
        /// Path of the slot that failed.
        path: PathBuf,
        /// Underlying IO error message.
        message: String,
    },
}

/// Storage capability for the single preference slot.
pub trait PreferenceStore: Send {
    /// Reads the stored preference.
    ///
    /// Returns `None` when the slot is absent, unreadable, or holds a
    /// malformed value. Never errors: every failure mode degrades to
    /// "nothing stored".
    fn load(&self) -> Option<Preference>;

    /// Writes the preference durably.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot cannot be written (e.g. a
    /// read-only or restricted environment).
    fn save(&mut self, preference: Preference) -> Result<(), StoreError>;
}

/// File-backed preference slot: one file, one value.
///
/// The file contains the canonical lowercase name of the preference
/// and nothing else. Concurrent processes sharing the same slot race
/// with last-writer-wins semantics; the value is a low-stakes display
/// preference, so no locking is applied.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Creates a store backed by the given slot path. The file need
    /// not exist yet; it is created on first [`save`](PreferenceStore::save).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the slot path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<Preference> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        Preference::parse(&raw)
    }

    fn save(&mut self, preference: Preference) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                    path: self.path.clone(),
                    message: e.to_string(),
                })?;
            }
        }
        std::fs::write(&self.path, preference.as_str()).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

/// In-memory preference slot for tests.
///
/// Clones share the same cell, so a test can keep a handle while the
/// provider owns the store, then inspect what was persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    cell: Arc<Mutex<Option<Preference>>>,
}

impl MemoryPreferenceStore {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot pre-seeded with a value.
    pub fn with_value(preference: Preference) -> Self {
        let store = Self::new();
        *store.cell.lock().unwrap() = Some(preference);
        store
    }

    /// Returns the currently stored value, if any.
    pub fn stored(&self) -> Option<Preference> {
        *self.cell.lock().unwrap()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<Preference> {
        self.stored()
    }

    fn save(&mut self, preference: Preference) -> Result<(), StoreError> {
        *self.cell.lock().unwrap() = Some(preference);
        Ok(())
    }
}
