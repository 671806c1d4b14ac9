/// Persisted-entry codec and the gated writer for one history key.
///
/// A timeline is stored as a single JSON object under its key:
/// `{"past": [..], "present": .., "future": [..]}`. Reading validates the
/// shape before decoding; anything else is treated as no prior state.
use std::sync::Arc;

use anyhow::{anyhow, ensure, Context, Result};
use rewind_config::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::timeline::Timeline;

/// Serializes a timeline into its stored form.
///
/// # Errors
///
/// Returns an error if a value cannot be represented as JSON.
pub fn encode<T: Serialize>(timeline: &Timeline<T>) -> Result<String> {
    serde_json::to_string(timeline).context("Failed to serialize history")
}

/// Parses a stored entry.
///
/// `past` and `future` must be arrays and `present` must be present;
/// extra fields are ignored.
///
/// # Errors
///
/// Returns an error if the entry is not JSON, has the wrong shape, or its
/// values do not decode as `T`.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<Timeline<T>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("Persisted history is not valid JSON")?;
    {
        let obj = value
            .as_object()
            .ok_or_else(|| anyhow!("Persisted history is not an object"))?;
        ensure!(
            obj.get("past").is_some_and(serde_json::Value::is_array),
            "Persisted history has no 'past' array"
        );
        ensure!(
            obj.get("future").is_some_and(serde_json::Value::is_array),
            "Persisted history has no 'future' array"
        );
        ensure!(
            obj.contains_key("present"),
            "Persisted history has no 'present' value"
        );
    }
    serde_json::from_value(value).context("Persisted history values do not match the value type")
}

/// Best-effort mirror of one timeline to a key-value store.
///
/// Writes stay suppressed until the stored entry has actually been read
/// (found, absent, or malformed), so a default timeline never overwrites a
/// stored one that has not been seen yet. A failed read leaves the gate
/// closed. Every store failure is logged and absorbed.
pub struct PersistenceLayer {
    store: Arc<dyn KeyValueStore>,
    key: String,
    /// Gate: set once the stored entry has been read.
    loaded: bool,
    /// Whether the last load attempt could not read the store.
    read_failed: bool,
    /// Whether a write was suppressed while the gate was closed.
    pending: bool,
}

impl std::fmt::Debug for PersistenceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceLayer")
            .field("key", &self.key)
            .field("loaded", &self.loaded)
            .field("read_failed", &self.read_failed)
            .field("pending", &self.pending)
            .finish()
    }
}

impl PersistenceLayer {
    /// Creates a layer for `key` with the gate closed.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            loaded: false,
            read_failed: false,
            pending: false,
        }
    }

    /// Store key of this timeline.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the stored entry has been read.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether a load was attempted and failed to read the store, so it
    /// should be retried before the next change.
    pub fn needs_retry(&self) -> bool {
        !self.loaded && self.read_failed
    }

    /// Reads the stored timeline and opens the gate.
    ///
    /// Returns `None` when nothing usable is stored. If the store cannot be
    /// read the gate stays closed; check [`PersistenceLayer::is_loaded`].
    pub fn load<T: DeserializeOwned>(&mut self) -> Option<Timeline<T>> {
        let restored = match self.store.get(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => match decode(&raw) {
                Ok(timeline) => Some(timeline),
                Err(e) => {
                    tracing::warn!("Discarding persisted history '{}': {e:#}", self.key);
                    None
                }
            },
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to load history '{}': {e:#}", self.key);
                self.read_failed = true;
                return None;
            }
        };
        self.loaded = true;
        self.read_failed = false;
        restored
    }

    /// Writes `timeline`, or records it as pending while the gate is closed.
    pub fn save<T: Serialize>(&mut self, timeline: &Timeline<T>) {
        if !self.loaded {
            tracing::debug!("Suppressing write to '{}' until history is loaded", self.key);
            self.pending = true;
            return;
        }
        let written = encode(timeline).and_then(|json| self.store.set(&self.key, &json));
        match written {
            Ok(()) => self.pending = false,
            Err(e) => tracing::warn!("Failed to persist history '{}': {e:#}", self.key),
        }
    }

    /// Deletes the stored entry.
    pub fn remove(&mut self) {
        self.pending = false;
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!("Failed to remove persisted history '{}': {e:#}", self.key);
        }
    }

    /// Returns and clears the suppressed-write flag.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
