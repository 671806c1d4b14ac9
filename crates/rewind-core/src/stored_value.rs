/// A single value mirrored to a key-value store as JSON.
///
/// The in-memory value is always authoritative for the owner. Store reads
/// and writes are best-effort: every failure is logged and absorbed, so a
/// broken or full store degrades the mirror to in-memory only.
use std::sync::Arc;

use anyhow::{Context, Result};
use rewind_config::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::subscription::{Listeners, Subscription};
use crate::update::Update;

/// Owned state bound to one store key.
pub struct StoredValue<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    /// Value restored by [`StoredValue::remove`] and on absent entries.
    initial: T,
    value: T,
    listeners: Listeners<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for StoredValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredValue")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<T> StoredValue<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + 'static,
{
    /// Binds `key` in `store`, starting from the stored value if one can be
    /// read and decoded, otherwise from `initial`.
    pub fn open(store: Arc<dyn KeyValueStore>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = match read_entry::<T>(store.as_ref(), &key) {
            Ok(Some(value)) => value,
            Ok(None) => initial.clone(),
            Err(e) => {
                tracing::warn!("Failed to read stored value '{key}': {e:#}");
                initial.clone()
            }
        };
        Self {
            store,
            key,
            initial,
            value,
            listeners: Listeners::new(),
        }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store key this value is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Applies `update`, adopts the result, then writes it to the store.
    pub fn set(&mut self, update: impl Into<Update<T>>) {
        self.value = update.into().apply(&self.value);
        self.write();
        self.listeners.notify(&self.value);
    }

    /// Removes the stored entry and resets to the initial value.
    pub fn remove(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!("Failed to remove stored value '{}': {e:#}", self.key);
        }
        self.value = self.initial.clone();
        self.listeners.notify(&self.value);
    }

    /// Re-reads the entry after it may have changed elsewhere.
    ///
    /// An absent entry resets to the initial value; an unreadable one keeps
    /// the current value. Returns whether the value changed.
    pub fn sync(&mut self) -> bool {
        let next = match read_entry::<T>(self.store.as_ref(), &self.key) {
            Ok(Some(value)) => value,
            Ok(None) => self.initial.clone(),
            Err(e) => {
                tracing::warn!("Failed to sync stored value '{}': {e:#}", self.key);
                return false;
            }
        };
        if next == self.value {
            return false;
        }
        self.value = next;
        self.listeners.notify(&self.value);
        true
    }

    /// Registers a callback invoked with the new value after each change.
    pub fn subscribe(&mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(callback)
    }

    fn write(&self) {
        let json = match serde_json::to_string(&self.value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize stored value '{}': {e:#}", self.key);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &json) {
            tracing::warn!("Failed to write stored value '{}': {e:#}", self.key);
        }
    }
}

/// Reads and decodes one entry. Empty entries count as absent.
fn read_entry<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let raw = store
        .get(key)
        .with_context(|| format!("Failed to read '{key}'"))?;
    match raw {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
            .map(Some)
            .with_context(|| format!("Stored value '{key}' is not valid JSON for this type")),
        _ => Ok(None),
    }
}
