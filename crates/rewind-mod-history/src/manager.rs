/// Undo/redo manager with optional best-effort persistence.
///
/// The manager owns a [`Timeline`] and is the only thing that mutates it.
/// When a store is attached, every effective mutation is mirrored under the
/// configured key once the initial load has happened; store failures never
/// reach the caller.
use std::collections::VecDeque;
use std::sync::Arc;

use rewind_config::KeyValueStore;
use rewind_core::{Listeners, Subscription, Update};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::HistoryConfig;
use crate::persistence::PersistenceLayer;
use crate::timeline::Timeline;

/// Manages the undo/redo timeline for a single value.
///
/// Values must be serializable even for in-memory use so that the same
/// type works with and without a store.
pub struct HistoryManager<T> {
    timeline: Timeline<T>,
    /// Construction-time value restored by [`HistoryManager::clear`].
    initial: T,
    config: HistoryConfig,
    /// Optional store mirror (None = in-memory only).
    persistence: Option<PersistenceLayer>,
    listeners: Listeners<Timeline<T>>,
}

impl<T> std::fmt::Debug for HistoryManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("past_len", &self.timeline.past.len())
            .field("future_len", &self.timeline.future.len())
            .field("config", &self.config)
            .field("persistence", &self.persistence)
            .finish()
    }
}

impl<T> HistoryManager<T>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
{
    /// Creates an in-memory manager with default config.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    /// Creates an in-memory manager.
    pub fn with_config(initial: T, config: HistoryConfig) -> Self {
        Self {
            timeline: Timeline::new(initial.clone()),
            initial,
            config,
            persistence: None,
            listeners: Listeners::new(),
        }
    }

    /// Creates a persisted manager and restores it immediately.
    ///
    /// A valid stored timeline under `config.key` replaces `initial` as the
    /// starting state. Absent or malformed entries are ignored.
    pub fn with_store(initial: T, store: Arc<dyn KeyValueStore>, config: HistoryConfig) -> Self {
        let mut manager = Self::deferred(initial, store, config);
        manager.hydrate();
        manager
    }

    /// Creates a persisted manager whose restore happens later, via
    /// [`HistoryManager::hydrate`].
    ///
    /// Until then mutations apply in memory but nothing is written.
    pub fn deferred(initial: T, store: Arc<dyn KeyValueStore>, config: HistoryConfig) -> Self {
        let persistence = PersistenceLayer::new(store, config.key.clone());
        Self {
            timeline: Timeline::new(initial.clone()),
            initial,
            config,
            persistence: Some(persistence),
            listeners: Listeners::new(),
        }
    }

    /// Performs the initial load and opens the write gate.
    ///
    /// A valid stored timeline replaces the current one and `true` is
    /// returned. Otherwise the current timeline is kept, and written if it
    /// was mutated before this call. If the store cannot be read the gate
    /// stays closed and the load is retried before the next change. Calls
    /// after a successful read are no-ops.
    pub fn hydrate(&mut self) -> bool {
        let Some(layer) = self.persistence.as_mut() else {
            return false;
        };
        if layer.is_loaded() {
            return false;
        }

        match layer.load::<T>() {
            Some(mut restored) => {
                layer.take_pending();
                let trimmed = self
                    .config
                    .max_history_depth
                    .map_or(0, |max| restored.truncate_past(max));
                tracing::debug!(
                    "Restored history '{}' (past={}, future={})",
                    layer.key(),
                    restored.past.len(),
                    restored.future.len()
                );
                self.timeline = restored;
                if trimmed > 0 {
                    layer.save(&self.timeline);
                }
                self.listeners.notify(&self.timeline);
                true
            }
            None if layer.is_loaded() => {
                if layer.take_pending() {
                    layer.save(&self.timeline);
                }
                false
            }
            None => false,
        }
    }

    /// Records `value` as the new present and drops the redo branch.
    pub fn set(&mut self, value: T) {
        self.retry_load();
        self.timeline.set(value);
        self.enforce_depth();
        self.after_change();
    }

    /// Like [`HistoryManager::set`], computing the value from an [`Update`].
    pub fn update(&mut self, update: impl Into<Update<T>>) {
        self.retry_load();
        let value = update.into().apply(&self.timeline.present);
        self.set(value);
    }

    /// Steps back one entry. Returns `false` (and changes nothing) when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.retry_load();
        if !self.timeline.undo() {
            return false;
        }
        self.after_change();
        true
    }

    /// Steps forward one entry. Returns `false` (and changes nothing) when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.retry_load();
        if !self.timeline.redo() {
            return false;
        }
        self.enforce_depth();
        self.after_change();
        true
    }

    /// Resets to the construction-time value with empty history, and
    /// removes the stored entry.
    pub fn clear(&mut self) {
        self.timeline.reset(self.initial.clone());
        if let Some(layer) = self.persistence.as_mut() {
            layer.remove();
        }
        self.listeners.notify(&self.timeline);
    }

    /// Current value.
    pub fn present(&self) -> &T {
        &self.timeline.present
    }

    /// Past values, oldest first.
    pub fn past(&self) -> &[T] {
        &self.timeline.past
    }

    /// Undone values, nearest first.
    pub fn future(&self) -> &VecDeque<T> {
        &self.timeline.future
    }

    /// The whole timeline.
    pub fn timeline(&self) -> &Timeline<T> {
        &self.timeline
    }

    /// Value restored by [`HistoryManager::clear`].
    pub fn initial(&self) -> &T {
        &self.initial
    }

    pub fn can_undo(&self) -> bool {
        self.timeline.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.timeline.can_redo()
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Store key, when persistence is attached.
    pub fn key(&self) -> Option<&str> {
        self.persistence.as_ref().map(PersistenceLayer::key)
    }

    /// Whether a store is attached.
    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    /// Whether writes are allowed. Always true for in-memory managers.
    pub fn is_loaded(&self) -> bool {
        self.persistence
            .as_ref()
            .map_or(true, PersistenceLayer::is_loaded)
    }

    /// Registers a callback invoked with the timeline after every change,
    /// in the order changes were made.
    pub fn subscribe(
        &mut self,
        callback: impl Fn(&Timeline<T>) + Send + Sync + 'static,
    ) -> Subscription {
        self.listeners.subscribe(callback)
    }

    /// Repeats a load that could not read the store, so a stored timeline
    /// is adopted before the next change is applied on top of it.
    fn retry_load(&mut self) {
        if self
            .persistence
            .as_ref()
            .is_some_and(PersistenceLayer::needs_retry)
        {
            self.hydrate();
        }
    }

    fn enforce_depth(&mut self) {
        if let Some(max) = self.config.max_history_depth {
            let dropped = self.timeline.truncate_past(max);
            if dropped > 0 {
                tracing::trace!("Dropped {dropped} oldest history entries");
            }
        }
    }

    fn after_change(&mut self) {
        if let Some(layer) = self.persistence.as_mut() {
            layer.save(&self.timeline);
        }
        self.listeners.notify(&self.timeline);
    }
}
