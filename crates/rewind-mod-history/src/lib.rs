/// Undo/redo history with optional key-value persistence.
///
/// Provides a `HistoryManager` that keeps a linear past/present/future
/// timeline over any serializable value and mirrors it, best effort, to a
/// `KeyValueStore` under a configurable key. A stored timeline is restored
/// on construction (or on a deferred `hydrate`) and survives across sessions.
pub mod config;
pub mod manager;
pub mod persistence;
pub mod timeline;

pub use config::{HistoryConfig, DEFAULT_HISTORY_KEY};
pub use manager::HistoryManager;
pub use persistence::PersistenceLayer;
pub use timeline::Timeline;
