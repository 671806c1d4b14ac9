pub mod config;
pub mod store;

pub use config::{resolve_data_dir, AppConfig, DEFAULT_HISTORY_KEY};
pub use store::{KeyValueStore, MemoryStore, RedbStore};
