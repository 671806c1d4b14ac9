/// Key-value store contract and its two backends.
///
/// `KeyValueStore` is the only persistence collaborator the state bindings
/// talk to. `MemoryStore` keeps entries in a process-local map (optionally
/// with a byte quota, like browser storage). `RedbStore` keeps them in a
/// single redb table as raw strings, so JSON payloads are stored verbatim.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

/// Entry table: key → raw string value.
const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

/// File name of the store database inside the data directory.
const STORE_FILE_NAME: &str = "rewind.redb";

/// A string-to-string store used to mirror state.
///
/// Every method may fail. Callers in the state bindings never propagate
/// these failures; they log and carry on in memory.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Lists all stored keys in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory store backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    /// Maximum total bytes (keys + values). `None` = unlimited.
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty, unlimited store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates an empty store that rejects writes once the total size of
    /// keys and values would exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(BTreeMap::new()),
            quota: Some(quota),
        })
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > quota {
                bail!("Quota exceeded writing '{key}': {needed} bytes > {quota} bytes");
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// Disk store backed by redb.
///
/// Thread-safe: redb supports concurrent readers and serialized writers.
/// Shared across bindings via `Arc<RedbStore>`.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish()
    }
}

impl RedbStore {
    /// Returns the store database path inside `data_dir`.
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join(STORE_FILE_NAME)
    }

    /// Opens or creates the store database at `path`.
    ///
    /// Creates the parent directory if needed and initializes the entry
    /// table on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open(path: &Path) -> Result<Arc<Self>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open store database: {}", path.display()))?;

        // Ensure the table exists
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(KV_TABLE)
                .context("Failed to create kv table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        Ok(Arc::new(Self { db }))
    }

    /// Opens the store in `data_dir` using the default file name.
    ///
    /// # Errors
    ///
    /// See [`RedbStore::open`].
    pub fn open_in(data_dir: &Path) -> Result<Arc<Self>> {
        Self::open(&Self::default_path(data_dir))
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(KV_TABLE)
            .context("Failed to open kv table")?;

        match table.get(key).context("Failed to read entry")? {
            Some(guard) => Ok(Some(guard.value().to_string())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .context("Failed to open kv table")?;
            table
                .insert(key, value)
                .with_context(|| format!("Failed to insert entry '{key}'"))?;
        }
        write_txn.commit().context("Failed to commit entry")?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .context("Failed to open kv table")?;
            table
                .remove(key)
                .with_context(|| format!("Failed to remove entry '{key}'"))?;
        }
        write_txn.commit().context("Failed to commit removal")?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(KV_TABLE)
            .context("Failed to open kv table")?;

        let mut keys = Vec::new();
        for entry in table.iter().context("Failed to iterate kv table")? {
            let (key_guard, _) = entry.context("Failed to read kv entry")?;
            keys.push(key_guard.value().to_string());
        }
        Ok(keys)
    }
}
