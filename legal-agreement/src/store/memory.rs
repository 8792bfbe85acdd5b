//! In-memory keyed record store.
//!
//! Backs the mock stub and the local host. Values are held in a `DashMap`,
//! which gives an atomic conditional put through its entry API. Scans copy
//! the current entries first, so each scan sees a consistent snapshot.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::traits::*;

/// Error types for snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot value for key {key} is not valid hex: {source}")]
    Hex {
        key: String,
        #[source]
        source: hex::FromHexError,
    },
}

/// Thread-safe in-memory store.
pub struct MemoryStore {
    entries: DashMap<String, Vec<u8>>,
    available: AtomicBool,
    write_count: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            available: AtomicBool::new(true),
            write_count: AtomicU64::new(0),
        }
    }

    /// Create a store pre-populated with raw entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let store = Self::new();
        for (key, value) in entries {
            store.entries.insert(key.into(), value.into());
        }
        store
    }

    /// Make every operation fail, for exercising error paths.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Raw bytes at `key`, bypassing availability checks.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    /// Load a store from a snapshot file written by [`save_snapshot`].
    ///
    /// [`save_snapshot`]: MemoryStore::save_snapshot
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        let encoded: BTreeMap<String, String> = serde_json::from_str(&content)?;

        let store = Self::new();
        for (key, value) in encoded {
            let bytes = hex::decode(&value).map_err(|source| SnapshotError::Hex {
                key: key.clone(),
                source,
            })?;
            store.entries.insert(key, bytes);
        }

        tracing::debug!(entries = store.len(), "Loaded store snapshot");
        Ok(store)
    }

    /// Write all entries to a snapshot file, values hex encoded.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let encoded: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), hex::encode(e.value())))
            .collect();

        std::fs::write(path, serde_json::to_string_pretty(&encoded)?)?;
        tracing::debug!(entries = encoded.len(), "Saved store snapshot");
        Ok(())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Backend("store unavailable".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyedRecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_available()?;
        Ok(self.raw(key))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.check_available()?;
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.entries.insert(key.to_string(), value);
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn put_if_absent(&self, key: &str, value: Vec<u8>) -> Result<bool, StoreError> {
        self.check_available()?;
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                self.write_count.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
        }
    }

    fn scan_all(&self) -> Result<ScanIter<'_>, StoreError> {
        self.check_available()?;
        let snapshot: Vec<StoreEntry> = self
            .entries
            .iter()
            .map(|e| StoreEntry {
                key: e.key().clone(),
                value: e.value().clone(),
            })
            .collect();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }
}
