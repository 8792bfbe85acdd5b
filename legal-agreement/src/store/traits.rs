//! Core trait for the keyed record store.
//!
//! This module defines `KeyedRecordStore` - the abstraction over the host's
//! transactional key-value ledger. The contract never owns persisted bytes;
//! it reads and writes through this trait inside one host transaction.

/// Error types for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Keys must be non-empty
    #[error("Key must not be empty")]
    EmptyKey,

    /// Backend failure while reading or writing
    #[error("Store backend error: {0}")]
    Backend(String),

    /// Failure while iterating a range scan
    #[error("Error getting next item: {0}")]
    Iteration(String),
}

/// One key/value pair returned by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: String,
    pub value: Vec<u8>,
}

/// One-shot iterator over a full range scan.
///
/// Iteration order is unspecified. Resources held by the scan are released
/// when the iterator is dropped.
pub type ScanIter<'a> = Box<dyn Iterator<Item = Result<StoreEntry, StoreError>> + 'a>;

/// Point get/put and full scan over the shared key space.
pub trait KeyedRecordStore: Send + Sync {
    /// Read the value stored at `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` at `key`, replacing any existing value.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Write `value` at `key` only if the key is absent.
    ///
    /// Returns `false` without writing when a value already exists. The
    /// default is check-then-put; stores with an atomic primitive should
    /// override it.
    fn put_if_absent(&self, key: &str, value: Vec<u8>) -> Result<bool, StoreError> {
        if self.get(key)?.is_some() {
            return Ok(false);
        }
        self.put(key, value)?;
        Ok(true)
    }

    /// Scan every key/value pair in the store.
    fn scan_all(&self) -> Result<ScanIter<'_>, StoreError>;
}
