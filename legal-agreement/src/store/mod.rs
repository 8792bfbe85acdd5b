//! Keyed record store abstraction.
//!
//! - `KeyedRecordStore`: the host ledger's point get/put and range scan
//! - `MemoryStore`: in-memory implementation for tests and the local host
//! - `Inventory`: per-kind census of a store

pub mod inventory;
pub mod memory;
pub mod traits;

pub use inventory::Inventory;
pub use memory::{MemoryStore, SnapshotError};
pub use traits::{KeyedRecordStore, ScanIter, StoreEntry, StoreError};
