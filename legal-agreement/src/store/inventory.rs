//! Whole-store sanity pass.
//!
//! Decodes every value as whichever record kind it carries. Used by the host
//! after loading a snapshot, before any invocation runs against it.

use ledger_records::{RecordKind, StoredRecord};

use super::traits::{KeyedRecordStore, StoreError};

/// What a store holds, by record kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub agreements: usize,
    pub signings: usize,
    pub identities: usize,
    /// Keys whose value is not any record kind
    pub undecodable: Vec<String>,
    /// Keys holding a record whose own key field differs
    pub misplaced: Vec<String>,
}

impl Inventory {
    /// Scan `store` and classify every value.
    pub fn take(store: &dyn KeyedRecordStore) -> Result<Self, StoreError> {
        let mut inventory = Self::default();

        for entry in store.scan_all()? {
            let entry = entry?;

            let record = match StoredRecord::decode(&entry.value) {
                Ok(record) => record,
                Err(_) => {
                    inventory.undecodable.push(entry.key);
                    continue;
                }
            };

            match record.kind() {
                RecordKind::Agreement => inventory.agreements += 1,
                RecordKind::Signing => inventory.signings += 1,
                RecordKind::Identity => inventory.identities += 1,
            }
            if record.key() != entry.key {
                inventory.misplaced.push(entry.key);
            }
        }

        inventory.undecodable.sort();
        inventory.misplaced.sort();
        Ok(inventory)
    }

    /// Total number of decodable records.
    pub fn records(&self) -> usize {
        self.agreements + self.signings + self.identities
    }

    pub fn is_clean(&self) -> bool {
        self.undecodable.is_empty() && self.misplaced.is_empty()
    }
}
