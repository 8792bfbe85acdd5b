//! Per-invocation context shared by the ledgers and scanners.

use tracing::debug;

use ledger_records::{classify, LedgerRecord, RecordKind};

use crate::config::MalformedPolicy;
use crate::error::ContractError;
use crate::sink::{EventSink, LedgerEvent};
use crate::store::KeyedRecordStore;

/// The host-supplied transaction one invocation runs in.
///
/// Everything written through the store is committed or discarded by the
/// host as a unit; the transaction id is assigned by the host.
pub struct Transaction<'a> {
    store: &'a dyn KeyedRecordStore,
    tx_id: String,
}

impl<'a> Transaction<'a> {
    pub fn new(store: &'a dyn KeyedRecordStore, tx_id: impl Into<String>) -> Self {
        Self {
            store,
            tx_id: tx_id.into(),
        }
    }

    /// Store this transaction reads and writes.
    pub fn store(&self) -> &'a dyn KeyedRecordStore {
        self.store
    }

    /// Host-assigned transaction id.
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }
}

/// A record read by key, with the bytes it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub record: T,
    pub raw: Vec<u8>,
}

/// Everything a ledger operation needs for one invocation.
#[derive(Clone, Copy)]
pub struct LedgerContext<'a> {
    pub store: &'a dyn KeyedRecordStore,
    pub tx_id: &'a str,
    pub sink: &'a dyn EventSink,
    pub malformed: MalformedPolicy,
}

impl<'a> LedgerContext<'a> {
    /// Read and decode the record of type `T` stored at `key`.
    pub fn read_record<T: LedgerRecord>(&self, key: &str) -> Result<Fetched<T>, ContractError> {
        let raw = self
            .store
            .get(key)?
            .ok_or_else(|| ContractError::NotFound {
                kind: T::KIND,
                id: key.to_string(),
            })?;

        let record = classify::<T>(&raw)
            .into_result()
            .map_err(|failure| ContractError::Decode {
                kind: T::KIND,
                failure,
            })?;

        Ok(Fetched { record, raw })
    }

    /// Fail with `AlreadyExists` if anything is stored at `key`.
    pub fn ensure_absent(&self, kind: RecordKind, key: &str) -> Result<(), ContractError> {
        if self.store.get(key)?.is_some() {
            return Err(ContractError::AlreadyExists {
                kind,
                id: key.to_string(),
            });
        }
        Ok(())
    }

    /// Persist a new record under its key.
    ///
    /// Uses the store's conditional put, so a key written by a concurrent
    /// transaction after [`ensure_absent`] still yields `AlreadyExists`.
    ///
    /// [`ensure_absent`]: LedgerContext::ensure_absent
    pub fn insert_new<T: LedgerRecord>(&self, record: &T) -> Result<(), ContractError> {
        let key = record.key();
        let bytes = serde_json::to_vec(record).map_err(|e| ContractError::Encode {
            kind: T::KIND,
            reason: e.to_string(),
        })?;

        if !self.store.put_if_absent(key, bytes)? {
            return Err(ContractError::AlreadyExists {
                kind: T::KIND,
                id: key.to_string(),
            });
        }

        let kind = T::KIND;
        debug!(%kind, %key, tx_id = %self.tx_id, "Persisted record");
        self.sink.emit(&LedgerEvent::RecordWritten {
            kind,
            key: key.to_string(),
            tx_id: self.tx_id.to_string(),
        });
        Ok(())
    }
}

/// Reject an empty key field on a create request.
pub(crate) fn require_key(
    shape: &'static str,
    field: &str,
    value: &str,
) -> Result<(), ContractError> {
    if value.is_empty() {
        return Err(ContractError::InvalidArgument {
            shape,
            reason: format!("{field} must not be empty"),
        });
    }
    Ok(())
}
