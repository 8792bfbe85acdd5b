//! Observability sink for contract events.
//!
//! The contract holds no logger state of its own. Events are handed to an
//! [`EventSink`] supplied when the contract is constructed.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use ledger_records::RecordKind;

use crate::response::Status;

/// Something the contract did that an operator may want to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new record was persisted
    RecordWritten {
        kind: RecordKind,
        key: String,
        tx_id: String,
    },
    /// An invocation returned a non-success status
    InvocationRejected {
        function: String,
        tx_id: String,
        status: Status,
        message: String,
    },
    /// A scan skipped a value that selected the sought kind but did not decode
    MalformedRecordSkipped {
        kind: RecordKind,
        key: String,
        reason: String,
    },
}

impl LedgerEvent {
    /// Transaction the event belongs to, if any.
    pub fn tx_id(&self) -> Option<&str> {
        match self {
            Self::RecordWritten { tx_id, .. } | Self::InvocationRejected { tx_id, .. } => {
                Some(tx_id)
            }
            Self::MalformedRecordSkipped { .. } => None,
        }
    }
}

/// Receiver for contract events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &LedgerEvent);
}

/// Sink that forwards events to `tracing`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    contract_name: String,
}

impl TracingSink {
    pub fn new(contract_name: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("legalagreement")
    }
}

impl EventSink for TracingSink {
    fn emit(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::RecordWritten { kind, key, tx_id } => {
                info!(contract = %self.contract_name, %kind, %key, %tx_id, "Wrote record");
            }
            LedgerEvent::InvocationRejected {
                function,
                tx_id,
                status,
                message,
            } => {
                info!(
                    contract = %self.contract_name,
                    %function,
                    %tx_id,
                    status = status.code(),
                    %message,
                    "Invocation rejected"
                );
            }
            LedgerEvent::MalformedRecordSkipped { kind, key, reason } => {
                warn!(contract = %self.contract_name, %kind, %key, %reason, "Skipping malformed record");
            }
        }
    }
}

/// Sink that forwards each event to several sinks.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: &LedgerEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;

    #[test]
    fn test_fanout_reaches_every_sink() {
        let first = Arc::new(AuditLog::new());
        let second = Arc::new(AuditLog::new());
        let sink = FanoutSink::new()
            .with(first.clone())
            .with(second.clone())
            .with(Arc::new(TracingSink::default()));

        sink.emit(&LedgerEvent::RecordWritten {
            kind: RecordKind::Agreement,
            key: "001".to_string(),
            tx_id: "tx-1".to_string(),
        });

        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 1);
    }

    #[test]
    fn test_event_serialization() {
        let event = LedgerEvent::InvocationRejected {
            function: "createLegalAgreement".to_string(),
            tx_id: "tx-1".to_string(),
            status: Status::Conflict,
            message: "Legal Agreement 001 already exists".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "invocation_rejected");
        assert_eq!(json["status"], 403);
        assert_eq!(event.tx_id(), Some("tx-1"));
    }
}
