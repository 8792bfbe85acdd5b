//! Audit trail of contract events.
//!
//! Keeps the most recent events in memory, newest first, so the host and
//! tests can see what each transaction did.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::sink::{EventSink, LedgerEvent};

/// Maximum entries in the audit log before pruning.
const MAX_AUDIT_ENTRIES: usize = 10_000;

/// An entry in the audit log.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Unique entry ID
    pub entry_id: String,
    /// The recorded event
    pub event: LedgerEvent,
    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    fn new(event: LedgerEvent) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().to_string(),
            event,
            recorded_at: Utc::now(),
        }
    }
}

/// Bounded in-memory audit log.
pub struct AuditLog {
    entries: Mutex<VecDeque<AuditEntry>>,
    max_entries: usize,
}

impl AuditLog {
    /// Create a new audit log.
    pub fn new() -> Self {
        Self::with_max_entries(MAX_AUDIT_ENTRIES)
    }

    /// Create with custom max entries.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_entries,
        }
    }

    /// Get recent entries.
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        self.lock().iter().take(limit).cloned().collect()
    }

    /// Get entries for a transaction.
    pub fn by_tx(&self, tx_id: &str) -> Vec<AuditEntry> {
        self.lock()
            .iter()
            .filter(|e| e.event.tx_id() == Some(tx_id))
            .cloned()
            .collect()
    }

    /// Get statistics.
    pub fn stats(&self) -> AuditStats {
        let entries = self.lock();

        let mut stats = AuditStats {
            total_events: entries.len(),
            ..Default::default()
        };
        for entry in entries.iter() {
            match entry.event {
                LedgerEvent::RecordWritten { .. } => stats.writes += 1,
                LedgerEvent::InvocationRejected { .. } => stats.rejections += 1,
                LedgerEvent::MalformedRecordSkipped { .. } => stats.malformed_skipped += 1,
            }
        }
        stats
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Get count.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<AuditEntry>> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for AuditLog {
    fn emit(&self, event: &LedgerEvent) {
        let mut entries = self.lock();
        entries.push_front(AuditEntry::new(event.clone()));

        while entries.len() > self.max_entries {
            entries.pop_back();
        }
    }
}

/// Statistics from the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditStats {
    pub total_events: usize,
    pub writes: usize,
    pub rejections: usize,
    pub malformed_skipped: usize,
}
