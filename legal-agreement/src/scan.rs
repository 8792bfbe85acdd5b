//! Full-keyspace scans over one record kind.
//!
//! The store scan visits every key in an unspecified order. Values of other
//! kinds are skipped. When several records tie on the ordering field, the
//! first one the scan happens to visit wins; no further tie-break is applied.

use tracing::debug;

use ledger_records::{classify, Classification, LedgerRecord, LegalAgreement, LegalAgreementSigning};

use crate::config::MalformedPolicy;
use crate::context::LedgerContext;
use crate::error::ContractError;
use crate::sink::LedgerEvent;

/// Visit every stored record of type `T`.
///
/// Returns the number of records visited.
pub fn scan_records<T: LedgerRecord>(
    ctx: &LedgerContext<'_>,
    mut visit: impl FnMut(T),
) -> Result<usize, ContractError> {
    let mut matched = 0;

    for entry in ctx.store.scan_all()? {
        let entry = entry?;

        match classify::<T>(&entry.value) {
            Classification::Match(record) => {
                matched += 1;
                visit(record);
            }
            Classification::NotThisKind(_) => {}
            Classification::Malformed(failure) => match ctx.malformed {
                MalformedPolicy::Skip => ctx.sink.emit(&LedgerEvent::MalformedRecordSkipped {
                    kind: T::KIND,
                    key: entry.key,
                    reason: failure.to_string(),
                }),
                MalformedPolicy::Abort => {
                    return Err(ContractError::MalformedRecord {
                        key: entry.key,
                        failure,
                    })
                }
            },
        }
    }

    Ok(matched)
}

/// Finds the agreement with the highest version anywhere in the store.
#[derive(Clone, Copy)]
pub struct LatestVersionScanner<'a> {
    ctx: LedgerContext<'a>,
}

impl<'a> LatestVersionScanner<'a> {
    pub fn new(ctx: LedgerContext<'a>) -> Self {
        Self { ctx }
    }

    /// Latest agreement, or the zero-value agreement (`version == 0`) when
    /// the store holds none.
    ///
    /// Only a strictly greater version replaces the current best, so an
    /// agreement with `version <= 0` is never returned.
    pub fn latest_agreement(&self) -> Result<LegalAgreement, ContractError> {
        let mut latest = LegalAgreement::default();

        let scanned = scan_records(&self.ctx, |agreement: LegalAgreement| {
            if agreement.version > latest.version {
                latest = agreement;
            }
        })?;

        debug!(scanned, version = latest.version, "Scanned for latest agreement version");
        Ok(latest)
    }
}

/// Finds a user's most recent signing.
#[derive(Clone, Copy)]
pub struct LatestByUserScanner<'a> {
    ctx: LedgerContext<'a>,
}

impl<'a> LatestByUserScanner<'a> {
    pub fn new(ctx: LedgerContext<'a>) -> Self {
        Self { ctx }
    }

    /// The signing of `user_id` with the greatest timestamp.
    ///
    /// The scan starts from the zero-value signing and only a strictly later
    /// timestamp replaces the current best, so a signing with
    /// `timestamp <= 0` is never returned. Unlike
    /// [`LatestVersionScanner::latest_agreement`], finding nothing is
    /// reported as `NoSigningForUser` rather than a zero value.
    pub fn latest_signing_for_user(
        &self,
        user_id: &str,
    ) -> Result<LegalAgreementSigning, ContractError> {
        let mut latest = LegalAgreementSigning::default();

        let scanned = scan_records(&self.ctx, |signing: LegalAgreementSigning| {
            if signing.user_id == user_id && signing.timestamp > latest.timestamp {
                latest = signing;
            }
        })?;

        let found = !latest.user_id.is_empty();
        debug!(scanned, %user_id, found, "Scanned for latest signing");

        if !found {
            return Err(ContractError::NoSigningForUser {
                user_id: user_id.to_string(),
            });
        }
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::store::{MemoryStore, StoreEntry, StoreError};

    fn agreement(id: &str, version: i64) -> String {
        format!(r#"{{"ID":"{id}","content":"c","hash":"h","timestamp":1,"version":{version}}}"#)
    }

    fn signing(id: &str, user: &str, timestamp: i64) -> String {
        format!(
            r#"{{"ID":"{id}","userID":"{user}","legalAgreementID":"001","legalAgreementContentHash":"h","accepted":true,"timestamp":{timestamp}}}"#
        )
    }

    fn context<'a>(
        store: &'a MemoryStore,
        sink: &'a AuditLog,
        malformed: MalformedPolicy,
    ) -> LedgerContext<'a> {
        LedgerContext {
            store,
            tx_id: "tx-scan",
            sink,
            malformed,
        }
    }

    #[test]
    fn test_latest_agreement_empty_store() {
        let store = MemoryStore::new();
        let sink = AuditLog::new();

        let latest = LatestVersionScanner::new(context(&store, &sink, MalformedPolicy::Skip))
            .latest_agreement()
            .unwrap();
        assert_eq!(latest.version, 0);
        assert!(latest.is_zero());
    }

    #[test]
    fn test_latest_agreement_picks_max_version() {
        let store = MemoryStore::with_entries([
            ("001".to_string(), agreement("001", 1)),
            ("003".to_string(), agreement("003", 3)),
            ("002".to_string(), agreement("002", 2)),
            ("s-1".to_string(), signing("s-1", "u-1", 500)),
        ]);
        let sink = AuditLog::new();

        let latest = LatestVersionScanner::new(context(&store, &sink, MalformedPolicy::Skip))
            .latest_agreement()
            .unwrap();
        assert_eq!(latest.id, "003");
        assert_eq!(latest.version, 3);
    }

    #[test]
    fn test_malformed_record_skipped_by_default() {
        let store = MemoryStore::with_entries([
            ("001".to_string(), agreement("001", 4)),
            ("bad".to_string(), r#"{"ID":"bad","version":"nine"}"#.to_string()),
            ("junk".to_string(), "not json".to_string()),
        ]);
        let sink = AuditLog::new();

        let latest = LatestVersionScanner::new(context(&store, &sink, MalformedPolicy::Skip))
            .latest_agreement()
            .unwrap();
        assert_eq!(latest.version, 4);
        assert_eq!(sink.stats().malformed_skipped, 2);
    }

    #[test]
    fn test_malformed_record_aborts_under_abort_policy() {
        let store = MemoryStore::with_entries([
            ("001".to_string(), agreement("001", 4)),
            ("bad".to_string(), r#"{"ID":"bad","version":"nine"}"#.to_string()),
        ]);
        let sink = AuditLog::new();

        let result = LatestVersionScanner::new(context(&store, &sink, MalformedPolicy::Abort))
            .latest_agreement();
        assert!(matches!(result, Err(ContractError::MalformedRecord { key, .. }) if key == "bad"));
    }

    #[test]
    fn test_other_kinds_never_abort() {
        let store = MemoryStore::with_entries([
            ("s-1".to_string(), signing("s-1", "u-1", 100)),
            ("other".to_string(), r#"{"foo":"bar"}"#.to_string()),
        ]);
        let sink = AuditLog::new();

        let latest = LatestVersionScanner::new(context(&store, &sink, MalformedPolicy::Abort))
            .latest_agreement()
            .unwrap();
        assert!(latest.is_zero());
    }

    #[test]
    fn test_latest_signing_for_user() {
        let store = MemoryStore::with_entries([
            ("s-1".to_string(), signing("s-1", "u-1", 100)),
            ("s-2".to_string(), signing("s-2", "u-1", 200)),
            ("s-3".to_string(), signing("s-3", "u-2", 900)),
            ("001".to_string(), agreement("001", 1)),
        ]);
        let sink = AuditLog::new();
        let scanner = LatestByUserScanner::new(context(&store, &sink, MalformedPolicy::Skip));

        let latest = scanner.latest_signing_for_user("u-1").unwrap();
        assert_eq!(latest.id, "s-2");
        assert_eq!(latest.timestamp, 200);
    }

    #[test]
    fn test_latest_signing_for_unknown_user() {
        let store = MemoryStore::with_entries([("s-1".to_string(), signing("s-1", "u-1", 100))]);
        let sink = AuditLog::new();
        let scanner = LatestByUserScanner::new(context(&store, &sink, MalformedPolicy::Skip));

        let result = scanner.latest_signing_for_user("u-9");
        assert!(matches!(result, Err(ContractError::NoSigningForUser { user_id }) if user_id == "u-9"));
    }

    #[test]
    fn test_identities_are_not_counted_as_signings() {
        let store = MemoryStore::with_entries([(
            "u-1".to_string(),
            r#"{"userID":"u-1","legalAgreementSigningTxID":"tx","verifiableCredential":"vc","status":"ok"}"#
                .to_string(),
        )]);
        let sink = AuditLog::new();
        let scanner = LatestByUserScanner::new(context(&store, &sink, MalformedPolicy::Skip));

        assert!(scanner.latest_signing_for_user("u-1").is_err());
    }

    #[test]
    fn test_scan_records_counts_matches() {
        let store = MemoryStore::with_entries([
            ("001".to_string(), agreement("001", 1)),
            ("002".to_string(), agreement("002", 2)),
            ("s-1".to_string(), signing("s-1", "u-1", 1)),
        ]);
        let sink = AuditLog::new();

        let mut versions = Vec::new();
        let count = scan_records(&context(&store, &sink, MalformedPolicy::Skip), |a: LegalAgreement| {
            versions.push(a.version)
        })
        .unwrap();
        versions.sort();

        assert_eq!(count, 2);
        assert_eq!(versions, vec![1, 2]);
    }

    /// Store whose scan yields entries in insertion order.
    struct OrderedStore {
        entries: Vec<(String, String)>,
    }

    impl OrderedStore {
        fn new(entries: &[(&str, String)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.clone()))
                    .collect(),
            }
        }
    }

    impl crate::store::KeyedRecordStore for OrderedStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(self
                .entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone().into_bytes()))
        }

        fn put(&self, _key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
            Err(StoreError::Backend("read only".to_string()))
        }

        fn scan_all(&self) -> Result<crate::store::ScanIter<'_>, StoreError> {
            Ok(Box::new(self.entries.iter().map(|(key, value)| {
                Ok(StoreEntry {
                    key: key.clone(),
                    value: value.clone().into_bytes(),
                })
            })))
        }
    }

    fn ordered_context<'a>(store: &'a OrderedStore, sink: &'a AuditLog) -> LedgerContext<'a> {
        LedgerContext {
            store,
            tx_id: "tx-scan",
            sink,
            malformed: MalformedPolicy::Skip,
        }
    }

    #[test]
    fn test_version_tie_keeps_first_seen() {
        let sink = AuditLog::new();
        for (first, second) in [("A", "B"), ("B", "A")] {
            let store = OrderedStore::new(&[
                ("low", agreement("low", 1)),
                (first, agreement(first, 5)),
                (second, agreement(second, 5)),
            ]);

            let latest = LatestVersionScanner::new(ordered_context(&store, &sink))
                .latest_agreement()
                .unwrap();
            assert_eq!(latest.id, first);
        }
    }

    #[test]
    fn test_timestamp_tie_keeps_first_seen() {
        let sink = AuditLog::new();
        for (first, second) in [("s-1", "s-2"), ("s-2", "s-1")] {
            let store = OrderedStore::new(&[
                ("s-0", signing("s-0", "u-1", 50)),
                (first, signing(first, "u-1", 300)),
                (second, signing(second, "u-1", 300)),
            ]);

            let latest = LatestByUserScanner::new(ordered_context(&store, &sink))
                .latest_signing_for_user("u-1")
                .unwrap();
            assert_eq!(latest.id, first);
        }
    }

    #[test]
    fn test_zero_timestamp_signing_is_not_found() {
        let store = MemoryStore::with_entries([("s-0".to_string(), signing("s-0", "u-1", 0))]);
        let sink = AuditLog::new();
        let scanner = LatestByUserScanner::new(context(&store, &sink, MalformedPolicy::Skip));

        let result = scanner.latest_signing_for_user("u-1");
        assert!(matches!(result, Err(ContractError::NoSigningForUser { .. })));
    }

    #[test]
    fn test_negative_timestamp_loses_to_positive() {
        let store = MemoryStore::with_entries([
            ("s-neg".to_string(), signing("s-neg", "u-1", -10)),
            ("s-pos".to_string(), signing("s-pos", "u-1", 1)),
        ]);
        let sink = AuditLog::new();
        let scanner = LatestByUserScanner::new(context(&store, &sink, MalformedPolicy::Skip));

        assert_eq!(scanner.latest_signing_for_user("u-1").unwrap().id, "s-pos");
    }

    struct BrokenScan;

    impl crate::store::KeyedRecordStore for BrokenScan {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(None)
        }

        fn put(&self, _key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
            Ok(())
        }

        fn scan_all(&self) -> Result<crate::store::ScanIter<'_>, StoreError> {
            let entry = StoreEntry {
                key: "001".to_string(),
                value: agreement("001", 1).into_bytes(),
            };
            Ok(Box::new(
                vec![Ok(entry), Err(StoreError::Iteration("cursor closed".to_string()))].into_iter(),
            ))
        }
    }

    #[test]
    fn test_iteration_error_aborts_scan() {
        let sink = AuditLog::new();
        let ctx = LedgerContext {
            store: &BrokenScan,
            tx_id: "tx-scan",
            sink: &sink,
            malformed: MalformedPolicy::Skip,
        };

        let result = LatestVersionScanner::new(ctx).latest_agreement();
        assert!(matches!(
            result,
            Err(ContractError::Store(StoreError::Iteration(_)))
        ));
    }

    #[test]
    fn test_store_failure_propagates() {
        let store = MemoryStore::new();
        store.set_available(false);
        let sink = AuditLog::new();

        let result = LatestVersionScanner::new(context(&store, &sink, MalformedPolicy::Skip))
            .latest_agreement();
        assert!(matches!(result, Err(ContractError::Store(_))));
    }
}
