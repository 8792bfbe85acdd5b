//! Legal agreement ledger.
//!
//! Agreements are written once and never changed. Every new agreement must
//! carry a version above the highest version of *any* agreement already
//! stored, whatever its id: there is one version counter for the whole
//! ledger, not one per document.

use ledger_records::{
    content_hash, CreatedRecord, LegalAgreement, LegalAgreementRequest, RecordKind,
};

use crate::context::{require_key, Fetched, LedgerContext};
use crate::error::ContractError;
use crate::scan::LatestVersionScanner;

#[derive(Clone, Copy)]
pub struct AgreementLedger<'a> {
    ctx: LedgerContext<'a>,
}

impl<'a> AgreementLedger<'a> {
    pub fn new(ctx: LedgerContext<'a>) -> Self {
        Self { ctx }
    }

    /// Create a legal agreement.
    ///
    /// The content hash is computed here; the version must exceed the
    /// latest stored version.
    pub fn create(&self, request: LegalAgreementRequest) -> Result<CreatedRecord, ContractError> {
        require_key("LegalAgreementRequest", "ID", &request.id)?;
        self.ctx.ensure_absent(RecordKind::Agreement, &request.id)?;

        let content_hash = content_hash(&request.content);

        let latest = LatestVersionScanner::new(self.ctx)
            .latest_agreement()
            .map_err(|e| ContractError::LatestVersionUnavailable(Box::new(e)))?;

        if request.version <= latest.version {
            return Err(ContractError::VersionNotIncreasing {
                requested: request.version,
                latest: latest.version,
            });
        }

        let agreement = LegalAgreement {
            id: request.id,
            content: request.content,
            content_hash,
            timestamp: request.timestamp,
            version: request.version,
        };

        self.ctx.insert_new(&agreement)?;
        Ok(CreatedRecord::new(agreement.id))
    }

    /// Read the agreement stored at `id`.
    pub fn read(&self, id: &str) -> Result<Fetched<LegalAgreement>, ContractError> {
        self.ctx.read_record(id)
    }
}
