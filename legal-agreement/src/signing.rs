//! Legal agreement signing ledger.
//!
//! A signing must name an agreement that already exists and repeat that
//! agreement's stored content hash. The link is only checked when the
//! signing is created.

use ledger_records::{
    CreatedRecord, LegalAgreementSigning, LegalAgreementSigningRequest, RecordKind,
};

use crate::agreement::AgreementLedger;
use crate::context::{require_key, Fetched, LedgerContext};
use crate::error::ContractError;

#[derive(Clone, Copy)]
pub struct SigningLedger<'a> {
    ctx: LedgerContext<'a>,
}

impl<'a> SigningLedger<'a> {
    pub fn new(ctx: LedgerContext<'a>) -> Self {
        Self { ctx }
    }

    /// Create a signing of an existing agreement.
    pub fn create(
        &self,
        request: LegalAgreementSigningRequest,
    ) -> Result<CreatedRecord, ContractError> {
        require_key("LegalAgreementSigningRequest", "ID", &request.id)?;
        self.ctx.ensure_absent(RecordKind::Signing, &request.id)?;

        let agreement = AgreementLedger::new(self.ctx)
            .read(&request.legal_agreement_id)
            .map_err(|e| ContractError::AgreementUnavailable(Box::new(e)))?
            .record;

        if agreement.content_hash != request.legal_agreement_content_hash {
            return Err(ContractError::ContentHashMismatch {
                expected: agreement.content_hash,
                asserted: request.legal_agreement_content_hash,
            });
        }

        let signing = LegalAgreementSigning {
            id: request.id,
            user_id: request.user_id,
            legal_agreement_id: request.legal_agreement_id,
            legal_agreement_content_hash: request.legal_agreement_content_hash,
            accepted: request.accepted,
            timestamp: request.timestamp,
        };

        self.ctx.insert_new(&signing)?;
        Ok(CreatedRecord::new(signing.id))
    }

    /// Read the signing stored at `id`.
    pub fn read(&self, id: &str) -> Result<Fetched<LegalAgreementSigning>, ContractError> {
        self.ctx.read_record(id)
    }
}
