//! User identity ledger.
//!
//! The signing transaction id on an identity is stored as given; it is not
//! checked against any signing.

use ledger_records::{CreatedRecord, RecordKind, UserIdentity, UserIdentityRequest};

use crate::context::{require_key, Fetched, LedgerContext};
use crate::error::ContractError;

#[derive(Clone, Copy)]
pub struct IdentityLedger<'a> {
    ctx: LedgerContext<'a>,
}

impl<'a> IdentityLedger<'a> {
    pub fn new(ctx: LedgerContext<'a>) -> Self {
        Self { ctx }
    }

    /// Create a user identity. The confirmation carries the host
    /// transaction id of this write.
    pub fn create(&self, request: UserIdentityRequest) -> Result<CreatedRecord, ContractError> {
        require_key("UserIdentityRequest", "userID", &request.user_id)?;
        self.ctx.ensure_absent(RecordKind::Identity, &request.user_id)?;

        let identity = UserIdentity {
            user_id: request.user_id,
            legal_agreement_signing_tx_id: request.legal_agreement_signing_tx_id,
            verifiable_credential: request.verifiable_credential,
            status: request.status,
        };

        self.ctx.insert_new(&identity)?;
        Ok(CreatedRecord::new(identity.user_id).with_tx_id(self.ctx.tx_id))
    }

    /// Read the identity stored at `user_id`.
    pub fn read(&self, user_id: &str) -> Result<Fetched<UserIdentity>, ContractError> {
        self.ctx.read_record(user_id)
    }
}
