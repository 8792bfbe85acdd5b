//! LegalAgreementContract - entry point for host invocations.
//!
//! Routes a command name plus its JSON arguments to the ledgers, and turns
//! every outcome into a [`Response`]. The contract keeps no per-invocation
//! state; the store and transaction id come from the [`Transaction`] the
//! host opens for each call.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use ledger_records::{
    LegalAgreementRequest, LegalAgreementSigningRequest, ReadLatestSigningByUserRequest,
    ReadLegalAgreementRequest, ReadLegalAgreementSigningRequest, ReadUserIdentityRequest,
    RecordKind, UserIdentityRequest,
};

use crate::agreement::AgreementLedger;
use crate::config::ContractConfig;
use crate::context::{LedgerContext, Transaction};
use crate::error::ContractError;
use crate::identity::IdentityLedger;
use crate::response::Response;
use crate::scan::{LatestByUserScanner, LatestVersionScanner};
use crate::signing::SigningLedger;
use crate::sink::{EventSink, LedgerEvent};

/// Commands the contract answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Init,
    CreateLegalAgreement,
    ReadLegalAgreement,
    ReadLatestVersionLegalAgreement,
    CreateLegalAgreementSigning,
    ReadLegalAgreementSigning,
    ReadLatestLegalAgreementSigningByUserId,
    CreateUserIdentity,
    ReadUserIdentity,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Init,
        Command::CreateLegalAgreement,
        Command::ReadLegalAgreement,
        Command::ReadLatestVersionLegalAgreement,
        Command::CreateLegalAgreementSigning,
        Command::ReadLegalAgreementSigning,
        Command::ReadLatestLegalAgreementSigningByUserId,
        Command::CreateUserIdentity,
        Command::ReadUserIdentity,
    ];

    /// Look up a command by its wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::CreateLegalAgreement => "createLegalAgreement",
            Self::ReadLegalAgreement => "readLegalAgreement",
            Self::ReadLatestVersionLegalAgreement => "readLatestVersionLegalAgreement",
            Self::CreateLegalAgreementSigning => "createLegalAgreementSigning",
            Self::ReadLegalAgreementSigning => "readLegalAgreementSigning",
            Self::ReadLatestLegalAgreementSigningByUserId => {
                "readLatestLegalAgreementSigningByUserID"
            }
            Self::CreateUserIdentity => "createUserIdentity",
            Self::ReadUserIdentity => "readUserIdentity",
        }
    }

    /// Number of arguments the command takes. `None` accepts any.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Init => None,
            Self::ReadLatestVersionLegalAgreement => Some(0),
            _ => Some(1),
        }
    }
}

/// The legal agreement contract.
pub struct LegalAgreementContract {
    config: ContractConfig,
    sink: Arc<dyn EventSink>,
}

impl LegalAgreementContract {
    /// Create a contract with default configuration.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_config(ContractConfig::default(), sink)
    }

    pub fn with_config(config: ContractConfig, sink: Arc<dyn EventSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Instantiate the contract. Nothing is written.
    pub fn init(&self, tx: &Transaction<'_>) -> Response {
        info!(
            contract = %self.config.contract_name,
            tx_id = %tx.tx_id(),
            "Initializing legal agreement contract"
        );
        Response::success(Vec::new())
    }

    /// Run one command inside the host transaction `tx`.
    pub fn invoke(&self, tx: &Transaction<'_>, function: &str, args: &[String]) -> Response {
        let ctx = LedgerContext {
            store: tx.store(),
            tx_id: tx.tx_id(),
            sink: self.sink.as_ref(),
            malformed: self.config.malformed_records,
        };

        let result = match Command::parse(function) {
            Some(Command::Init) => return self.init(tx),
            Some(command) => {
                debug!(function, tx_id = %tx.tx_id(), args = args.len(), "Invoking command");
                self.dispatch(ctx, command, args)
            }
            None => Err(ContractError::UnknownFunction {
                function: function.to_string(),
                args: args.to_vec(),
            }),
        };

        let response = Response::from(result);
        if !response.is_success() {
            self.sink.emit(&LedgerEvent::InvocationRejected {
                function: function.to_string(),
                tx_id: tx.tx_id().to_string(),
                status: response.status,
                message: response.message.clone(),
            });
        }
        response
    }

    fn dispatch(
        &self,
        ctx: LedgerContext<'_>,
        command: Command,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        if let Some(expected) = command.arity() {
            expect_args(args, expected)?;
        }

        match command {
            Command::Init => Ok(Vec::new()),

            Command::CreateLegalAgreement => {
                let request: LegalAgreementRequest = parse_request(args, "LegalAgreementRequest")?;
                let created = AgreementLedger::new(ctx).create(request)?;
                encode(RecordKind::Agreement, &created)
            }
            Command::ReadLegalAgreement => {
                let request: ReadLegalAgreementRequest =
                    parse_request(args, "ReadLegalAgreementRequest")?;
                Ok(AgreementLedger::new(ctx).read(&request.id)?.raw)
            }
            Command::ReadLatestVersionLegalAgreement => {
                let latest = LatestVersionScanner::new(ctx).latest_agreement()?;
                encode(RecordKind::Agreement, &latest)
            }

            Command::CreateLegalAgreementSigning => {
                let request: LegalAgreementSigningRequest =
                    parse_request(args, "LegalAgreementSigningRequest")?;
                let created = SigningLedger::new(ctx).create(request)?;
                encode(RecordKind::Signing, &created)
            }
            Command::ReadLegalAgreementSigning => {
                let request: ReadLegalAgreementSigningRequest =
                    parse_request(args, "ReadLegalAgreementSigningRequest")?;
                Ok(SigningLedger::new(ctx).read(&request.id)?.raw)
            }
            Command::ReadLatestLegalAgreementSigningByUserId => {
                let request: ReadLatestSigningByUserRequest =
                    parse_request(args, "ReadLatestSigningByUserRequest")?;
                let latest = LatestByUserScanner::new(ctx).latest_signing_for_user(&request.user_id)?;
                encode(RecordKind::Signing, &latest)
            }

            Command::CreateUserIdentity => {
                let request: UserIdentityRequest = parse_request(args, "UserIdentityRequest")?;
                let created = IdentityLedger::new(ctx).create(request)?;
                encode(RecordKind::Identity, &created)
            }
            Command::ReadUserIdentity => {
                let request: ReadUserIdentityRequest =
                    parse_request(args, "ReadUserIdentityRequest")?;
                Ok(IdentityLedger::new(ctx).read(&request.user_id)?.raw)
            }
        }
    }
}

fn expect_args(args: &[String], expected: usize) -> Result<(), ContractError> {
    if args.len() != expected {
        return Err(ContractError::Arity { expected });
    }
    Ok(())
}

fn parse_request<T: DeserializeOwned>(
    args: &[String],
    shape: &'static str,
) -> Result<T, ContractError> {
    let raw = args.first().map(String::as_str).unwrap_or_default();
    serde_json::from_str(raw).map_err(|e| ContractError::InvalidArgument {
        shape,
        reason: e.to_string(),
    })
}

fn encode<T: Serialize>(kind: RecordKind, value: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(value).map_err(|e| ContractError::Encode {
        kind,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::response::Status;
    use crate::store::MemoryStore;

    fn contract() -> (LegalAgreementContract, Arc<AuditLog>) {
        let audit = Arc::new(AuditLog::new());
        (LegalAgreementContract::new(audit.clone()), audit)
    }

    #[test]
    fn test_command_names() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.name()), Some(command));
        }
        assert_eq!(
            Command::parse("readLatestLegalAgreementSigningByUserID"),
            Some(Command::ReadLatestLegalAgreementSigningByUserId)
        );
        assert_eq!(Command::parse("deleteLegalAgreement"), None);
    }

    #[test]
    fn test_arity_checked_first() {
        let (contract, _) = contract();
        let store = MemoryStore::new();
        store.set_available(false);
        let tx = Transaction::new(&store, "tx-1");

        let response = contract.invoke(&tx, "readLatestVersionLegalAgreement", &["{}".to_string()]);
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.message, "Incorrect number of arguments. Expecting 0");

        let response = contract.invoke(&tx, "createLegalAgreement", &[]);
        assert_eq!(response.message, "Incorrect number of arguments. Expecting 1");
    }

    #[test]
    fn test_unknown_function() {
        let (contract, audit) = contract();
        let store = MemoryStore::new();
        let tx = Transaction::new(&store, "tx-1");

        let response = contract.invoke(&tx, "burn", &["x".to_string()]);
        assert_eq!(response.status, Status::Error);
        assert!(response
            .message
            .starts_with("Function for Invoke invalid or missing: burn"));
        assert_eq!(audit.stats().rejections, 1);
    }

    #[test]
    fn test_unparsable_argument() {
        let (contract, _) = contract();
        let store = MemoryStore::new();
        let tx = Transaction::new(&store, "tx-1");

        let response = contract.invoke(&tx, "createLegalAgreement", &["{not json".to_string()]);
        assert_eq!(response.status, Status::Error);
        assert!(response
            .message
            .starts_with("Error unmarshaling LegalAgreementRequest:"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_init_writes_nothing() {
        let (contract, _) = contract();
        let store = MemoryStore::new();
        let tx = Transaction::new(&store, "tx-init");

        assert!(contract.init(&tx).is_success());
        assert!(contract.invoke(&tx, "init", &[]).is_success());
        assert!(store.is_empty());
    }

    #[test]
    fn test_latest_version_on_empty_store_is_zero_record() {
        let (contract, _) = contract();
        let store = MemoryStore::new();
        let tx = Transaction::new(&store, "tx-1");

        let response = contract.invoke(&tx, "readLatestVersionLegalAgreement", &[]);
        assert!(response.is_success());
        let latest: ledger_records::LegalAgreement = response.payload_json().unwrap();
        assert_eq!(latest.version, 0);
    }
}
