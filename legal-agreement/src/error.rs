//! Error taxonomy for contract operations.

use ledger_records::{DecodeFailure, RecordKind};

use crate::response::Status;
use crate::store::StoreError;

/// Error types for contract operations.
///
/// Every variant maps to exactly one response [`Status`]. `AlreadyExists`
/// and `NotFound` are caller-visible outcomes rather than failures; nothing
/// has been written when either is returned.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// Wrong number of arguments for the command
    #[error("Incorrect number of arguments. Expecting {expected}")]
    Arity { expected: usize },

    /// Argument is not the expected request shape
    #[error("Error unmarshaling {shape}: {reason}")]
    InvalidArgument { shape: &'static str, reason: String },

    /// A record with this key is already stored
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: RecordKind, id: String },

    /// No record stored at this key
    #[error("{kind} {id} does not exist")]
    NotFound { kind: RecordKind, id: String },

    /// No signing recorded for this user
    #[error("Legal Agreement Signing for user {user_id} does not exist")]
    NoSigningForUser { user_id: String },

    /// The directly requested record does not decode as its kind
    #[error("Failed to unmarshal {kind}: {failure}")]
    Decode {
        kind: RecordKind,
        failure: DecodeFailure,
    },

    /// Version is not above the latest stored version
    #[error("The version {requested} is not greater than the latest version {latest}")]
    VersionNotIncreasing { requested: i64, latest: i64 },

    /// Asserted content hash differs from the stored agreement's hash
    #[error("Content hash does not match latest version of legal agreement")]
    ContentHashMismatch { expected: String, asserted: String },

    /// The agreement a signing refers to could not be read
    #[error("Failed to read legal agreement: {0}")]
    AgreementUnavailable(#[source] Box<ContractError>),

    /// The version scan failed
    #[error("Failed to read latest version legal agreement: {0}")]
    LatestVersionUnavailable(#[source] Box<ContractError>),

    /// A scan met a corrupt record and the abort policy is active
    #[error("Error unmarshaling item {key}: {failure}")]
    MalformedRecord { key: String, failure: DecodeFailure },

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unknown command
    #[error("Function for Invoke invalid or missing: {function}, [{}]", .args.join(" "))]
    UnknownFunction { function: String, args: Vec<String> },

    /// Record could not be serialized for writing
    #[error("Error marshaling {kind}: {reason}")]
    Encode { kind: RecordKind, reason: String },
}

impl ContractError {
    /// Response status for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::AlreadyExists { .. } => Status::Conflict,
            Self::NotFound { .. } | Self::NoSigningForUser { .. } => Status::NotFound,
            Self::Decode { .. } => Status::BadRecord,
            _ => Status::Error,
        }
    }

    /// Whether the error is a hard failure rather than a distinct outcome.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::AlreadyExists { .. } | Self::NotFound { .. } | Self::NoSigningForUser { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let exists = ContractError::AlreadyExists {
            kind: RecordKind::Agreement,
            id: "001".to_string(),
        };
        assert_eq!(exists.status(), Status::Conflict);
        assert!(!exists.is_fatal());

        let missing = ContractError::NoSigningForUser {
            user_id: "u-1".to_string(),
        };
        assert_eq!(missing.status(), Status::NotFound);

        let decode = ContractError::Decode {
            kind: RecordKind::Identity,
            failure: DecodeFailure::NotAnObject,
        };
        assert_eq!(decode.status(), Status::BadRecord);
        assert!(decode.is_fatal());

        let version = ContractError::VersionNotIncreasing {
            requested: 1,
            latest: 1,
        };
        assert_eq!(version.status(), Status::Error);
        assert!(version.is_fatal());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ContractError::Arity { expected: 1 }.to_string(),
            "Incorrect number of arguments. Expecting 1"
        );
        assert_eq!(
            ContractError::AlreadyExists {
                kind: RecordKind::Signing,
                id: "s-1".to_string()
            }
            .to_string(),
            "Legal Agreement Signing s-1 already exists"
        );
        assert_eq!(
            ContractError::NotFound {
                kind: RecordKind::Identity,
                id: "u-1".to_string()
            }
            .to_string(),
            "User Identity u-1 does not exist"
        );
    }

    #[test]
    fn test_unknown_function_lists_args_space_separated() {
        let error = ContractError::UnknownFunction {
            function: "burn".to_string(),
            args: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Function for Invoke invalid or missing: burn, [a b]"
        );

        let error = ContractError::UnknownFunction {
            function: "burn".to_string(),
            args: Vec::new(),
        };
        assert_eq!(error.to_string(), "Function for Invoke invalid or missing: burn, []");
    }

    #[test]
    fn test_wrapped_reference_error_is_fatal() {
        let inner = ContractError::NotFound {
            kind: RecordKind::Agreement,
            id: "missing".to_string(),
        };
        let wrapped = ContractError::AgreementUnavailable(Box::new(inner));

        assert_eq!(wrapped.status(), Status::Error);
        assert_eq!(
            wrapped.to_string(),
            "Failed to read legal agreement: Legal Agreement missing does not exist"
        );
    }
}
