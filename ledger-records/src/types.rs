//! Stored record types and the request shapes that create them.
//!
//! Field names follow the JSON already persisted on the ledger, so the
//! serialized form of each record is stable across implementations.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for the REST gateway clients.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// The record kinds that share the ledger key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Versioned legal agreement document
    Agreement,
    /// Acceptance of a specific agreement version
    Signing,
    /// User identity linked to a signing transaction
    Identity,
}

impl RecordKind {
    /// Human-readable name used in caller-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Agreement => "Legal Agreement",
            Self::Signing => "Legal Agreement Signing",
            Self::Identity => "User Identity",
        }
    }

    /// The field whose presence marks a stored value as this kind.
    pub fn discriminating_field(&self) -> &'static str {
        match self {
            Self::Agreement => "version",
            Self::Signing => "userID",
            Self::Identity => "legalAgreementSigningTxID",
        }
    }

    /// Kinds in the order their discriminating fields are checked.
    ///
    /// Identities also carry `userID`, so they must be recognised before
    /// signings.
    pub fn detection_order() -> [Self; 3] {
        [Self::Agreement, Self::Identity, Self::Signing]
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A record type persisted in the shared key space.
pub trait LedgerRecord: Serialize + serde::de::DeserializeOwned {
    /// Kind tag for this record type.
    const KIND: RecordKind;

    /// The natural key the record is stored under.
    fn key(&self) -> &str;
}

/// A legal agreement document.
///
/// Immutable once written. `content_hash` is always computed from `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct LegalAgreement {
    /// Unique identifier and storage key
    #[serde(rename = "ID")]
    pub id: String,
    /// Opaque agreement text
    pub content: String,
    /// SHA-256 of `content`, hex encoded
    #[serde(rename = "hash")]
    pub content_hash: String,
    /// Caller-supplied timestamp
    pub timestamp: i64,
    /// Global monotonic version
    pub version: i64,
}

impl LegalAgreement {
    /// True for the zero-value record returned when no agreement exists.
    pub fn is_zero(&self) -> bool {
        self.version == 0 && self.id.is_empty()
    }
}

impl LedgerRecord for LegalAgreement {
    const KIND: RecordKind = RecordKind::Agreement;

    fn key(&self) -> &str {
        &self.id
    }
}

/// A signing of one legal agreement version by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct LegalAgreementSigning {
    /// Unique identifier and storage key
    #[serde(rename = "ID")]
    pub id: String,
    /// Signing user
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Agreement this signing refers to
    #[serde(rename = "legalAgreementID")]
    pub legal_agreement_id: String,
    /// Content hash of the agreement at signing time
    #[serde(rename = "legalAgreementContentHash")]
    pub legal_agreement_content_hash: String,
    /// Whether the user accepted the agreement
    pub accepted: bool,
    /// Caller-supplied timestamp
    pub timestamp: i64,
}

impl LedgerRecord for LegalAgreementSigning {
    const KIND: RecordKind = RecordKind::Signing;

    fn key(&self) -> &str {
        &self.id
    }
}

/// A user identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct UserIdentity {
    /// User identifier and storage key
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Transaction that recorded the user's signing (not validated)
    #[serde(rename = "legalAgreementSigningTxID")]
    pub legal_agreement_signing_tx_id: String,
    /// Opaque credential blob
    #[serde(rename = "verifiableCredential")]
    pub verifiable_credential: String,
    /// Opaque status
    pub status: String,
}

impl LedgerRecord for UserIdentity {
    const KIND: RecordKind = RecordKind::Identity;

    fn key(&self) -> &str {
        &self.user_id
    }
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Request to create a legal agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct LegalAgreementRequest {
    #[serde(rename = "ID")]
    pub id: String,
    pub content: String,
    pub timestamp: i64,
    pub version: i64,
}

/// Request to read a legal agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ReadLegalAgreementRequest {
    #[serde(rename = "ID")]
    pub id: String,
}

/// Request to create a legal agreement signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct LegalAgreementSigningRequest {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "legalAgreementID")]
    pub legal_agreement_id: String,
    #[serde(rename = "legalAgreementContentHash")]
    pub legal_agreement_content_hash: String,
    pub accepted: bool,
    pub timestamp: i64,
}

/// Request to read a legal agreement signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ReadLegalAgreementSigningRequest {
    #[serde(rename = "ID")]
    pub id: String,
}

/// Request to read the most recent signing of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ReadLatestSigningByUserRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
}

/// Request to create a user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UserIdentityRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "legalAgreementSigningTxID")]
    pub legal_agreement_signing_tx_id: String,
    #[serde(rename = "verifiableCredential")]
    pub verifiable_credential: String,
    pub status: String,
}

/// Request to read a user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ReadUserIdentityRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
}

/// Confirmation payload returned by every create command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CreatedRecord {
    /// Key of the record that was written
    #[serde(rename = "createdID")]
    pub created_id: String,
    /// Host transaction id, reported for identity creation only
    #[serde(rename = "txID", default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

impl CreatedRecord {
    pub fn new(created_id: impl Into<String>) -> Self {
        Self {
            created_id: created_id.into(),
            tx_id: None,
        }
    }

    pub fn with_tx_id(mut self, tx_id: impl Into<String>) -> Self {
        self.tx_id = Some(tx_id.into());
        self
    }
}
