//! Record discriminator for the shared key space.
//!
//! Stored values carry no type tag. A value is assigned a kind by the
//! presence (non-null) of that kind's discriminating field, checked in
//! [`RecordKind::detection_order`]. Only after the kind is known is the value
//! decoded into the concrete record type, so a value of another kind is
//! never reported as an error while looking for a given kind.

use serde_json::{Map, Value};

use crate::types::{LedgerRecord, LegalAgreement, LegalAgreementSigning, RecordKind, UserIdentity};

/// Why a stored value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    /// Bytes are not JSON at all
    #[error("stored value is not valid JSON: {0}")]
    InvalidJson(String),

    /// JSON, but not an object
    #[error("stored value is not a JSON object")]
    NotAnObject,

    /// Object without any discriminating field
    #[error("stored value does not match any record kind")]
    UnknownKind,

    /// Kind detected, but its fields do not decode
    #[error("invalid {kind} record: {reason}")]
    InvalidFields { kind: RecordKind, reason: String },

    /// A point read found a record of another kind
    #[error("Not a {expected}")]
    WrongKind {
        expected: RecordKind,
        found: Option<RecordKind>,
    },
}

/// Outcome of classifying a stored value against one record kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification<T> {
    /// The value is of the requested kind
    Match(T),
    /// The value is of another kind (or none); skip it
    NotThisKind(Option<RecordKind>),
    /// The value is corrupt for the requested kind
    Malformed(DecodeFailure),
}

impl<T> Classification<T> {
    /// Return the decoded record, if matched.
    pub fn into_match(self) -> Option<T> {
        match self {
            Self::Match(record) => Some(record),
            _ => None,
        }
    }
}

impl<T: LedgerRecord> Classification<T> {
    /// Treat anything but a match as a decode failure.
    ///
    /// Used for point reads, where the key names the record directly and a
    /// value of another kind means the caller asked for the wrong thing.
    pub fn into_result(self) -> Result<T, DecodeFailure> {
        match self {
            Self::Match(record) => Ok(record),
            Self::NotThisKind(found) => Err(DecodeFailure::WrongKind {
                expected: T::KIND,
                found,
            }),
            Self::Malformed(failure) => Err(failure),
        }
    }
}

/// Any record that can live in the shared key space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRecord {
    Agreement(LegalAgreement),
    Signing(LegalAgreementSigning),
    Identity(UserIdentity),
}

impl StoredRecord {
    /// Decode a stored value into whichever kind it carries.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeFailure> {
        let object = parse_object(raw)?;
        let kind = detect_kind(&object).ok_or(DecodeFailure::UnknownKind)?;
        let value = Value::Object(object);

        match kind {
            RecordKind::Agreement => decode_fields(value).map(Self::Agreement),
            RecordKind::Signing => decode_fields(value).map(Self::Signing),
            RecordKind::Identity => decode_fields(value).map(Self::Identity),
        }
    }

    /// Kind of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Agreement(_) => RecordKind::Agreement,
            Self::Signing(_) => RecordKind::Signing,
            Self::Identity(_) => RecordKind::Identity,
        }
    }

    /// Natural key of this record.
    pub fn key(&self) -> &str {
        match self {
            Self::Agreement(r) => r.key(),
            Self::Signing(r) => r.key(),
            Self::Identity(r) => r.key(),
        }
    }
}

/// Classify a stored value against the record type `T`.
pub fn classify<T: LedgerRecord>(raw: &[u8]) -> Classification<T> {
    let object = match parse_object(raw) {
        Ok(object) => object,
        Err(failure) => return Classification::Malformed(failure),
    };

    match detect_kind(&object) {
        Some(kind) if kind == T::KIND => match decode_fields(Value::Object(object)) {
            Ok(record) => Classification::Match(record),
            Err(failure) => Classification::Malformed(failure),
        },
        other => Classification::NotThisKind(other),
    }
}

/// Detect the kind of a decoded JSON object by its discriminating fields.
pub fn detect_kind(object: &Map<String, Value>) -> Option<RecordKind> {
    RecordKind::detection_order().into_iter().find(|kind| {
        object
            .get(kind.discriminating_field())
            .is_some_and(|v| !v.is_null())
    })
}

fn parse_object(raw: &[u8]) -> Result<Map<String, Value>, DecodeFailure> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(DecodeFailure::NotAnObject),
        Err(e) => Err(DecodeFailure::InvalidJson(e.to_string())),
    }
}

fn decode_fields<T: LedgerRecord>(value: Value) -> Result<T, DecodeFailure> {
    serde_json::from_value(value).map_err(|e| DecodeFailure::InvalidFields {
        kind: T::KIND,
        reason: e.to_string(),
    })
}
