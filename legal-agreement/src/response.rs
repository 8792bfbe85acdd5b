//! Response envelope returned to the host for every invocation.

use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// Status of a contract response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Status {
    /// 200: operation succeeded
    Ok,
    /// 400: a directly requested stored record failed to decode
    BadRecord,
    /// 403: the record already exists
    Conflict,
    /// 404: the record does not exist
    NotFound,
    /// 500: any other failure
    Error,
}

impl Status {
    /// Numeric status code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRecord => 400,
            Self::Conflict => 403,
            Self::NotFound => 404,
            Self::Error => 500,
        }
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u16> for Status {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, String> {
        match code {
            200 => Ok(Status::Ok),
            400 => Ok(Status::BadRecord),
            403 => Ok(Status::Conflict),
            404 => Ok(Status::NotFound),
            500 => Ok(Status::Error),
            other => Err(format!("unknown status code {other}")),
        }
    }
}

/// Result of one contract invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Outcome status
    pub status: Status,
    /// Human-readable message, empty on success
    pub message: String,
    /// Serialized record or confirmation object, empty on failure
    pub payload: Vec<u8>,
}

impl Response {
    /// Create a successful response.
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            message: String::new(),
            payload,
        }
    }

    /// Create a response describing an error.
    pub fn from_error(error: &ContractError) -> Self {
        Self {
            status: error.status(),
            message: error.to_string(),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Ok
    }

    /// Decode the payload as JSON.
    pub fn payload_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    /// Wrap the response for output by the host.
    pub fn to_envelope(&self, tx_id: impl Into<String>) -> ResponseEnvelope {
        let payload = if self.payload.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&self.payload).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&self.payload).into_owned())
            })
        };

        ResponseEnvelope {
            tx_id: tx_id.into(),
            status: self.status,
            message: self.message.clone(),
            payload,
        }
    }
}

impl From<Result<Vec<u8>, ContractError>> for Response {
    fn from(result: Result<Vec<u8>, ContractError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::from_error(&e),
        }
    }
}

/// JSON form of a response, as printed by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub status: Status,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub message: String,
    pub payload: serde_json::Value,
}
