use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use geocache_core::{CellData, GridCoord};
use thiserror::Error;

use crate::memory::{decode_records, encode_records, RecordError};

const SAVE_DOMAIN: &str = "geocache";
const SAVE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded save payload.
pub const SAVE_CODE_HEADER: &str = "geocache:v1";
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while decoding save codes.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("save code was empty")]
    EmptyPayload,
    /// The encoded save did not contain a version segment.
    #[error("save code is missing the version")]
    MissingVersion,
    /// The encoded save did not include the payload segment.
    #[error("save code is missing the payload")]
    MissingPayload,
    /// The encoded save used an unexpected prefix segment.
    #[error("save code prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded save used an unsupported version identifier.
    #[error("save code version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode save payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse save payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// A decoded record breaks the token rules.
    #[error("save code holds token {value} at {coord:?}, which is not a power of two")]
    InvalidRecord {
        /// Coordinate of the offending record.
        coord: GridCoord,
        /// Value found in the record.
        value: u32,
    },
}

impl From<RecordError> for TransferError {
    fn from(error: RecordError) -> Self {
        match error {
            RecordError::Malformed(error) => Self::InvalidPayload(error),
            RecordError::InvalidToken { coord, value } => Self::InvalidRecord { coord, value },
        }
    }
}

/// Encodes modified cells into a single-line save code.
pub fn encode_save_code(records: &[CellData]) -> Result<String, TransferError> {
    let json = encode_records(records)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SAVE_CODE_HEADER}:{encoded}"))
}

/// Decodes modified cells from a save code.
pub fn decode_save_code(value: &str) -> Result<Vec<CellData>, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().unwrap_or_default();
    let version = parts.next().ok_or(TransferError::MissingVersion)?;
    let payload = parts.next().ok_or(TransferError::MissingPayload)?;

    if domain != SAVE_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SAVE_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let json = String::from_utf8_lossy(&bytes);
    Ok(decode_records(&json)?)
}
