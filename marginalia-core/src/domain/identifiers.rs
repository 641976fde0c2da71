//! Decoding of client-supplied identifiers.
//!
//! Every identifier crossing the API boundary passes through here before any
//! store access, so a malformed id never reaches a repository.

use marginalia_model::ObjectId;

use crate::error::{Result, TrackerError};

/// Decode the 24-hex-digit external form.
pub fn decode_id(text: &str) -> Result<ObjectId> {
    ObjectId::parse_str(text).map_err(|e| TrackerError::InvalidIdentifier(e.to_string()))
}

/// Decode an optional reference where absence and `""` both mean "none".
pub fn decode_optional_id(text: Option<&str>) -> Result<Option<ObjectId>> {
    match text {
        None | Some("") => Ok(None),
        Some(text) => decode_id(text).map(Some),
    }
}
