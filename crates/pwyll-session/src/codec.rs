//! Encoding of the session payload for storage.
//!
//! Both backends store the mapping as one opaque blob, rewritten wholesale
//! on every save. No compression, no versioning; schema evolution is the
//! caller's concern.

use crate::error::Result;
use crate::session::SessionValues;

/// Encode a session mapping for storage.
pub fn encode(values: &SessionValues) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(values)?)
}

/// Decode a stored payload back into a session mapping.
///
/// Truncated or foreign-format input fails outright rather than yielding
/// partial data.
pub fn decode(payload: &[u8]) -> Result<SessionValues> {
    Ok(serde_json::from_slice(payload)?)
}
