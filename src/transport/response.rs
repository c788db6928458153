use serde::de::DeserializeOwned;

use crate::domain::{ErrorEnvelope, is_success_status};

/// Decode a success body into `T`. A blank body yields `T::default()`.
pub fn decode_success<T>(body: &[u8]) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

/// Best-effort decode of the provider error envelope.
///
/// Returns the zero envelope for success statuses, blank bodies and bodies that
/// are not an envelope. The status code stays authoritative either way.
pub fn decode_error_envelope(status: u16, body: &[u8]) -> Result<ErrorEnvelope, serde_json::Error> {
    if is_success_status(status) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ErrorEnvelope::default());
    }
    serde_json::from_slice(body)
}
