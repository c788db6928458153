use serde::Serialize;

use crate::domain::validation::Validate;
use crate::transport::{MultipartBody, MultipartError, json};

/// A request body sent as `application/json`.
///
/// Implementors get [`JsonPayload::to_json`] for free; override it only when the
/// wire form differs from the `Serialize` impl.
pub trait JsonPayload: Validate + Serialize {
    /// Fails on NaN or infinite floats instead of sending them as `null`.
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        json::to_vec(self)
    }
}

/// A request body sent as `multipart/form-data`.
pub trait MultipartPayload: Validate {
    /// Assemble every part of the body. The boundary travels with the result.
    fn to_multipart(&self) -> Result<MultipartBody, MultipartError>;
}
