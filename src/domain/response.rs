use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// HTTP statuses treated as success; anything else carries an [`ErrorEnvelope`].
pub const SUCCESS_STATUSES: [u16; 4] = [200, 201, 202, 204];

/// Whether `status` is routed to the success target.
pub fn is_success_status(status: u16) -> bool {
    SUCCESS_STATUSES.contains(&status)
}

/// Provider error body:
/// `{ "requestError": { "serviceException": { "messageId", "text", "validationErrors" } } }`.
///
/// Every level defaults, so a partial body still decodes. The zero value means "no error".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_error: RequestError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_exception: ServiceException,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceException {
    /// Machine-readable tag, e.g. `UNAUTHORIZED` or `BAD_REQUEST`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Field path to human-readable violation messages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_errors: BTreeMap<String, Vec<String>>,
}

impl ErrorEnvelope {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn message_id(&self) -> &str {
        &self.request_error.service_exception.message_id
    }

    pub fn text(&self) -> &str {
        &self.request_error.service_exception.text
    }

    pub fn validation_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.request_error.service_exception.validation_errors
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Uniform companion of every engine call.
///
/// Populated from the HTTP response; `error` is filled only for non-success statuses
/// with a decodable body. The zero value means no response was received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDetails {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body_len: usize,
    pub error: ErrorEnvelope,
}

impl ResponseDetails {
    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    /// A response was received and its status is not a success status.
    pub fn is_api_error(&self) -> bool {
        self.status != 0 && !self.is_success()
    }

    /// First header value named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Decoded result plus response details.
///
/// `result` is `T::default()` whenever the status was not a success status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse<T> {
    pub result: T,
    pub details: ResponseDetails,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.details.is_success()
    }

    pub fn status(&self) -> u16 {
        self.details.status
    }

    pub fn into_parts(self) -> (T, ResponseDetails) {
        (self.result, self.details)
    }
}
