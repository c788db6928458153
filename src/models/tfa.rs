use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::{FieldPath, JsonPayload, Rule, Schema, Validate, ValidationReport};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Body of `POST /2fa/2/pin/{pinId}/verify`.
pub struct TfaVerifyPinRequest {
    pub pin: String,
}

impl TfaVerifyPinRequest {
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }
}

static VERIFY_PIN: LazyLock<Schema<TfaVerifyPinRequest>> = LazyLock::new(|| {
    Schema::<TfaVerifyPinRequest>::builder()
        .field("pin", [Rule::Required], |r| (&r.pin).into())
        .build()
});

impl Validate for TfaVerifyPinRequest {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        VERIFY_PIN.check(self, path, report);
    }
}

impl JsonPayload for TfaVerifyPinRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TfaVerifyPinResponse {
    pub msisdn: Option<String>,
    pub verified: bool,
    pub attempts_remaining: u32,
    pub pin_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Returned when a PIN is sent or resent.
pub struct TfaStartAuthenticationResponse {
    pub pin_id: Option<String>,
    pub to: Option<String>,
    pub nc_status: Option<String>,
    pub sms_status: Option<String>,
    pub call_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_is_required() {
        assert!(TfaVerifyPinRequest::new("1598").validate().is_empty());
        let report = TfaVerifyPinRequest::default().validate();
        assert_eq!(report.to_string(), "pin: failed on 'required'");
    }

    #[test]
    fn verify_response_decodes() {
        let response: TfaVerifyPinResponse = serde_json::from_str(
            r#"{"pinId":"9C81","msisdn":"385951234567","verified":false,"attemptsRemaining":0,"pinError":"NO_MORE_PIN_ATTEMPTS"}"#,
        )
        .unwrap();
        assert!(!response.verified);
        assert_eq!(response.pin_error.as_deref(), Some("NO_MORE_PIN_ATTEMPTS"));
    }
}
