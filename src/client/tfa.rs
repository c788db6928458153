use crate::client::{CancelScope, InfobipClient, InfobipError};
use crate::domain::ApiResponse;
use crate::models::tfa::{
    TfaStartAuthenticationResponse, TfaVerifyPinRequest, TfaVerifyPinResponse,
};
use crate::transport::path_segment;

impl InfobipClient {
    /// Check `request.pin` against the PIN sent under `pin_id`.
    ///
    /// A wrong PIN is still a `200`; see [`TfaVerifyPinResponse::verified`].
    pub async fn verify_tfa_pin(
        &self,
        scope: &CancelScope,
        pin_id: &str,
        request: &TfaVerifyPinRequest,
    ) -> Result<ApiResponse<TfaVerifyPinResponse>, InfobipError> {
        let path = format!("2fa/2/pin/{}/verify", path_segment(pin_id));
        self.post_json(scope, &path, request, &[]).await
    }

    pub async fn resend_tfa_pin_over_sms(
        &self,
        scope: &CancelScope,
        pin_id: &str,
    ) -> Result<ApiResponse<TfaStartAuthenticationResponse>, InfobipError> {
        let path = format!("2fa/2/pin/{}/resend", path_segment(pin_id));
        self.post_no_body(scope, &path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::http::Method;
    use crate::client::tests::{FakeTransport, header, make_client};

    use super::*;

    #[tokio::test]
    async fn verify_posts_pin() {
        let json = r#"{"msisdn":"385951234567","verified":true,"attemptsRemaining":0}"#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone());

        let response = client
            .verify_tfa_pin(
                &CancelScope::new(),
                "9C817C6F8AF3D48F9FE553282AFA2B67",
                &TfaVerifyPinRequest::new("1598"),
            )
            .await
            .unwrap();
        assert!(response.result.verified);

        let sent = transport.last_request();
        assert_eq!(
            sent.url.as_str(),
            "https://example.invalid/2fa/2/pin/9C817C6F8AF3D48F9FE553282AFA2B67/verify"
        );
        assert_eq!(sent.body.as_deref(), Some(br#"{"pin":"1598"}"#.as_slice()));
    }

    #[tokio::test]
    async fn resend_has_no_body() {
        let json = r#"{"pinId":"p-1","to":"385951234567","smsStatus":"MESSAGE_SENT"}"#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone());

        let response = client
            .resend_tfa_pin_over_sms(&CancelScope::new(), "p-1")
            .await
            .unwrap();
        assert_eq!(response.result.sms_status.as_deref(), Some("MESSAGE_SENT"));

        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Post);
        assert!(sent.body.is_none());
        assert!(header(&sent, "content-type").is_none());
    }

    #[tokio::test]
    async fn unknown_pin_id_is_data() {
        let envelope = r#"{"requestError":{"serviceException":{"messageId":"BAD_REQUEST","text":"Invalid pin id"}}}"#;
        let client = make_client(FakeTransport::new(400, envelope));
        let response = client
            .resend_tfa_pin_over_sms(&CancelScope::new(), "nope")
            .await
            .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.result, TfaStartAuthenticationResponse::default());
        assert_eq!(response.details.error.text(), "Invalid pin id");
    }
}
