use crate::client::{CancelScope, InfobipClient, InfobipError};
use crate::domain::{ApiResponse, ResponseDetails};
use crate::models::email::{EmailDomain, EmailSendRequest, EmailSendResponse, EmailTrackingRequest};
use crate::transport::path_segment;

impl InfobipClient {
    /// Send an email, with attachments, as `multipart/form-data`.
    pub async fn send_email(
        &self,
        scope: &CancelScope,
        request: &EmailSendRequest,
    ) -> Result<ApiResponse<EmailSendResponse>, InfobipError> {
        self.post_multipart(scope, "email/2/send", request, &[])
            .await
    }

    pub async fn update_email_domain_tracking(
        &self,
        scope: &CancelScope,
        domain: &str,
        request: &EmailTrackingRequest,
    ) -> Result<ApiResponse<EmailDomain>, InfobipError> {
        let path = format!("email/1/domains/{}/tracking", path_segment(domain));
        self.put_json(scope, &path, request, &[]).await
    }

    pub async fn delete_email_domain(
        &self,
        scope: &CancelScope,
        domain: &str,
    ) -> Result<ResponseDetails, InfobipError> {
        let path = format!("email/1/domains/{}", path_segment(domain));
        self.delete(scope, &path, &[]).await
    }
}
