use crate::client::{CancelScope, InfobipClient, InfobipError};
use crate::domain::{ApiResponse, ResponseDetails};
use crate::models::whatsapp::{
    WhatsAppBulkMessageInfo, WhatsAppBulkTemplateRequest, WhatsAppLocationMessage,
    WhatsAppSingleMessageInfo, WhatsAppTextMessage,
};
use crate::transport::path_segment;

impl InfobipClient {
    pub async fn send_whatsapp_text(
        &self,
        scope: &CancelScope,
        message: &WhatsAppTextMessage,
    ) -> Result<ApiResponse<WhatsAppSingleMessageInfo>, InfobipError> {
        self.post_json(scope, "whatsapp/1/message/text", message, &[])
            .await
    }

    pub async fn send_whatsapp_location(
        &self,
        scope: &CancelScope,
        message: &WhatsAppLocationMessage,
    ) -> Result<ApiResponse<WhatsAppSingleMessageInfo>, InfobipError> {
        self.post_json(scope, "whatsapp/1/message/location", message, &[])
            .await
    }

    /// Send template messages; templates must be registered and approved first.
    pub async fn send_whatsapp_template(
        &self,
        scope: &CancelScope,
        request: &WhatsAppBulkTemplateRequest,
    ) -> Result<ApiResponse<WhatsAppBulkMessageInfo>, InfobipError> {
        self.post_json(scope, "whatsapp/1/message/template", request, &[])
            .await
    }

    /// Delete every language variant of template `name` registered for `sender`.
    pub async fn delete_whatsapp_template(
        &self,
        scope: &CancelScope,
        sender: &str,
        name: &str,
    ) -> Result<ResponseDetails, InfobipError> {
        let path = format!(
            "whatsapp/2/senders/{}/templates/{}",
            path_segment(sender),
            path_segment(name)
        );
        self.delete(scope, &path, &[]).await
    }
}
