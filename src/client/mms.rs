use crate::client::{CancelScope, InfobipClient, InfobipError};
use crate::domain::ApiResponse;
use crate::models::mms::{MmsSendRequest, MmsSendResponse};

impl InfobipClient {
    /// Send a single MMS. The head goes as a JSON part, media as a file part.
    pub async fn send_mms(
        &self,
        scope: &CancelScope,
        request: &MmsSendRequest,
    ) -> Result<ApiResponse<MmsSendResponse>, InfobipError> {
        self.post_multipart(scope, "mms/1/single", request, &[])
            .await
    }
}
