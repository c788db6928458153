use crate::client::{CancelScope, InfobipClient, InfobipError};
use crate::domain::{ApiResponse, ResponseDetails};
use crate::models::account::{CreateSessionRequest, CreateSessionResponse};

const SESSION_PATH: &str = "auth/1/session";

impl InfobipClient {
    /// Exchange username and password for a session token.
    pub async fn create_session(
        &self,
        scope: &CancelScope,
        request: &CreateSessionRequest,
    ) -> Result<ApiResponse<CreateSessionResponse>, InfobipError> {
        self.post_json(scope, SESSION_PATH, request, &[]).await
    }

    pub async fn destroy_session(
        &self,
        scope: &CancelScope,
    ) -> Result<ResponseDetails, InfobipError> {
        self.delete(scope, SESSION_PATH, &[]).await
    }
}
