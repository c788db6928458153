use crate::client::{CancelScope, InfobipClient, InfobipError};
use crate::domain::ApiResponse;
use crate::models::sms::{
    SmsAdvancedTextRequest, SmsDeliveryReportsResponse, SmsLogsParams, SmsLogsResponse,
    SmsReportsParams, SmsResponse,
};
use crate::transport::ToQueryParams;

const SEND_ADVANCED_PATH: &str = "sms/2/text/advanced";
const LOGS_PATH: &str = "sms/1/logs";
const REPORTS_PATH: &str = "sms/1/reports";

impl InfobipClient {
    /// Send one or more text messages with per-message options.
    pub async fn send_sms_text_advanced(
        &self,
        scope: &CancelScope,
        request: &SmsAdvancedTextRequest,
    ) -> Result<ApiResponse<SmsResponse>, InfobipError> {
        self.post_json(scope, SEND_ADVANCED_PATH, request, &[]).await
    }

    /// Logs of sent messages, filtered by `params`.
    pub async fn get_sms_logs(
        &self,
        scope: &CancelScope,
        params: &SmsLogsParams,
    ) -> Result<ApiResponse<SmsLogsResponse>, InfobipError> {
        self.get(scope, LOGS_PATH, &params.to_query_params()).await
    }

    /// Delivery reports not fetched yet. Each report is returned only once.
    pub async fn get_sms_delivery_reports(
        &self,
        scope: &CancelScope,
        params: &SmsReportsParams,
    ) -> Result<ApiResponse<SmsDeliveryReportsResponse>, InfobipError> {
        self.get(scope, REPORTS_PATH, &params.to_query_params())
            .await
    }
}
