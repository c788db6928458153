use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::checks::{MIN_DELIVERY_WINDOW_MINUTES, is_rfc3339, window_is_at_least};
use crate::domain::{
    FieldPath, FieldValue, JsonPayload, Rule, Rules, Schema, Validate, ValidationReport,
};
use crate::models::{MessageError, MessagePrice, MessageStatus, NOTIFY_CONTENT_TYPES};
use crate::transport::{QueryParam, QueryParams, ToQueryParams};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /sms/2/text/advanced`.
pub struct SmsAdvancedTextRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_id: Option<String>,
    pub messages: Vec<SmsTextualMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sending_speed_limit: Option<SendingSpeedLimit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsTextualMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub destinations: Vec<SmsDestination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flash: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    /// Minutes; the provider caps it at 48 hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<u32>,
    /// RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time_window: Option<SmsDeliveryTimeWindow>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub intermediate_report: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsDestination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub to: String,
}

impl SmsDestination {
    pub fn to(number: impl Into<String>) -> Self {
        Self {
            message_id: None,
            to: number.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DeliveryDay {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "MONDAY",
            Self::Tuesday => "TUESDAY",
            Self::Wednesday => "WEDNESDAY",
            Self::Thursday => "THURSDAY",
            Self::Friday => "FRIDAY",
            Self::Saturday => "SATURDAY",
            Self::Sunday => "SUNDAY",
        }
    }
}

impl<'a> From<&'a DeliveryDay> for FieldValue<'a> {
    fn from(value: &'a DeliveryDay) -> Self {
        Self::Str(value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Days and hours during which messages may be delivered.
///
/// When `from` is set, `to` must be set too and lie at least an hour later.
pub struct SmsDeliveryTimeWindow {
    pub days: Vec<DeliveryDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DeliveryTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DeliveryTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTime {
    pub hour: u32,
    pub minute: u32,
}

impl DeliveryTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendingSpeedLimit {
    pub amount: u32,
    /// `MINUTE`, `HOUR` or `DAY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<String>,
}

static ADVANCED_TEXT: LazyLock<Schema<SmsAdvancedTextRequest>> = LazyLock::new(|| {
    Schema::<SmsAdvancedTextRequest>::builder()
        .field("messages", [Rule::Required, Rule::Dive], |r| {
            FieldValue::nested_seq(&r.messages)
        })
        .field("sendingSpeedLimit", Rules::default(), |r| {
            FieldValue::nested_opt(&r.sending_speed_limit)
        })
        .build()
});

static TEXTUAL_MESSAGE: LazyLock<Schema<SmsTextualMessage>> = LazyLock::new(|| {
    Schema::<SmsTextualMessage>::builder()
        .field("destinations", [Rule::Required, Rule::Dive], |m| {
            FieldValue::nested_seq(&m.destinations)
        })
        .field("notifyUrl", [Rule::OmitEmpty, Rule::Url], |m| {
            (&m.notify_url).into()
        })
        .field(
            "notifyContentType",
            [Rule::OmitEmpty, Rule::one_of(NOTIFY_CONTENT_TYPES)],
            |m| (&m.notify_content_type).into(),
        )
        .field("callbackData", [Rule::OmitEmpty, Rule::lte(4000)], |m| {
            (&m.callback_data).into()
        })
        .field("validityPeriod", [Rule::OmitEmpty, Rule::lte(2880)], |m| {
            (&m.validity_period).into()
        })
        .field("deliveryTimeWindow", Rules::default(), |m| {
            FieldValue::nested_opt(&m.delivery_time_window)
        })
        .struct_rule(|m, level| {
            if m.send_at.as_deref().is_some_and(|at| !is_rfc3339(at)) {
                level.report("sendAt", "rfc3339", "");
            }
        })
        .build()
});

static DESTINATION: LazyLock<Schema<SmsDestination>> = LazyLock::new(|| {
    Schema::<SmsDestination>::builder()
        .field("messageId", [Rule::OmitEmpty, Rule::lte(200)], |d| {
            (&d.message_id).into()
        })
        .field("to", [Rule::Required, Rule::E164], |d| (&d.to).into())
        .build()
});

static TIME_WINDOW: LazyLock<Schema<SmsDeliveryTimeWindow>> = LazyLock::new(|| {
    Schema::<SmsDeliveryTimeWindow>::builder()
        .field("days", [Rule::Required], |w| (&w.days).into())
        .field("from", Rules::default(), |w| FieldValue::nested_opt(&w.from))
        .field("to", Rules::default(), |w| FieldValue::nested_opt(&w.to))
        .struct_rule(|w, level| {
            let Some(from) = w.from else {
                return;
            };
            match w.to {
                None => level.report("to", "required_with", "from"),
                Some(to)
                    if !window_is_at_least(
                        (from.hour, from.minute),
                        (to.hour, to.minute),
                        MIN_DELIVERY_WINDOW_MINUTES,
                    ) =>
                {
                    level.report("to", "min_window", MIN_DELIVERY_WINDOW_MINUTES.to_string());
                }
                Some(_) => {}
            }
        })
        .build()
});

static DELIVERY_TIME: LazyLock<Schema<DeliveryTime>> = LazyLock::new(|| {
    Schema::<DeliveryTime>::builder()
        .field("hour", [Rule::lte(23)], |t| (&t.hour).into())
        .field("minute", [Rule::lte(59)], |t| (&t.minute).into())
        .build()
});

static SPEED_LIMIT: LazyLock<Schema<SendingSpeedLimit>> = LazyLock::new(|| {
    Schema::<SendingSpeedLimit>::builder()
        .field("amount", [Rule::Required], |s| (&s.amount).into())
        .field(
            "timeUnit",
            [Rule::OmitEmpty, Rule::one_of(["MINUTE", "HOUR", "DAY"])],
            |s| (&s.time_unit).into(),
        )
        .build()
});

impl Validate for SmsAdvancedTextRequest {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        ADVANCED_TEXT.check(self, path, report);
    }
}

impl Validate for SmsTextualMessage {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TEXTUAL_MESSAGE.check(self, path, report);
    }
}

impl Validate for SmsDestination {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        DESTINATION.check(self, path, report);
    }
}

impl Validate for SmsDeliveryTimeWindow {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TIME_WINDOW.check(self, path, report);
    }
}

impl Validate for DeliveryTime {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        DELIVERY_TIME.check(self, path, report);
    }
}

impl Validate for SendingSpeedLimit {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        SPEED_LIMIT.check(self, path, report);
    }
}

impl JsonPayload for SmsAdvancedTextRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsResponse {
    pub bulk_id: Option<String>,
    pub messages: Vec<SmsResponseDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsResponseDetails {
    pub message_id: Option<String>,
    pub status: MessageStatus,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filters for `GET /sms/1/logs`. Unset fields are left out of the query.
pub struct SmsLogsParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub bulk_ids: Vec<String>,
    pub message_ids: Vec<String>,
    pub general_status: Option<String>,
    pub sent_since: Option<DateTime<Utc>>,
    pub sent_until: Option<DateTime<Utc>>,
    pub limit: u32,
    pub mcc: Option<String>,
    pub mnc: Option<String>,
}

impl ToQueryParams for SmsLogsParams {
    fn to_query_params(&self) -> Vec<QueryParam> {
        QueryParams::new()
            .push_opt("from", self.from.as_deref())
            .push_opt("to", self.to.as_deref())
            .push_all("bulkId", self.bulk_ids.iter().map(String::as_str))
            .push_all("messageId", self.message_ids.iter().map(String::as_str))
            .push_opt("generalStatus", self.general_status.as_deref())
            .push_time("sentSince", self.sent_since)
            .push_time("sentUntil", self.sent_until)
            .push_int("limit", i64::from(self.limit))
            .push_opt("mcc", self.mcc.as_deref())
            .push_opt("mnc", self.mnc.as_deref())
            .into_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsLogsResponse {
    pub results: Vec<SmsLog>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsLog {
    pub bulk_id: Option<String>,
    pub message_id: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub text: Option<String>,
    pub sent_at: Option<String>,
    pub done_at: Option<String>,
    pub sms_count: u32,
    pub mcc_mnc: Option<String>,
    pub price: Option<MessagePrice>,
    pub status: MessageStatus,
    pub error: Option<MessageError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filters for `GET /sms/1/reports`.
pub struct SmsReportsParams {
    pub bulk_id: Option<String>,
    pub message_id: Option<String>,
    pub limit: u32,
}

impl ToQueryParams for SmsReportsParams {
    fn to_query_params(&self) -> Vec<QueryParam> {
        QueryParams::new()
            .push_opt("bulkId", self.bulk_id.as_deref())
            .push_opt("messageId", self.message_id.as_deref())
            .push_int("limit", i64::from(self.limit))
            .into_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsDeliveryReportsResponse {
    pub results: Vec<SmsDeliveryReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsDeliveryReport {
    pub bulk_id: Option<String>,
    pub message_id: Option<String>,
    pub to: Option<String>,
    pub sent_at: Option<String>,
    pub done_at: Option<String>,
    pub sms_count: u32,
    pub callback_data: Option<String>,
    pub price: Option<MessagePrice>,
    pub status: MessageStatus,
    pub error: Option<MessageError>,
}
