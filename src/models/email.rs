use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::checks::is_rfc3339;
use crate::domain::{
    FieldPath, JsonPayload, MultipartPayload, Rule, Schema, Validate, ValidationReport,
};
use crate::models::{MessageStatus, NOTIFY_CONTENT_TYPES};
use crate::transport::{Attachment, MultipartBody, MultipartError, MultipartWriter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Body of `POST /email/2/send`, sent as `multipart/form-data`.
pub struct EmailSendRequest {
    /// Sender, e.g. `Jane Smith <jane.smith@somecompany.com>`.
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub reply_to: Option<String>,
    pub attachments: Vec<Attachment>,
    pub intermediate_report: bool,
    pub notify_url: Option<String>,
    pub notify_content_type: Option<String>,
    pub callback_data: Option<String>,
    pub tracking_url: Option<String>,
    /// RFC 3339 timestamp.
    pub send_at: Option<String>,
}

static SEND: LazyLock<Schema<EmailSendRequest>> = LazyLock::new(|| {
    Schema::<EmailSendRequest>::builder()
        .field("from", [Rule::Required], |r| (&r.from).into())
        .field("to", [Rule::Required, Rule::Dive, Rule::Email], |r| {
            (&r.to).into()
        })
        .field("cc", [Rule::OmitEmpty, Rule::Dive, Rule::Email], |r| {
            (&r.cc).into()
        })
        .field("bcc", [Rule::OmitEmpty, Rule::Dive, Rule::Email], |r| {
            (&r.bcc).into()
        })
        .field("subject", [Rule::Required], |r| (&r.subject).into())
        .field("replyTo", [Rule::OmitEmpty, Rule::Email], |r| {
            (&r.reply_to).into()
        })
        .field("notifyUrl", [Rule::OmitEmpty, Rule::Url], |r| {
            (&r.notify_url).into()
        })
        .field(
            "notifyContentType",
            [Rule::OmitEmpty, Rule::one_of(NOTIFY_CONTENT_TYPES)],
            |r| (&r.notify_content_type).into(),
        )
        .field("callbackData", [Rule::OmitEmpty, Rule::lte(4000)], |r| {
            (&r.callback_data).into()
        })
        .field("trackingUrl", [Rule::OmitEmpty, Rule::Url], |r| {
            (&r.tracking_url).into()
        })
        .struct_rule(|r, level| {
            if r.send_at.as_deref().is_some_and(|at| !is_rfc3339(at)) {
                level.report("sendAt", "rfc3339", "");
            }
        })
        .build()
});

impl Validate for EmailSendRequest {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        SEND.check(self, path, report);
    }
}

impl MultipartPayload for EmailSendRequest {
    fn to_multipart(&self) -> Result<MultipartBody, MultipartError> {
        let mut writer = MultipartWriter::new();
        writer
            .text("from", &self.from)
            .texts("to", &self.to)
            .texts("cc", &self.cc)
            .texts("bcc", &self.bcc)
            .text("subject", &self.subject)
            .text_opt("text", self.text.as_deref())
            .text_opt("html", self.html.as_deref())
            .text_opt("replyTo", self.reply_to.as_deref());
        for attachment in &self.attachments {
            writer.file("attachment", attachment);
        }
        if self.intermediate_report {
            writer.text("intermediateReport", "true");
        }
        writer
            .text_opt("notifyUrl", self.notify_url.as_deref())
            .text_opt("notifyContentType", self.notify_content_type.as_deref())
            .text_opt("callbackData", self.callback_data.as_deref())
            .text_opt("trackingUrl", self.tracking_url.as_deref())
            .text_opt("sendAt", self.send_at.as_deref());
        Ok(writer.finish())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSendResponse {
    pub bulk_id: Option<String>,
    pub messages: Vec<EmailSentMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSentMessage {
    pub to: Option<String>,
    pub message_count: u32,
    pub message_id: Option<String>,
    pub status: MessageStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `PUT /email/1/domains/{domainName}/tracking`.
pub struct EmailTrackingRequest {
    pub open: bool,
    pub clicks: bool,
    pub unsubscribe: bool,
}

impl Validate for EmailTrackingRequest {
    fn validate_into(&self, _path: &FieldPath, _report: &mut ValidationReport) {}
}

impl JsonPayload for EmailTrackingRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailDomain {
    pub domain_id: i64,
    pub domain_name: Option<String>,
    pub active: bool,
    pub tracking: EmailDomainTracking,
    pub dns_records: Vec<EmailDnsRecord>,
    pub blocked: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailDomainTracking {
    pub clicks: bool,
    pub opens: bool,
    pub unsubscribe: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailDnsRecord {
    pub record_type: Option<String>,
    pub name: Option<String>,
    pub expected_value: Option<String>,
    pub verified: bool,
}
