use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::checks::is_rfc3339;
use crate::domain::{
    FieldPath, FieldValue, MultipartPayload, Rule, Rules, Schema, Validate, ValidationReport,
};
use crate::models::MessageStatus;
use crate::models::sms::SmsDeliveryTimeWindow;
use crate::transport::{Attachment, MultipartBody, MultipartError, MultipartWriter};

#[derive(Debug, Clone, Default, PartialEq)]
/// Body of `POST /mms/1/single`: a JSON `head` part plus optional text, media and SMIL parts.
pub struct MmsSendRequest {
    pub head: MmsHead,
    pub text: Option<String>,
    pub media: Option<Attachment>,
    /// SMIL presentation, sent as an XML part.
    pub smil: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MmsHead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_period_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_at: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub intermediate_report: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time_window: Option<SmsDeliveryTimeWindow>,
}

static SEND: LazyLock<Schema<MmsSendRequest>> = LazyLock::new(|| {
    Schema::<MmsSendRequest>::builder()
        .field("head", Rules::default(), |r| FieldValue::nested(&r.head))
        .struct_rule(|r, level| {
            let has_text = r.text.as_deref().is_some_and(|text| !text.is_empty());
            if !has_text && r.media.is_none() && r.smil.is_none() {
                level.report("media", "required_without_all", "text smil");
            }
        })
        .build()
});

static HEAD: LazyLock<Schema<MmsHead>> = LazyLock::new(|| {
    Schema::<MmsHead>::builder()
        .field("to", [Rule::Required, Rule::E164], |h| (&h.to).into())
        .field("subject", [Rule::OmitEmpty, Rule::lte(50)], |h| {
            (&h.subject).into()
        })
        .field("callbackData", [Rule::OmitEmpty, Rule::lte(200)], |h| {
            (&h.callback_data).into()
        })
        .field("notifyUrl", [Rule::OmitEmpty, Rule::Url], |h| {
            (&h.notify_url).into()
        })
        .field("deliveryTimeWindow", Rules::default(), |h| {
            FieldValue::nested_opt(&h.delivery_time_window)
        })
        .struct_rule(|h, level| {
            if h.send_at.as_deref().is_some_and(|at| !is_rfc3339(at)) {
                level.report("sendAt", "rfc3339", "");
            }
        })
        .build()
});

impl Validate for MmsSendRequest {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        SEND.check(self, path, report);
    }
}

impl Validate for MmsHead {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        HEAD.check(self, path, report);
    }
}

impl MultipartPayload for MmsSendRequest {
    fn to_multipart(&self) -> Result<MultipartBody, MultipartError> {
        let mut writer = MultipartWriter::new();
        writer.json("head", &self.head)?;
        writer.text_opt("text", self.text.as_deref());
        if let Some(media) = &self.media {
            writer.file("media", media);
        }
        if let Some(smil) = &self.smil {
            writer.xml("smil", smil);
        }
        Ok(writer.finish())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MmsSendResponse {
    pub bulk_id: Option<String>,
    pub message_id: Option<String>,
    pub to: Option<String>,
    pub status: MessageStatus,
}
