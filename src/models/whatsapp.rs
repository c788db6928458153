use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::checks::contains_url;
use crate::domain::{
    FieldPath, FieldValue, JsonPayload, Rule, Rules, Schema, Validate, ValidationReport,
};
use crate::models::MessageStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /whatsapp/1/message/text`.
pub struct WhatsAppTextMessage {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub content: WhatsAppTextContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppTextContent {
    pub text: String,
    /// Ask WhatsApp to render a preview of the first URL in `text`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preview_url: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /whatsapp/1/message/location`.
pub struct WhatsAppLocationMessage {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub content: WhatsAppLocationContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppLocationContent {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /whatsapp/1/message/template`.
pub struct WhatsAppBulkTemplateRequest {
    pub messages: Vec<WhatsAppTemplateMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppTemplateMessage {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub content: WhatsAppTemplateContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppTemplateContent {
    pub template_name: String,
    pub template_data: WhatsAppTemplateData,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppTemplateData {
    pub body: WhatsAppTemplateBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<WhatsAppTemplateHeader>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppTemplateBody {
    pub placeholders: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Template header. Which fields are required depends on `type`.
pub struct WhatsAppTemplateHeader {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

static TEXT_MESSAGE: LazyLock<Schema<WhatsAppTextMessage>> = LazyLock::new(|| {
    Schema::<WhatsAppTextMessage>::builder()
        .field("from", [Rule::Required, Rule::lte(24)], |m| (&m.from).into())
        .field("to", [Rule::Required, Rule::lte(24)], |m| (&m.to).into())
        .field("messageId", [Rule::OmitEmpty, Rule::lte(50)], |m| {
            (&m.message_id).into()
        })
        .field("content", Rules::default(), |m| {
            FieldValue::nested(&m.content)
        })
        .field("callbackData", [Rule::OmitEmpty, Rule::lte(4000)], |m| {
            (&m.callback_data).into()
        })
        .field("notifyUrl", [Rule::OmitEmpty, Rule::Url, Rule::lte(2048)], |m| {
            (&m.notify_url).into()
        })
        .build()
});

static TEXT_CONTENT: LazyLock<Schema<WhatsAppTextContent>> = LazyLock::new(|| {
    Schema::<WhatsAppTextContent>::builder()
        .field("text", [Rule::Required, Rule::lte(4096)], |c| (&c.text).into())
        .struct_rule(|c, level| {
            if c.preview_url && !contains_url(&c.text) {
                level.report("text", "contains_url", "");
            }
        })
        .build()
});

static LOCATION_MESSAGE: LazyLock<Schema<WhatsAppLocationMessage>> = LazyLock::new(|| {
    Schema::<WhatsAppLocationMessage>::builder()
        .field("from", [Rule::Required, Rule::lte(24)], |m| (&m.from).into())
        .field("to", [Rule::Required, Rule::lte(24)], |m| (&m.to).into())
        .field("messageId", [Rule::OmitEmpty, Rule::lte(50)], |m| {
            (&m.message_id).into()
        })
        .field("content", Rules::default(), |m| {
            FieldValue::nested(&m.content)
        })
        .field("callbackData", [Rule::OmitEmpty, Rule::lte(4000)], |m| {
            (&m.callback_data).into()
        })
        .field("notifyUrl", [Rule::OmitEmpty, Rule::Url, Rule::lte(2048)], |m| {
            (&m.notify_url).into()
        })
        .build()
});

static LOCATION_CONTENT: LazyLock<Schema<WhatsAppLocationContent>> = LazyLock::new(|| {
    Schema::<WhatsAppLocationContent>::builder()
        .field("latitude", [Rule::Latitude], |c| (&c.latitude).into())
        .field("longitude", [Rule::Longitude], |c| (&c.longitude).into())
        .field("name", [Rule::OmitEmpty, Rule::lte(1000)], |c| (&c.name).into())
        .field("address", [Rule::OmitEmpty, Rule::lte(1000)], |c| {
            (&c.address).into()
        })
        .build()
});

static BULK_TEMPLATE: LazyLock<Schema<WhatsAppBulkTemplateRequest>> = LazyLock::new(|| {
    Schema::<WhatsAppBulkTemplateRequest>::builder()
        .field("messages", [Rule::Required, Rule::Dive], |r| {
            FieldValue::nested_seq(&r.messages)
        })
        .build()
});

static TEMPLATE_MESSAGE: LazyLock<Schema<WhatsAppTemplateMessage>> = LazyLock::new(|| {
    Schema::<WhatsAppTemplateMessage>::builder()
        .field("from", [Rule::Required, Rule::lte(24)], |m| (&m.from).into())
        .field("to", [Rule::Required, Rule::lte(24)], |m| (&m.to).into())
        .field("messageId", [Rule::OmitEmpty, Rule::lte(50)], |m| {
            (&m.message_id).into()
        })
        .field("content", Rules::default(), |m| {
            FieldValue::nested(&m.content)
        })
        .field("callbackData", [Rule::OmitEmpty, Rule::lte(4000)], |m| {
            (&m.callback_data).into()
        })
        .field("notifyUrl", [Rule::OmitEmpty, Rule::Url, Rule::lte(2048)], |m| {
            (&m.notify_url).into()
        })
        .build()
});

static TEMPLATE_CONTENT: LazyLock<Schema<WhatsAppTemplateContent>> = LazyLock::new(|| {
    Schema::<WhatsAppTemplateContent>::builder()
        .field("templateName", [Rule::Required, Rule::lte(512)], |c| {
            (&c.template_name).into()
        })
        .field("templateData", Rules::default(), |c| {
            FieldValue::nested(&c.template_data)
        })
        .field("language", [Rule::Required], |c| (&c.language).into())
        .build()
});

static TEMPLATE_DATA: LazyLock<Schema<WhatsAppTemplateData>> = LazyLock::new(|| {
    Schema::<WhatsAppTemplateData>::builder()
        .field("header", Rules::default(), |d| FieldValue::nested_opt(&d.header))
        .build()
});

static TEMPLATE_HEADER: LazyLock<Schema<WhatsAppTemplateHeader>> = LazyLock::new(|| {
    Schema::<WhatsAppTemplateHeader>::builder()
        .field(
            "type",
            [
                Rule::Required,
                Rule::one_of(["TEXT", "DOCUMENT", "IMAGE", "VIDEO", "LOCATION"]),
            ],
            |h| (&h.kind).into(),
        )
        .field(
            "placeholder",
            [Rule::required_if("type", "TEXT")],
            |h| (&h.placeholder).into(),
        )
        .field("mediaUrl", [Rule::OmitEmpty, Rule::Url, Rule::lte(2048)], |h| {
            (&h.media_url).into()
        })
        .field(
            "latitude",
            [Rule::required_if("type", "LOCATION"), Rule::Latitude],
            |h| (&h.latitude).into(),
        )
        .field(
            "longitude",
            [Rule::required_if("type", "LOCATION"), Rule::Longitude],
            |h| (&h.longitude).into(),
        )
        .build()
});

impl Validate for WhatsAppTextMessage {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TEXT_MESSAGE.check(self, path, report);
    }
}

impl Validate for WhatsAppTextContent {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TEXT_CONTENT.check(self, path, report);
    }
}

impl Validate for WhatsAppLocationMessage {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        LOCATION_MESSAGE.check(self, path, report);
    }
}

impl Validate for WhatsAppLocationContent {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        LOCATION_CONTENT.check(self, path, report);
    }
}

impl Validate for WhatsAppBulkTemplateRequest {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        BULK_TEMPLATE.check(self, path, report);
    }
}

impl Validate for WhatsAppTemplateMessage {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TEMPLATE_MESSAGE.check(self, path, report);
    }
}

impl Validate for WhatsAppTemplateContent {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TEMPLATE_CONTENT.check(self, path, report);
    }
}

impl Validate for WhatsAppTemplateData {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TEMPLATE_DATA.check(self, path, report);
    }
}

impl Validate for WhatsAppTemplateHeader {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        TEMPLATE_HEADER.check(self, path, report);
    }
}

impl JsonPayload for WhatsAppTextMessage {}
impl JsonPayload for WhatsAppLocationMessage {}
impl JsonPayload for WhatsAppBulkTemplateRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsAppSingleMessageInfo {
    pub to: Option<String>,
    pub message_count: u32,
    pub message_id: Option<String>,
    pub status: MessageStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsAppBulkMessageInfo {
    pub messages: Vec<WhatsAppSingleMessageInfo>,
    pub bulk_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_message(text: &str, preview_url: bool) -> WhatsAppTextMessage {
        WhatsAppTextMessage {
            from: "441134960000".to_owned(),
            to: "441134960001".to_owned(),
            content: WhatsAppTextContent {
                text: text.to_owned(),
                preview_url,
            },
            ..Default::default()
        }
    }

    fn header(kind: &str) -> WhatsAppTemplateHeader {
        WhatsAppTemplateHeader {
            kind: kind.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn preview_url_requires_a_link_in_text() {
        assert!(text_message("Hi there", false).validate().is_empty());
        assert!(
            text_message("Docs at https://www.infobip.com/docs", true)
                .validate()
                .is_empty()
        );

        let report = text_message("Hi there", true).validate();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations()[0].field, "content.text");
        assert_eq!(report.violations()[0].rule, "contains_url");
    }

    #[test]
    fn text_length_is_bounded() {
        let report = text_message(&"a".repeat(4097), false).validate();
        assert_eq!(report.violations()[0].field, "content.text");
        assert_eq!(report.violations()[0].rule, "lte");
        assert_eq!(report.violations()[0].param, "4096");
    }

    #[test]
    fn missing_sender_and_recipient() {
        let mut message = text_message("Hi", false);
        message.from.clear();
        message.to.clear();
        let fields: Vec<_> = message
            .validate()
            .iter()
            .map(|v| v.field.clone())
            .collect();
        assert_eq!(fields, ["from", "to"]);
    }

    #[test]
    fn location_bounds() {
        let mut message = WhatsAppLocationMessage {
            from: "441134960000".to_owned(),
            to: "441134960001".to_owned(),
            content: WhatsAppLocationContent {
                latitude: 44.9526,
                longitude: -93.0773,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(message.validate().is_empty());

        message.content.latitude = 91.0;
        message.content.longitude = -181.0;
        let rules: Vec<_> = message
            .validate()
            .iter()
            .map(|v| (v.field.clone(), v.rule.clone()))
            .collect();
        assert_eq!(
            rules,
            [
                ("content.latitude".to_owned(), "latitude".to_owned()),
                ("content.longitude".to_owned(), "longitude".to_owned()),
            ]
        );
    }

    #[test]
    fn header_fields_depend_on_type() {
        let report = header("LOCATION").validate();
        let fields: Vec<_> = report.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["latitude", "longitude"]);
        assert_eq!(report.violations()[0].rule, "required_if");
        assert_eq!(report.violations()[0].param, "type LOCATION");

        let report = header("TEXT").validate();
        assert_eq!(report.violations()[0].field, "placeholder");

        assert!(header("IMAGE").validate().is_empty());

        let report = header("AUDIO").validate();
        assert_eq!(report.violations()[0].rule, "oneof");
    }

    #[test]
    fn template_messages_are_validated_in_depth() {
        let request = WhatsAppBulkTemplateRequest {
            messages: vec![WhatsAppTemplateMessage {
                from: "441134960000".to_owned(),
                to: "441134960001".to_owned(),
                content: WhatsAppTemplateContent {
                    template_name: "welcome".to_owned(),
                    template_data: WhatsAppTemplateData {
                        body: WhatsAppTemplateBody {
                            placeholders: vec!["Jane".to_owned()],
                        },
                        header: Some(WhatsAppTemplateHeader {
                            latitude: Some(45.0),
                            ..header("LOCATION")
                        }),
                    },
                    language: "en".to_owned(),
                },
                ..Default::default()
            }],
            bulk_id: None,
        };
        let report = request.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.violations()[0].field,
            "messages[0].content.templateData.header.longitude"
        );
    }

    #[test]
    fn serializes_provider_field_names() {
        let json = serde_json::to_value(text_message("see www.example.com", true)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "441134960000",
                "to": "441134960001",
                "content": {"text": "see www.example.com", "previewUrl": true}
            })
        );

        let json = serde_json::to_value(header("IMAGE")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "IMAGE"}));
    }
}
