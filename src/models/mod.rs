//! Request and response records for the endpoints the client exposes.
//!
//! Every request type carries its own rule table; the shared machinery lives
//! in [`crate::domain`].

use serde::{Deserialize, Serialize};

pub mod account;
pub mod email;
pub mod mms;
pub mod people;
pub mod sms;
pub mod tfa;
pub mod whatsapp;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Delivery status attached to sent messages and reports.
pub struct MessageStatus {
    pub group_id: i32,
    pub group_name: Option<String>,
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageError {
    pub group_id: i32,
    pub group_name: Option<String>,
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub permanent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagePrice {
    pub price_per_message: f64,
    pub currency: Option<String>,
}

/// `application/json` and `application/xml`, the two report formats a notify URL can receive.
pub(crate) const NOTIFY_CONTENT_TYPES: [&str; 2] = ["application/json", "application/xml"];
