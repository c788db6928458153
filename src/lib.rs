//! Typed Rust client for the Infobip multi-channel HTTP API.
//!
//! The crate is split into three layers: a domain layer of strong types and
//! declarative payload validation, a transport layer for wire-format details
//! (query strings, multipart bodies, error envelopes), and a client layer
//! that runs the validate-encode-send-decode pipeline for every endpoint.
//!
//! Error statuses (4xx/5xx) are not Rust errors: they come back as
//! [`ResponseDetails`] with the decoded [`ErrorEnvelope`].
//!
//! ```rust,no_run
//! use infobip::models::sms::{SmsAdvancedTextRequest, SmsDestination, SmsTextualMessage};
//! use infobip::{CancelScope, InfobipClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), infobip::InfobipError> {
//!     let client = InfobipClient::new("...", "https://xxxxx.api.infobip.com")?;
//!     let request = SmsAdvancedTextRequest {
//!         messages: vec![SmsTextualMessage {
//!             destinations: vec![SmsDestination::to("41793026727")],
//!             text: Some("hello".to_owned()),
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     };
//!     let scope = CancelScope::with_timeout(Duration::from_secs(10));
//!     let response = client.send_sms_text_advanced(&scope, &request).await?;
//!     if !response.is_success() {
//!         eprintln!("{}: {}", response.status(), response.details.error.text());
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod models;
pub mod transport;

pub use client::{CancelCause, CancelScope, InfobipClient, InfobipClientBuilder, InfobipError};
pub use domain::{
    ApiKey, ApiResponse, BaseUrl, ConfigError, ErrorEnvelope, JsonPayload, MultipartPayload,
    ResponseDetails, Validate, ValidationReport, Violation,
};
pub use transport::{Attachment, QueryParam, QueryParams};
