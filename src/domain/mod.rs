//! Domain layer: strong types, payload validation and response records (no I/O).

pub mod checks;
mod payload;
mod response;
mod validation;
mod value;

pub use payload::{JsonPayload, MultipartPayload};
pub use response::{
    ApiResponse, ErrorEnvelope, RequestError, ResponseDetails, SUCCESS_STATUSES, ServiceException,
    is_success_status,
};
pub use validation::{
    FieldPath, FieldValue, Rule, RuleParseError, Rules, Schema, SchemaBuilder, StructLevel,
    Validate, ValidationReport, Violation, validate,
};
pub use value::{ApiKey, BaseUrl, ConfigError};
