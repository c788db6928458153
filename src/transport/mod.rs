//! Transport layer: wire-format details (query strings, JSON and multipart bodies, response routing).

pub mod json;
mod multipart;
mod path;
mod query;
mod response;

pub use multipart::{Attachment, MultipartBody, MultipartError, MultipartWriter};
pub use path::segment as path_segment;
pub use query::{QueryParam, QueryParams, ToQueryParams, encode};
pub use response::{decode_error_envelope, decode_success};
