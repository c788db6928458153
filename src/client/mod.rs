//! Client layer: the request engine, its configuration and per-channel calls.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use tracing::{Span, debug, instrument, warn};
use url::Url;

use crate::domain::{
    ApiKey, ApiResponse, BaseUrl, ConfigError, ErrorEnvelope, JsonPayload, MultipartPayload,
    ResponseDetails, Validate, ValidationReport,
};
use crate::transport::{QueryParam, decode_error_envelope, decode_success, encode};

mod account;
mod cancel;
mod email;
mod http;
mod mms;
mod people;
mod sms;
mod tfa;
mod whatsapp;

pub use cancel::{CancelCause, CancelScope};

use http::{HttpRequest, HttpTransport, Method, ReqwestTransport, TransportFailure};

const DEFAULT_USER_AGENT: &str = concat!("infobip-rust/", env!("CARGO_PKG_VERSION"));
const JSON: &str = "application/json";

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`InfobipClient`].
///
/// A non-2xx response is not an error: it comes back as an [`ApiResponse`]
/// whose details carry the status and the decoded [`ErrorEnvelope`]. The
/// variants here cover the two local failure kinds:
/// - validation, where nothing was sent,
/// - transport, where the exchange did not complete (this includes cancellation).
pub enum InfobipError {
    /// The payload failed local validation. No request was sent.
    #[error("validation failed: {0}")]
    Validation(ValidationReport),

    /// The cancellation scope fired before or during the exchange.
    #[error("{0}")]
    Cancelled(CancelCause),

    #[error("invalid request URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The payload's serializer failed. No request was sent.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] Box<dyn StdError + Send + Sync>),

    /// No response was received (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// A response arrived but its body could not be read.
    #[error("failed to read response body (HTTP {}): {source}", details.status)]
    Body {
        details: ResponseDetails,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A success body did not match the expected result type.
    #[error("failed to decode response body (HTTP {}): {source}", details.status)]
    Decode {
        details: ResponseDetails,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {name} header: {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),
}

impl InfobipError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Anything that went wrong around the exchange itself, cancellation included.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Cancelled(_)
                | Self::InvalidUrl { .. }
                | Self::Serialize(_)
                | Self::Transport(_)
                | Self::Body { .. }
                | Self::Decode { .. }
        )
    }

    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }

    pub fn cancel_cause(&self) -> Option<&CancelCause> {
        match self {
            Self::Cancelled(cause) => Some(cause),
            _ => None,
        }
    }

    /// Response details, when a response was received before the failure.
    pub fn details(&self) -> Option<&ResponseDetails> {
        match self {
            Self::Body { details, .. } | Self::Decode { details, .. } => Some(details),
            _ => None,
        }
    }
}

#[derive(Clone, Default)]
/// Builder for [`InfobipClient`].
///
/// `api_key` and `base_url` are required; `timeout` and `user_agent` tune the
/// underlying HTTP client.
pub struct InfobipClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl fmt::Debug for InfobipClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfobipClientBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl InfobipClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Tenant base URL, e.g. `https://xxxxx.api.infobip.com`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Timeout applied by the HTTP client to every request.
    ///
    /// Per-call deadlines belong on the [`CancelScope`] instead.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<InfobipClient, InfobipError> {
        let api_key = ApiKey::new(self.api_key.unwrap_or_default())?;
        let base_url = BaseUrl::new(self.base_url.unwrap_or_default())?;
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());
        let user_agent =
            HeaderValue::from_str(&user_agent).map_err(|source| InfobipError::InvalidHeader {
                name: "user-agent",
                source,
            })?;

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| InfobipError::Transport(Box::new(err)))?;

        Ok(InfobipClient {
            api_key,
            base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Request engine for the Infobip HTTP API.
///
/// Cheap to clone and safe to share between tasks: it holds the API key, the
/// base URL and a pooled HTTP client, and keeps no per-request state.
///
/// Every call validates its payload first, then sends a single request under
/// the caller's [`CancelScope`] and reads the whole body before returning.
pub struct InfobipClient {
    api_key: ApiKey,
    base_url: BaseUrl,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for InfobipClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfobipClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl InfobipClient {
    /// Create a client with default HTTP settings.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, InfobipError> {
        Self::builder().api_key(api_key).base_url(base_url).build()
    }

    pub fn builder() -> InfobipClientBuilder {
        InfobipClientBuilder::new()
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// `GET` `path`; a success body is decoded into `T`.
    pub async fn get<T>(
        &self,
        scope: &CancelScope,
        path: &str,
        params: &[QueryParam],
    ) -> Result<ApiResponse<T>, InfobipError>
    where
        T: DeserializeOwned + Default,
    {
        let (details, body) = self.exchange(scope, Method::Get, path, params, None).await?;
        decode_result(details, &body)
    }

    /// `DELETE` `path`. There is no success body; the status says it all.
    pub async fn delete(
        &self,
        scope: &CancelScope,
        path: &str,
        params: &[QueryParam],
    ) -> Result<ResponseDetails, InfobipError> {
        let (details, _) = self
            .exchange(scope, Method::Delete, path, params, None)
            .await?;
        Ok(details)
    }

    /// Validate `payload`, then `POST` it as JSON.
    pub async fn post_json<P, T>(
        &self,
        scope: &CancelScope,
        path: &str,
        payload: &P,
        params: &[QueryParam],
    ) -> Result<ApiResponse<T>, InfobipError>
    where
        P: JsonPayload + ?Sized,
        T: DeserializeOwned + Default,
    {
        let body = json_body(payload)?;
        let (details, body) = self
            .exchange(scope, Method::Post, path, params, Some(body))
            .await?;
        decode_result(details, &body)
    }

    /// Validate `payload`, then `PUT` it as JSON.
    pub async fn put_json<P, T>(
        &self,
        scope: &CancelScope,
        path: &str,
        payload: &P,
        params: &[QueryParam],
    ) -> Result<ApiResponse<T>, InfobipError>
    where
        P: JsonPayload + ?Sized,
        T: DeserializeOwned + Default,
    {
        let body = json_body(payload)?;
        let (details, body) = self
            .exchange(scope, Method::Put, path, params, Some(body))
            .await?;
        decode_result(details, &body)
    }

    /// `POST` with an empty body.
    pub async fn post_no_body<T>(
        &self,
        scope: &CancelScope,
        path: &str,
        params: &[QueryParam],
    ) -> Result<ApiResponse<T>, InfobipError>
    where
        T: DeserializeOwned + Default,
    {
        let (details, body) = self
            .exchange(scope, Method::Post, path, params, None)
            .await?;
        decode_result(details, &body)
    }

    /// Validate `payload`, then `POST` it as `multipart/form-data`.
    ///
    /// The `Content-Type` header carries the boundary the payload wrote with.
    pub async fn post_multipart<P, T>(
        &self,
        scope: &CancelScope,
        path: &str,
        payload: &P,
        params: &[QueryParam],
    ) -> Result<ApiResponse<T>, InfobipError>
    where
        P: MultipartPayload + ?Sized,
        T: DeserializeOwned + Default,
    {
        preflight(payload)?;
        let multipart = payload
            .to_multipart()
            .map_err(|err| InfobipError::Serialize(Box::new(err)))?;
        let body = RequestBody {
            content_type: multipart.content_type(),
            bytes: multipart.into_bytes(),
        };
        let (details, body) = self
            .exchange(scope, Method::Post, path, params, Some(body))
            .await?;
        decode_result(details, &body)
    }

    #[instrument(
        name = "infobip_request",
        skip(self, scope, method, params, body),
        fields(
            http.method = %method,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    async fn exchange(
        &self,
        scope: &CancelScope,
        method: Method,
        path: &str,
        params: &[QueryParam],
        body: Option<RequestBody>,
    ) -> Result<(ResponseDetails, Vec<u8>), InfobipError> {
        if let Some(cause) = scope.cause() {
            debug!(%cause, "scope cancelled before dispatch");
            return Err(InfobipError::Cancelled(cause));
        }

        let url = self.request_url(path, params)?;
        Span::current().record("http.url", url.as_str());

        let mut headers = vec![
            ("authorization", self.api_key.authorization()),
            ("accept", JSON.to_owned()),
        ];
        let body = body.map(|body| {
            headers.push(("content-type", body.content_type));
            body.bytes
        });
        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };

        let response = match self.http.execute(request, scope).await {
            Ok(response) => response,
            Err(TransportFailure::Cancelled(cause)) => {
                debug!(%cause, "request cancelled");
                return Err(InfobipError::Cancelled(cause));
            }
            Err(TransportFailure::Send(source)) => {
                warn!(error = %source, "request failed");
                return Err(InfobipError::Transport(source));
            }
            Err(TransportFailure::Body {
                status,
                headers,
                source,
            }) => {
                Span::current().record("http.status_code", status);
                warn!(error = %source, "failed to read response body");
                return Err(InfobipError::Body {
                    details: ResponseDetails {
                        status,
                        headers,
                        ..Default::default()
                    },
                    source,
                });
            }
        };

        Span::current().record("http.status_code", response.status);

        let error = decode_error_envelope(response.status, &response.body).unwrap_or_else(|err| {
            debug!(error = %err, "error response without a decodable envelope");
            ErrorEnvelope::default()
        });
        if !error.is_empty() {
            debug!(message_id = error.message_id(), "provider returned an error envelope");
        }

        let details = ResponseDetails {
            status: response.status,
            headers: response.headers,
            body_len: response.body.len(),
            error,
        };
        Ok((details, response.body))
    }

    fn request_url(&self, path: &str, params: &[QueryParam]) -> Result<Url, InfobipError> {
        let mut raw = self.base_url.join(path);
        let query = encode(params);
        if !query.is_empty() {
            raw.push('?');
            raw.push_str(&query);
        }
        Url::parse(&raw).map_err(|source| InfobipError::InvalidUrl { url: raw, source })
    }
}

struct RequestBody {
    content_type: String,
    bytes: Vec<u8>,
}

fn preflight<P: Validate + ?Sized>(payload: &P) -> Result<(), InfobipError> {
    payload.validate().into_result().map_err(|report| {
        debug!(violations = report.len(), %report, "payload failed validation");
        InfobipError::Validation(report)
    })
}

fn json_body<P: JsonPayload + ?Sized>(payload: &P) -> Result<RequestBody, InfobipError> {
    preflight(payload)?;
    let bytes = payload
        .to_json()
        .map_err(|err| InfobipError::Serialize(Box::new(err)))?;
    Ok(RequestBody {
        content_type: JSON.to_owned(),
        bytes,
    })
}

fn decode_result<T>(details: ResponseDetails, body: &[u8]) -> Result<ApiResponse<T>, InfobipError>
where
    T: DeserializeOwned + Default,
{
    if !details.is_success() {
        return Ok(ApiResponse {
            result: T::default(),
            details,
        });
    }
    match decode_success(body) {
        Ok(result) => Ok(ApiResponse { result, details }),
        Err(source) => {
            debug!(error = %source, "success body did not match the result type");
            Err(InfobipError::Decode { details, source })
        }
    }
}
