use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::client::cancel::{CancelCause, CancelScope};

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: url::Url,
    pub(crate) headers: Vec<(&'static str, String)>,
    pub(crate) body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

/// Where an exchange stopped when it did not produce a full response.
#[derive(Debug)]
pub(crate) enum TransportFailure {
    Cancelled(CancelCause),
    /// No response object: connect, TLS, DNS, request build.
    Send(Box<dyn StdError + Send + Sync>),
    /// A status line arrived but the body could not be read.
    Body {
        status: u16,
        headers: Vec<(String, String)>,
        source: Box<dyn StdError + Send + Sync>,
    },
}

pub(crate) trait HttpTransport: Send + Sync {
    /// Run one exchange. The body is read in full before returning and the
    /// response is released on every path.
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
        scope: &'a CancelScope,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub(crate) client: reqwest::Client,
}

impl ReqwestTransport {
    fn build(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        builder
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
        scope: &'a CancelScope,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>> {
        Box::pin(async move {
            let pending = self.build(request).send();
            let response = tokio::select! {
                biased;
                cause = scope.cancelled() => return Err(TransportFailure::Cancelled(cause)),
                sent = pending => sent.map_err(|err| TransportFailure::Send(Box::new(err)))?,
            };

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_owned(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect::<Vec<_>>();

            // `bytes()` consumes the response, so the connection is released
            // whether the read finishes, fails or is dropped by the select.
            let body = tokio::select! {
                biased;
                cause = scope.cancelled() => return Err(TransportFailure::Cancelled(cause)),
                read = response.bytes() => read.map_err(|err| TransportFailure::Body {
                    status,
                    headers: headers.clone(),
                    source: Box::new(err),
                })?,
            };

            Ok(HttpResponse {
                status,
                headers,
                body: body.to_vec(),
            })
        })
    }
}
