//! HTTP capability used by the transfer operation.
//!
//! The transfer only needs one call shape: `(method, url, headers, body) ->
//! (status, headers, body)`. [`HttpTransport`] models that call so tests can
//! substitute a scripted double; [`CurlTransport`] is the libcurl backend.

mod body;
mod error;
mod libcurl;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
use std::future::Future;

use crate::error::ConfigError;
use crate::headers::Headers;

pub use body::{Body, BodySender};
pub use error::TransportError;
pub use libcurl::CurlTransport;

/// An HTTP method token, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method(String);

impl Method {
    pub fn get() -> Self {
        Method("GET".to_string())
    }

    pub fn post() -> Self {
        Method("POST".to_string())
    }

    /// Parses a method name. Empty input yields `POST`, the upload default.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let t = s.trim();
        if t.is_empty() {
            return Ok(Self::post());
        }
        if !t.bytes().all(is_token_byte) {
            return Err(ConfigError::InvalidMethod(s.to_string()));
        }
        Ok(Method(t.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::post()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RFC 9110 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// One outbound request.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Body,
}

/// What the transport reports back. `status` is `None` when the response
/// carried no usable status code.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: Option<u16>,
    pub headers: Headers,
    pub body: Body,
}

impl HttpResponse {
    /// Status code if it is in the 2xx range.
    pub fn success_status(&self) -> Option<u16> {
        self.status.filter(|s| (200..300).contains(s))
    }
}

/// Performs a single HTTP exchange.
///
/// Implementations return as soon as the response status and headers are
/// known; the body may still be arriving through [`Body::Stream`].
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
