//! The immutable input of one transfer.

use std::fmt;

use serde_json::Value;

use crate::bearer::extract_bearer;
use crate::error::ConfigError;
use crate::headers::{HeaderSource, Headers};
use crate::params::{names, ParamSource};
use crate::transport::Method;

/// A validated transfer request. The upload URL is stored with any `bearer`
/// parameter already removed; the token is kept separately.
#[derive(Clone)]
pub struct TransferRequest {
    download_url: String,
    upload_url: String,
    bearer_token: Option<String>,
    content_length: Option<u64>,
    method: Method,
    download_headers: Headers,
    upload_headers: Headers,
    throw_on_error: bool,
}

impl TransferRequest {
    /// Starts a request with the defaults: `POST`, no extra headers,
    /// measured content length, throw on error.
    pub fn builder(
        download_url: impl Into<String>,
        upload_url: impl Into<String>,
    ) -> TransferRequestBuilder {
        TransferRequestBuilder {
            download_url: download_url.into(),
            upload_url: upload_url.into(),
            content_length: None,
            method: Method::post(),
            download_headers: Headers::new(),
            upload_headers: Headers::new(),
            throw_on_error: true,
        }
    }

    /// Reads every field for item `item_index` from `source`, applying defaults.
    ///
    /// Both URLs are checked before anything else so an unconfigured operation
    /// reports the missing URL rather than a secondary problem.
    pub fn resolve<P: ParamSource + ?Sized>(
        source: &P,
        item_index: usize,
    ) -> Result<Self, ConfigError> {
        let download_url = source.string(names::DOWNLOAD_URL, item_index, "")?;
        if download_url.trim().is_empty() {
            return Err(ConfigError::EmptyDownloadUrl);
        }
        let upload_url = source.string(names::UPLOAD_URL, item_index, "")?;
        if upload_url.trim().is_empty() {
            return Err(ConfigError::EmptyUploadUrl);
        }

        let method = Method::parse(&source.string(names::METHOD, item_index, "POST")?)?;
        let content_length = source.byte_count(names::CONTENT_LENGTH, item_index)?;
        let download_headers = header_param(
            source,
            names::DOWNLOAD_HEADERS,
            item_index,
            HeaderSource::Download,
        )?;
        let upload_headers = header_param(
            source,
            names::UPLOAD_HEADERS,
            item_index,
            HeaderSource::Upload,
        )?;
        let throw_on_error = source.boolean(names::THROW_ON_ERROR, item_index, true)?;

        TransferRequest::builder(download_url, upload_url)
            .method(method)
            .content_length(content_length)
            .download_headers(download_headers)
            .upload_headers(upload_headers)
            .throw_on_error(throw_on_error)
            .build()
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    /// Upload URL with the bearer credential removed.
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn download_headers(&self) -> &Headers {
        &self.download_headers
    }

    pub fn upload_headers(&self) -> &Headers {
        &self.upload_headers
    }

    pub fn throw_on_error(&self) -> bool {
        self.throw_on_error
    }
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRequest")
            .field("download_url", &self.download_url)
            .field("upload_url", &self.upload_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("content_length", &self.content_length)
            .field("method", &self.method)
            .field("download_headers", &header_names(&self.download_headers))
            .field("upload_headers", &header_names(&self.upload_headers))
            .field("throw_on_error", &self.throw_on_error)
            .finish()
    }
}

/// Header values may carry credentials; only names are shown.
fn header_names(headers: &Headers) -> Vec<&str> {
    headers.iter().map(|(k, _)| k).collect()
}

fn header_param<P: ParamSource + ?Sized>(
    source: &P,
    name: &'static str,
    item_index: usize,
    which: HeaderSource,
) -> Result<Headers, ConfigError> {
    match source.param(name, item_index) {
        None | Some(Value::Null) => Ok(Headers::new()),
        Some(Value::String(text)) => Headers::from_json_text(&text, which),
        Some(value @ Value::Object(_)) => Headers::from_json_value(&value, which),
        Some(_) => Err(ConfigError::WrongType {
            name,
            expected: "a JSON object or JSON text",
        }),
    }
}

/// Builder for [`TransferRequest`]; `build` runs the same validation as
/// [`TransferRequest::resolve`].
#[derive(Debug, Clone)]
pub struct TransferRequestBuilder {
    download_url: String,
    upload_url: String,
    content_length: Option<u64>,
    method: Method,
    download_headers: Headers,
    upload_headers: Headers,
    throw_on_error: bool,
}

impl TransferRequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn content_length(mut self, len: Option<u64>) -> Self {
        self.content_length = len;
        self
    }

    pub fn download_headers(mut self, headers: Headers) -> Self {
        self.download_headers = headers;
        self
    }

    pub fn upload_headers(mut self, headers: Headers) -> Self {
        self.upload_headers = headers;
        self
    }

    pub fn throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = throw;
        self
    }

    pub fn build(self) -> Result<TransferRequest, ConfigError> {
        let download_url = self.download_url.trim();
        if download_url.is_empty() {
            return Err(ConfigError::EmptyDownloadUrl);
        }
        if self.upload_url.trim().is_empty() {
            return Err(ConfigError::EmptyUploadUrl);
        }
        let stripped = extract_bearer(&self.upload_url)?;

        Ok(TransferRequest {
            download_url: download_url.to_string(),
            upload_url: stripped.url,
            bearer_token: stripped.token,
            content_length: self.content_length,
            method: self.method,
            download_headers: self.download_headers,
            upload_headers: self.upload_headers,
            throw_on_error: self.throw_on_error,
        })
    }
}
