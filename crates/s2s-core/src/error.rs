//! Configuration errors: problems with the supplied parameters that make a
//! transfer impossible to attempt. Always fatal, independent of `throwOnError`.

use crate::headers::HeaderSource;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Download URL is required and cannot be empty")]
    EmptyDownloadUrl,

    #[error("Upload URL is required and cannot be empty")]
    EmptyUploadUrl,

    /// Header parameter text is not valid JSON.
    #[error("{which} are not valid JSON: {source}")]
    HeaderJson {
        which: HeaderSource,
        #[source]
        source: serde_json::Error,
    },

    /// Header parameter decoded, but not to an object of scalar values.
    #[error("{which} must be a JSON object of strings: {detail}")]
    HeaderShape { which: HeaderSource, detail: String },

    #[error("invalid content length {0:?}: expected a non-negative integer")]
    InvalidContentLength(String),

    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("invalid upload URL: {0}")]
    InvalidUploadUrl(#[source] url::ParseError),

    /// A parameter was present but had a JSON type the operation cannot use.
    #[error("parameter {name} must be {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },
}
