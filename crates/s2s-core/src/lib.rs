//! s2s: move a file from one HTTP endpoint to another without storing it.
//!
//! The download response body is forwarded as the upload request body; see
//! [`transfer::execute`].

pub mod config;
pub mod logging;

pub mod batch;
pub mod bearer;
pub mod error;
pub mod headers;
pub mod params;
pub mod request;
pub mod transfer;
pub mod transport;

pub use error::ConfigError;
pub use headers::Headers;
pub use request::TransferRequest;
pub use transfer::{execute, execute_item, TransferError, TransferResult};
pub use transport::{CurlTransport, HttpTransport};
