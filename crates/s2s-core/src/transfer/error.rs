//! Transfer-time error types.

use std::fmt;

use crate::error::ConfigError;
use crate::transport::TransportError;

/// Why one leg (download or upload) did not produce a 2xx response.
#[derive(Debug)]
pub enum StepFailure {
    /// The server answered outside 200-299.
    Status(u16),
    /// A response arrived without a usable status code.
    NoStatus,
    /// No response at all (DNS, connect, TLS, timeout, ...).
    Transport(TransportError),
}

impl StepFailure {
    pub(crate) fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(code) => StepFailure::Status(code),
            None => StepFailure::NoStatus,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            StepFailure::Status(code) => Some(*code),
            StepFailure::NoStatus | StepFailure::Transport(_) => None,
        }
    }

    fn fmt_for(&self, leg: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepFailure::Status(code) => write!(f, "{} failed with HTTP {}", leg, code),
            StepFailure::NoStatus => write!(f, "{} failed: response carried no HTTP status", leg),
            StepFailure::Transport(e) => write!(f, "{} failed: {}", leg, e),
        }
    }
}

/// Error raised by the transfer operation.
///
/// `Config` is always raised. `Download` and `Upload` are raised only when
/// the request has `throwOnError` set; otherwise they become an error result.
#[derive(Debug)]
pub enum TransferError {
    Config(ConfigError),
    Download(StepFailure),
    Upload {
        /// Status of the download leg, which succeeded.
        download_status: u16,
        failure: StepFailure,
    },
}

impl TransferError {
    pub fn download_status(&self) -> Option<u16> {
        match self {
            TransferError::Config(_) => None,
            TransferError::Download(failure) => failure.status(),
            TransferError::Upload {
                download_status, ..
            } => Some(*download_status),
        }
    }

    pub fn upload_status(&self) -> Option<u16> {
        match self {
            TransferError::Upload { failure, .. } => failure.status(),
            TransferError::Config(_) | TransferError::Download(_) => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, TransferError::Config(_))
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Config(e) => write!(f, "{}", e),
            TransferError::Download(failure) => failure.fmt_for("Download", f),
            TransferError::Upload { failure, .. } => failure.fmt_for("Upload", f),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Config(e) => Some(e),
            TransferError::Download(StepFailure::Transport(e))
            | TransferError::Upload {
                failure: StepFailure::Transport(e),
                ..
            } => Some(e),
            TransferError::Download(_) | TransferError::Upload { .. } => None,
        }
    }
}

impl From<ConfigError> for TransferError {
    fn from(e: ConfigError) -> Self {
        TransferError::Config(e)
    }
}
