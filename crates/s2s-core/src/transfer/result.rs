//! The one result record produced per transfer.

use serde::Serialize;
use serde_json::Value;

use super::error::TransferError;
use crate::headers::Headers;

/// Outcome returned to the host. Serializes to either
/// `{"success":true,"downloadStatus":..,"uploadStatus":..,"response":{..}}` or
/// `{"error":"..","downloadStatus":..,"uploadStatus":..}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TransferResult {
    Success(TransferSuccess),
    Failure(TransferFailure),
}

impl TransferResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferResult::Success(_))
    }

    pub fn download_status(&self) -> Option<u16> {
        match self {
            TransferResult::Success(s) => Some(s.download_status),
            TransferResult::Failure(f) => f.download_status,
        }
    }

    pub fn upload_status(&self) -> Option<u16> {
        match self {
            TransferResult::Success(s) => Some(s.upload_status),
            TransferResult::Failure(f) => f.upload_status,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSuccess {
    success: bool,
    pub download_status: u16,
    pub upload_status: u16,
    /// What the upload endpoint answered with.
    pub response: UploadResponse,
}

impl TransferSuccess {
    pub(crate) fn new(download_status: u16, upload_status: u16, response: UploadResponse) -> Self {
        Self {
            success: true,
            download_status,
            upload_status,
            response,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub headers: Headers,
    /// JSON if the body parsed as JSON, text otherwise, null when empty.
    pub body: Value,
}

impl UploadResponse {
    pub(crate) fn from_parts(headers: Headers, body: &[u8]) -> Self {
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
        };
        Self { headers, body }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_status: Option<u16>,
}

impl From<&TransferError> for TransferFailure {
    fn from(e: &TransferError) -> Self {
        Self {
            error: e.to_string(),
            download_status: e.download_status(),
            upload_status: e.upload_status(),
        }
    }
}
