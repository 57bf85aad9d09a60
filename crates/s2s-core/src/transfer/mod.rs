//! The transfer operation: GET the download URL, forward its body as the
//! payload of a request to the upload URL, report one result.
//!
//! Validating -> Downloading -> (DownloadFailed | Uploading) ->
//! (UploadFailed | Succeeded). The upload leg only runs after a 2xx download.
//! Failed states raise or become an error result depending on `throwOnError`.

mod error;
mod result;

pub use error::{StepFailure, TransferError};
pub use result::{TransferFailure, TransferResult, TransferSuccess, UploadResponse};

use crate::headers::Headers;
use crate::params::ParamSource;
use crate::request::TransferRequest;
use crate::transport::{Body, HttpRequest, HttpTransport, Method};

/// Resolves item `item_index` from `params` and runs the transfer.
/// Configuration problems are always raised.
pub async fn execute_item<T, P>(
    transport: &T,
    params: &P,
    item_index: usize,
) -> Result<TransferResult, TransferError>
where
    T: HttpTransport,
    P: ParamSource + ?Sized,
{
    let request = TransferRequest::resolve(params, item_index)?;
    execute(transport, &request).await
}

/// Runs one transfer. Download/upload failures are raised when
/// `request.throw_on_error()` is set and returned as
/// [`TransferResult::Failure`] otherwise.
pub async fn execute<T: HttpTransport>(
    transport: &T,
    request: &TransferRequest,
) -> Result<TransferResult, TransferError> {
    match run(transport, request).await {
        Ok(success) => Ok(TransferResult::Success(success)),
        Err(err) if !request.throw_on_error() => {
            tracing::warn!(
                download_status = ?err.download_status(),
                upload_status = ?err.upload_status(),
                "transfer failed, reporting error result: {}",
                err
            );
            Ok(TransferResult::Failure(TransferFailure::from(&err)))
        }
        Err(err) => Err(err),
    }
}

async fn run<T: HttpTransport>(
    transport: &T,
    request: &TransferRequest,
) -> Result<TransferSuccess, TransferError> {
    tracing::info!(url = %request.download_url(), "download starting");
    let download = transport
        .send(HttpRequest {
            method: Method::get(),
            url: request.download_url().to_string(),
            headers: request.download_headers().clone(),
            body: Body::Empty,
        })
        .await
        .map_err(|e| TransferError::Download(StepFailure::Transport(e)))?;

    let Some(download_status) = download.success_status() else {
        let status = download.status;
        download.body.discard();
        return Err(TransferError::Download(StepFailure::from_status(status)));
    };
    tracing::debug!(status = download_status, "download responded");

    let headers = upload_headers(request, &download.headers);
    tracing::info!(
        method = %request.method(),
        url = %request.upload_url(),
        content_length = ?headers.get("content-length"),
        "upload starting"
    );
    let upload = transport
        .send(HttpRequest {
            method: request.method().clone(),
            url: request.upload_url().to_string(),
            headers,
            body: download.body,
        })
        .await
        .map_err(|e| TransferError::Upload {
            download_status,
            failure: StepFailure::Transport(e),
        })?;

    let Some(upload_status) = upload.success_status() else {
        let status = upload.status;
        upload.body.discard();
        return Err(TransferError::Upload {
            download_status,
            failure: StepFailure::from_status(status),
        });
    };

    let body = match upload.body.collect().await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("upload succeeded but its response body could not be read: {}", e);
            Vec::new()
        }
    };
    tracing::info!(download_status, upload_status, "transfer complete");

    Ok(TransferSuccess::new(
        download_status,
        upload_status,
        UploadResponse::from_parts(upload.headers, &body),
    ))
}

/// Upload headers, highest precedence first: operator `Authorization` >
/// bearer token from the URL > computed `Content-Length` > other operator
/// headers.
fn upload_headers(request: &TransferRequest, download_headers: &Headers) -> Headers {
    let mut headers = request.upload_headers().clone();

    let content_length = request.content_length().or_else(|| {
        download_headers
            .get("content-length")
            .and_then(|v| v.trim().parse::<u64>().ok())
    });
    if let Some(len) = content_length {
        headers.insert("Content-Length", len.to_string());
    }

    if let Some(token) = request.bearer_token() {
        if headers.contains("authorization") {
            tracing::debug!("explicit Authorization header kept; URL bearer token not applied");
        } else {
            headers.insert("Authorization", format!("Bearer {}", token));
        }
    }

    headers
}
