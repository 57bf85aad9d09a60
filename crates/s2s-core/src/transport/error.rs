//! Transport-level failures (no usable HTTP response at all).

/// The request could not be completed: DNS, connect, TLS, timeout, or the
/// request body failed while being sent.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Curl(#[from] curl::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The worker performing the request stopped without reporting a response.
    #[error("transfer worker exited before a response arrived")]
    WorkerGone,
}
