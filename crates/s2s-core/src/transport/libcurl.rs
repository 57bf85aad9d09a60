//! libcurl transport.
//!
//! Each request runs one `curl::easy::Easy` transfer on tokio's blocking pool.
//! The response head is handed back through a oneshot as soon as the first
//! body bytes arrive (or the transfer ends); the body follows through a
//! bounded channel. A streamed request body is pulled from its channel by
//! libcurl's read callback, so one leg's response can feed the next leg's
//! request without being buffered.

use std::cell::RefCell;
use std::io::{self, Read};
use std::str;
use std::time::Duration;

use curl::easy::{Easy, List, ReadError};
use tokio::sync::oneshot;

use super::body::BodySender;
use super::{Body, HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use crate::config::HttpConfig;
use crate::headers::Headers;

/// [`HttpTransport`] backed by libcurl.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: HttpConfig,
}

impl CurlTransport {
    pub fn new(options: HttpConfig) -> Self {
        Self { options }
    }
}

impl HttpTransport for CurlTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (head_tx, head_rx) = oneshot::channel();
        let (body_tx, body) = Body::channel(self.options.stream_chunks);
        let options = self.options.clone();

        tracing::debug!(method = %request.method, url = %request.url, "curl request");
        // The worker is detached: it ends when the transfer completes or when
        // the body receiver is dropped.
        tokio::task::spawn_blocking(move || perform(request, &options, head_tx, body_tx));

        let head = head_rx.await.map_err(|_| TransportError::WorkerGone)??;
        Ok(HttpResponse {
            status: head.status,
            headers: head.headers,
            body,
        })
    }
}

struct ResponseHead {
    status: Option<u16>,
    headers: Headers,
}

type HeadSender = oneshot::Sender<Result<ResponseHead, TransportError>>;

/// Header lines of the current response, and the channel its head goes out on.
struct HeadState {
    tx: Option<HeadSender>,
    status: Option<u16>,
    lines: Vec<String>,
}

impl HeadState {
    fn new(tx: HeadSender) -> Self {
        Self {
            tx: Some(tx),
            status: None,
            lines: Vec::new(),
        }
    }

    /// A status line starts a new response (redirect hop or 100 Continue).
    fn header_line(&mut self, data: &[u8]) {
        let Ok(s) = str::from_utf8(data) else {
            return;
        };
        let line = s.trim_end();
        if line.starts_with("HTTP/") {
            self.status = parse_status_line(line);
            self.lines.clear();
        } else if !line.is_empty() {
            self.lines.push(line.to_string());
        }
    }

    fn deliver(&mut self) {
        if let Some(tx) = self.tx.take() {
            let head = ResponseHead {
                status: self.status,
                headers: Headers::from_lines(&self.lines),
            };
            let _ = tx.send(Ok(head));
        }
    }

    /// Reports `err` as the outcome if the head has not gone out yet;
    /// otherwise hands it back so it can end the body stream.
    fn fail(&mut self, err: TransportError) -> Result<(), TransportError> {
        match self.tx.take() {
            Some(tx) => {
                let _ = tx.send(Err(err));
                Ok(())
            }
            None => Err(err),
        }
    }
}

/// `HTTP/1.1 200 OK` or `HTTP/2 200` -> 200.
fn parse_status_line(line: &str) -> Option<u16> {
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Redirects are only followed for body-less GET/HEAD. libcurl replays a
/// redirected upload as a GET of the new location, dropping the payload.
fn follows_redirects(options: &HttpConfig, method: &Method, has_body: bool) -> bool {
    options.follow_redirects && !has_body && matches!(method.as_str(), "GET" | "HEAD")
}

/// Request header lines handed to libcurl. With a body, libcurl frames it:
/// `Content-Length` comes from `post_field_size` and any caller
/// `Transfer-Encoding` is replaced by our own.
fn header_lines(headers: &Headers, has_body: bool, declared_len: Option<u64>) -> Vec<String> {
    let mut lines: Vec<String> = headers
        .iter()
        .filter(|(k, _)| {
            !(has_body
                && (k.eq_ignore_ascii_case("content-length")
                    || k.eq_ignore_ascii_case("transfer-encoding")))
        })
        .map(|(k, v)| format!("{}: {}", k.trim(), v.trim()))
        .collect();
    if has_body {
        lines.push("Expect:".to_string());
        if declared_len.is_none() {
            lines.push("Transfer-Encoding: chunked".to_string());
        }
    }
    lines
}

/// Runs on a blocking thread.
fn perform(request: HttpRequest, options: &HttpConfig, head_tx: HeadSender, body_tx: BodySender) {
    let state = RefCell::new(HeadState::new(head_tx));
    match run_easy(request, options, &state, &body_tx) {
        Ok(code) => {
            let mut st = state.borrow_mut();
            if st.status.is_none() && code != 0 {
                st.status = u16::try_from(code).ok();
            }
            st.deliver();
        }
        Err(e) => {
            if let Err(e) = state.borrow_mut().fail(e) {
                tracing::debug!("curl transfer failed mid-body: {}", e);
                let _ = body_tx.blocking_send(Err(io::Error::other(e.to_string())));
            }
        }
    }
}

fn run_easy(
    request: HttpRequest,
    options: &HttpConfig,
    state: &RefCell<HeadState>,
    body_tx: &BodySender,
) -> Result<u32, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;
    let has_body = !body.is_empty_body();
    let declared_len = headers
        .get("content-length")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or_else(|| body.len_hint());

    let mut easy = Easy::new();
    easy.url(&url)?;
    easy.follow_location(follows_redirects(options, &method, has_body))?;
    easy.max_redirections(options.max_redirections)?;
    if let Some(sz) = options.buffer_size {
        easy.buffer_size(sz)?;
    }
    easy.connect_timeout(Duration::from_secs(options.connect_timeout_secs))?;
    easy.low_speed_limit(options.low_speed_limit_bytes)?;
    easy.low_speed_time(Duration::from_secs(options.low_speed_time_secs))?;
    easy.timeout(Duration::from_secs(options.timeout_secs))?;

    match (method.as_str(), has_body) {
        ("GET", false) => easy.get(true)?,
        ("HEAD", _) => easy.nobody(true)?,
        (m, true) => {
            easy.post(true)?;
            if let Some(len) = declared_len {
                easy.post_field_size(len)?;
            }
            if m != "POST" {
                easy.custom_request(m)?;
            }
        }
        (m, false) => easy.custom_request(m)?,
    }

    let mut list = List::new();
    for line in header_lines(&headers, has_body, declared_len) {
        list.append(&line)?;
    }
    easy.http_headers(list)?;

    let mut reader = body.into_blocking_reader();
    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            state.borrow_mut().header_line(data);
            true
        })?;
        transfer.write_function(|data| {
            state.borrow_mut().deliver();
            match body_tx.blocking_send(Ok(data.to_vec())) {
                Ok(()) => Ok(data.len()),
                // Receiver dropped: the consumer released the body.
                Err(_) => Ok(0),
            }
        })?;
        if has_body {
            transfer.read_function(|buf| {
                reader.read(buf).map_err(|e| {
                    tracing::warn!("request body stream failed: {}", e);
                    ReadError::Abort
                })
            })?;
        }
        transfer.perform()?;
    }

    Ok(easy.response_code()?)
}
