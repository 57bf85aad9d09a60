//! Scripted transport for unit tests: replays queued responses in order and
//! records every request it was asked to send.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Body, HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use crate::headers::Headers;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    /// Request body as read by the transport; empty when bodies are left unread.
    pub body: Vec<u8>,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    leave_bodies_unread: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: Option<u16>, headers: &[(&str, &str)], body: Body) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: headers.iter().copied().collect(),
            body,
        }));
        self
    }

    pub fn fail(self, err: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// Answer without reading request bodies; each body is dropped unread.
    pub fn leave_bodies_unread(mut self) -> Self {
        self.leave_bodies_unread = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let body = if self.leave_bodies_unread {
            drop(body);
            Vec::new()
        } else {
            body.collect().await?
        };
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url,
            headers,
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left"))
    }
}
