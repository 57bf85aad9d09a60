//! Request/response payloads.
//!
//! A streamed body is the receiving end of a bounded channel fed by the
//! transport worker. Dropping it closes the channel, which makes the producer
//! abort its transfer on the next write.

use std::io::{self, Read};

use tokio::sync::mpsc;

/// One piece of a streamed body, or the error that ended the stream.
pub type Chunk = io::Result<Vec<u8>>;

/// Producing side of [`Body::Stream`].
pub type BodySender = mpsc::Sender<Chunk>;

#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    Stream(mpsc::Receiver<Chunk>),
}

impl Body {
    /// A streamed body with room for `capacity` in-flight chunks.
    pub fn channel(capacity: usize) -> (BodySender, Body) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Body::Stream(rx))
    }

    /// Length if known without consuming the body.
    pub fn len_hint(&self) -> Option<u64> {
        match self {
            Body::Empty => Some(0),
            Body::Bytes(b) => Some(b.len() as u64),
            Body::Stream(_) => None,
        }
    }

    pub fn is_empty_body(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Buffers the whole body.
    pub async fn collect(self) -> io::Result<Vec<u8>> {
        match self {
            Body::Empty => Ok(Vec::new()),
            Body::Bytes(b) => Ok(b),
            Body::Stream(mut rx) => {
                let mut out = Vec::new();
                while let Some(chunk) = rx.recv().await {
                    out.extend_from_slice(&chunk?);
                }
                Ok(out)
            }
        }
    }

    /// Releases the body without reading it.
    pub fn discard(self) {
        if let Body::Stream(mut rx) = self {
            rx.close();
            tracing::trace!("response body released unread");
        }
    }

    /// Adapts the body for a blocking consumer (libcurl's read callback).
    ///
    /// Must only be read from a blocking thread: reading a stream parks the
    /// thread until the next chunk arrives.
    pub(crate) fn into_blocking_reader(self) -> BlockingBodyReader {
        match self {
            Body::Empty => BlockingBodyReader {
                pending: Vec::new(),
                pos: 0,
                rx: None,
            },
            Body::Bytes(b) => BlockingBodyReader {
                pending: b,
                pos: 0,
                rx: None,
            },
            Body::Stream(rx) => BlockingBodyReader {
                pending: Vec::new(),
                pos: 0,
                rx: Some(rx),
            },
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(b: Vec<u8>) -> Self {
        Body::Bytes(b)
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Bytes(s.as_bytes().to_vec())
    }
}

pub(crate) struct BlockingBodyReader {
    pending: Vec<u8>,
    pos: usize,
    rx: Option<mpsc::Receiver<Chunk>>,
}

impl Read for BlockingBodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.pending.len() {
                let n = buf.len().min(self.pending.len() - self.pos);
                buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            let Some(rx) = self.rx.as_mut() else {
                return Ok(0);
            };
            match rx.blocking_recv() {
                Some(Ok(chunk)) => {
                    self.pending = chunk;
                    self.pos = 0;
                }
                Some(Err(e)) => {
                    self.rx = None;
                    return Err(e);
                }
                None => {
                    self.rx = None;
                    return Ok(0);
                }
            }
        }
    }
}
