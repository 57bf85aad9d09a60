//! Minimal HTTP/1.1 server for integration tests: one side serves a file,
//! the other accepts uploads and records what it received.
//!
//! Routes:
//! - `GET /file`: the file with `Content-Length`
//! - `GET /file-unsized`: the file without `Content-Length` (close-delimited)
//! - `GET /missing`: 404
//! - `POST|PUT|PATCH /upload`: 200 with `{"received": <bytes>}`
//! - `* /upload-denied`: 403
//! - `* /upload-redirect`: 302 to `/landing`
//! - `GET /landing`: 200 `landing page`

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    /// Request target as sent, including any query string.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Received {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct TestServer {
    base: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl TestServer {
    /// URL for `path` on this server (e.g. `url("/file")`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Whether any request for `path` (query ignored) was received.
    pub fn was_requested(&self, path: &str) -> bool {
        self.received
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.target.split('?').next() == Some(path))
    }

    /// Uploads received so far (requests that carried a body route).
    pub fn uploads(&self) -> Vec<Received> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.target.starts_with("/upload"))
            .cloned()
            .collect()
    }
}

/// Starts a server in a background thread serving `file`. The server runs
/// until the process exits.
pub fn start(file: Vec<u8>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let file = Arc::new(file);
    let received = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&received);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let file = Arc::clone(&file);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &file, &log));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        received,
    }
}

/// A port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/file", port)
}

fn handle(stream: TcpStream, file: &[u8], log: &Mutex<Vec<Received>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(10)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(10)));
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let Some(request) = read_request(&mut reader) else {
        return;
    };
    let mut stream = stream;

    let path = request.target.split('?').next().unwrap_or("").to_string();
    let method = request.method.clone();
    let body_len = request.body.len();
    log.lock().unwrap().push(request);

    match (method.as_str(), path.as_str()) {
        ("GET", "/file") => respond(&mut stream, "200 OK", Some(file)),
        ("GET", "/file-unsized") => {
            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n");
            let _ = stream.write_all(file);
        }
        ("POST" | "PUT" | "PATCH", "/upload") => {
            let reply = format!("{{\"received\":{}}}", body_len);
            respond(&mut stream, "200 OK", Some(reply.as_bytes()));
        }
        (_, "/upload-denied") => respond(&mut stream, "403 Forbidden", Some(&b"denied"[..])),
        (_, "/upload-redirect") => {
            let _ = stream.write_all(
                b"HTTP/1.1 302 Found\r\nLocation: /landing\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
        ("GET", "/landing") => respond(&mut stream, "200 OK", Some(&b"landing page"[..])),
        _ => respond(&mut stream, "404 Not Found", None),
    }
    let _ = stream.flush();
}

fn respond(stream: &mut TcpStream, status: &str, body: Option<&[u8]>) {
    let body = body.unwrap_or(&[]);
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn read_request(reader: &mut BufReader<TcpStream>) -> Option<Received> {
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut h = String::new();
        if reader.read_line(&mut h).ok()? == 0 {
            break;
        }
        let h = h.trim_end();
        if h.is_empty() {
            break;
        }
        if let Some((k, v)) = h.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let find = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };
    let body = if let Some(len) = find("content-length") {
        let len: usize = len.parse().ok()?;
        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).ok()?;
        body
    } else if find("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        read_chunked(reader)?
    } else {
        Vec::new()
    };

    Some(Received {
        method,
        target,
        headers,
        body,
    })
}

fn read_chunked(reader: &mut BufReader<TcpStream>) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).ok()?;
        let size_hex = size_line.trim().split(';').next()?;
        let size = usize::from_str_radix(size_hex, 16).ok()?;
        if size == 0 {
            // Trailers, then the terminating blank line.
            loop {
                let mut t = String::new();
                if reader.read_line(&mut t).ok()? == 0 || t.trim().is_empty() {
                    break;
                }
            }
            return Some(body);
        }
        let start = body.len();
        body.resize(start + size, 0);
        reader.read_exact(&mut body[start..]).ok()?;
        let mut crlf = String::new();
        reader.read_line(&mut crlf).ok()?;
    }
}
