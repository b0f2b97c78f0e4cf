//! Minimal HTTP/1.1 server standing in for a raw-content host in integration tests.
//!
//! Serves a fixed map of request paths to bodies (200), answers anything else
//! with 404, and records per-path hit counts and `Authorization` headers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

struct Route {
    body: Vec<u8>,
    declared_len: usize,
}

#[derive(Default)]
struct Log {
    hits: HashMap<String, usize>,
    authorization: Vec<Option<String>>,
}

pub struct RawServer {
    base_url: String,
    log: Arc<Mutex<Log>>,
}

impl RawServer {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of GET requests seen for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.log.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.log.lock().unwrap().hits.values().sum()
    }

    /// `Authorization` header of every request, in arrival order.
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.log.lock().unwrap().authorization.clone()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(files: &[(&str, &[u8])]) -> RawServer {
    start_with_truncated(files, &[])
}

/// Like `start`, but each `(path, body, declared_len)` in `truncated` announces
/// `declared_len` in `Content-Length` and closes the connection after `body`.
pub fn start_with_truncated(files: &[(&str, &[u8])], truncated: &[(&str, &[u8], usize)]) -> RawServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let mut routes: HashMap<String, Route> = files
        .iter()
        .map(|(p, b)| {
            (
                p.to_string(),
                Route {
                    body: b.to_vec(),
                    declared_len: b.len(),
                },
            )
        })
        .collect();
    for (p, b, declared_len) in truncated {
        routes.insert(
            p.to_string(),
            Route {
                body: b.to_vec(),
                declared_len: *declared_len,
            },
        );
    }
    let routes = Arc::new(routes);
    let log = Arc::new(Mutex::new(Log::default()));
    let server_log = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&server_log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    RawServer {
        base_url: format!("http://127.0.0.1:{}", port),
        log,
    }
}

/// A base URL on which nothing is listening.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Log>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let Ok(request) = std::str::from_utf8(&request) else {
        return;
    };
    let (method, path, authorization) = parse_request(request);

    {
        let mut log = log.lock().unwrap();
        *log.hits.entry(path.to_string()).or_default() += 1;
        log.authorization.push(authorization);
    }

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    match routes.get(path) {
        Some(route) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n",
                route.declared_len
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&route.body);
            let _ = stream.shutdown(std::net::Shutdown::Write);
        }
        None => {
            let body = b"404: Not Found";
            let head = format!(
                "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
    }
}

/// Returns (method, path, Authorization header value).
fn parse_request(request: &str) -> (&str, &str, Option<String>) {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("");
    let mut authorization = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }
    (method, path, authorization)
}
