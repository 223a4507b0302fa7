//! Minimal HTTP/1.1 server serving canned JSON routes for integration tests.
//!
//! Routes are keyed by request path (still percent-encoded, as sent on the
//! wire). Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug)]
pub enum Route {
    /// 200 with this body.
    Json(&'static str),
    /// Bare status line with an empty body.
    Status(u16),
    /// Sleep, then 200 with this body.
    Delay(Duration, &'static str),
    /// 503 for the first `n` requests, then 200 with this body.
    FailFirst(usize, &'static str),
}

pub struct JsonServer {
    /// Base URL ending in `/`, e.g. `http://127.0.0.1:12345/`.
    pub base: String,
    hits: Arc<HashMap<String, AtomicUsize>>,
}

impl JsonServer {
    /// Requests received so far for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits
            .get(path)
            .map(|h| h.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<(&'static str, Route)>) -> JsonServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits: Arc<HashMap<String, AtomicUsize>> = Arc::new(
        routes
            .iter()
            .map(|(p, _)| (p.to_string(), AtomicUsize::new(0)))
            .collect(),
    );
    let routes: Arc<HashMap<String, Route>> =
        Arc::new(routes.into_iter().map(|(p, r)| (p.to_string(), r)).collect());
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    JsonServer {
        base: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

/// A local URL nothing listens on (connection refused).
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &HashMap<String, AtomicUsize>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let hit = hits
        .get(path)
        .map(|h| h.fetch_add(1, Ordering::SeqCst) + 1)
        .unwrap_or(1);

    let (status, body) = match routes.get(path) {
        None => ("404 Not Found", ""),
        Some(Route::Json(body)) => ("200 OK", *body),
        Some(Route::Status(code)) => (status_line(*code), ""),
        Some(Route::Delay(pause, body)) => {
            thread::sleep(*pause);
            ("200 OK", *body)
        }
        Some(Route::FailFirst(n, body)) => {
            if hit <= *n {
                ("503 Service Unavailable", "")
            } else {
                ("200 OK", *body)
            }
        }
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}

fn status_line(code: u16) -> &'static str {
    match code {
        404 => "404 Not Found",
        410 => "410 Gone",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "400 Bad Request",
    }
}
