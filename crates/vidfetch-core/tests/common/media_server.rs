//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed path → body map. HEAD answers with Content-Length only;
//! GET answers with the body. Routes can be forced to fail with any status
//! or to refuse HEAD, and every request is counted per method and path.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Route {
    Body(Vec<u8>),
    /// GET serves the body; HEAD answers 405.
    NoHead(Vec<u8>),
    Status(u16, &'static str),
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, Route>,
    hits: HashMap<(String, String), usize>,
}

/// Handle on a running server; routes can be added while it runs.
#[derive(Clone)]
pub struct MediaServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl MediaServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn serve(&self, path: &str, body: impl Into<Vec<u8>>) -> String {
        self.route(path, Route::Body(body.into()))
    }

    /// Like `serve`, but HEAD requests are rejected (405 Method Not Allowed).
    pub fn serve_without_head(&self, path: &str, body: impl Into<Vec<u8>>) -> String {
        self.route(path, Route::NoHead(body.into()))
    }

    /// Makes `path` answer every request with `status` (e.g. 404 "Not Found").
    pub fn fail(&self, path: &str, status: u16, reason: &'static str) -> String {
        self.route(path, Route::Status(status, reason))
    }

    fn route(&self, path: &str, route: Route) -> String {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), route);
        self.url(path)
    }

    pub fn gets(&self, path: &str) -> usize {
        self.hits("GET", path)
    }

    pub fn heads(&self, path: &str) -> usize {
        self.hits("HEAD", path)
    }

    fn hits(&self, method: &str, path: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .hits
            .get(&(method.to_string(), path.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("").to_ascii_uppercase();
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target).to_string();

    let route = {
        let mut state = state.lock().unwrap();
        *state.hits.entry((method.clone(), path.clone())).or_insert(0) += 1;
        state.routes.get(&path).cloned()
    };

    let (status, body) = match route {
        Some(Route::Body(body)) => ("200 OK".to_string(), body),
        Some(Route::NoHead(_)) if method == "HEAD" => {
            ("405 Method Not Allowed".to_string(), Vec::new())
        }
        Some(Route::NoHead(body)) => ("200 OK".to_string(), body),
        Some(Route::Status(code, reason)) => (format!("{} {}", code, reason), reason.as_bytes().to_vec()),
        None => ("404 Not Found".to_string(), b"Not Found".to_vec()),
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    if method == "GET" {
        let _ = stream.write_all(&body);
    }
}
