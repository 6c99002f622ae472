//! Minimal scripted HTTP/1.1 server for pipeline integration tests.
//!
//! Serves a fixed sequence of canned responses, one per request, repeating
//! the last one once the script runs out. Tracks how many requests were
//! seen and the maximum number of simultaneously open connections so tests
//! can assert retry counts and mutual exclusion.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Hold the connection open this long before responding. Used to widen
    /// the window for overlap detection.
    pub delay: Option<Duration>,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    pub fn raw(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_owned(), "text/plain".to_owned())],
            body: body.to_vec(),
            delay: None,
        }
    }

    pub fn rate_limited(retry_after: &str, message: &str) -> Self {
        Self {
            status: 429,
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                ("Retry-After".to_owned(), retry_after.to_owned()),
                ("message".to_owned(), message.to_owned()),
            ],
            body: br#"{"error": "slow down"}"#.to_vec(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    max_overlap: AtomicUsize,
}

pub struct ServerHandle {
    pub url: String,
    counters: Arc<Counters>,
}

impl ServerHandle {
    /// Requests observed so far.
    pub fn hits(&self) -> usize {
        self.counters.hits.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were ever open at the same instant.
    pub fn max_overlap(&self) -> usize {
        self.counters.max_overlap.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `script` in order.
/// Returns a handle with the base URL. The server runs until the process
/// exits.
pub fn start(script: Vec<CannedResponse>) -> ServerHandle {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let counters = Arc::new(Counters::default());
    let script = Arc::new(Mutex::new(VecDeque::from(script)));

    let thread_counters = Arc::clone(&counters);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let counters = Arc::clone(&thread_counters);
            let script = Arc::clone(&script);
            thread::spawn(move || handle(stream, &script, &counters));
        }
    });

    ServerHandle {
        url: format!("http://127.0.0.1:{}/", port),
        counters,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    script: &Mutex<VecDeque<CannedResponse>>,
    counters: &Counters,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    if std::str::from_utf8(&buf[..n]).is_err() {
        return;
    }

    counters.hits.fetch_add(1, Ordering::SeqCst);
    let open = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    counters.max_overlap.fetch_max(open, Ordering::SeqCst);

    let response = {
        let mut script = script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front()
        } else {
            // Keep serving the final response so exhaustion tests can
            // retry as often as they like.
            script.front().cloned()
        }
    };

    if let Some(response) = response {
        if let Some(delay) = response.delay {
            thread::sleep(delay);
        }
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            response.status,
            reason(response.status),
            response.body.len()
        );
        for (name, value) in &response.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("\r\n");
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(&response.body);
    }

    counters.in_flight.fetch_sub(1, Ordering::SeqCst);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
