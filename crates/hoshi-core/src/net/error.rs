//! Typed errors for the request pipeline.
//!
//! Terminal HTTP failures carry the full diagnostic context (status, body,
//! URL, headers) so callers can render short human messages without
//! re-fetching anything.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Diagnostic context captured once per terminal non-2xx response.
#[derive(Debug, Clone)]
pub struct Failure {
    /// HTTP status code of the response.
    pub status: u16,
    /// The URL the request was sent to.
    pub url: String,
    /// Decoded response body, or a string fallback when it wasn't JSON.
    pub body: serde_json::Value,
    /// Response headers, lossily stringified.
    pub headers: HashMap<String, String>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}", self.status, self.url)
    }
}

/// Session lifecycle errors. Double-open and use-after-close are programmer
/// errors and are reported, never silently tolerated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session is already open")]
    AlreadyOpen,
    #[error("session is not open")]
    NotOpen,
    #[error("could not build HTTP client: {0}")]
    Build(String),
}

/// Error taxonomy for one logical `request()` call.
///
/// `Transport` and `RateLimited` are handled inside the retry loop and only
/// surface through `RetriesExhausted`; everything else terminates the call
/// immediately.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Connection-level failure (connect, timeout, reset).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON. Never retried.
    #[error("could not decode JSON from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The target URL failed to parse.
    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("bad request: {0}")]
    BadRequest(Failure),

    #[error("unauthorized: {0}")]
    Unauthorized(Failure),

    #[error("forbidden: {0}")]
    Forbidden(Failure),

    #[error("not found: {0}")]
    NotFound(Failure),

    /// Server asked us to slow down. Surfaces only via `RetriesExhausted`.
    #[error("rate limited ({message}) for {retry_after:?}: {failure}")]
    RateLimited {
        failure: Failure,
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("internal server error: {0}")]
    Internal(Failure),

    /// Any other non-2xx status.
    #[error("unexpected status: {0}")]
    Status(Failure),

    /// A getter named a key absent from the decoded body. Never retried.
    #[error("key {key:?} missing from response body of {url}")]
    MissingKey { key: String, url: String },

    /// A getter was supplied but the body was not a JSON object.
    #[error("expected a JSON object from {url}")]
    NotAnObject { url: String },

    /// The retry budget ran out on a retryable failure.
    #[error("gave up after {attempts} retries: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<HttpError>,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl HttpError {
    /// The terminal failure context, when this error carries one.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            HttpError::BadRequest(f)
            | HttpError::Unauthorized(f)
            | HttpError::Forbidden(f)
            | HttpError::NotFound(f)
            | HttpError::Internal(f)
            | HttpError::Status(f)
            | HttpError::RateLimited { failure: f, .. } => Some(f),
            HttpError::RetriesExhausted { last, .. } => last.failure(),
            _ => None,
        }
    }

    /// Status code of the underlying response, when known.
    pub fn status(&self) -> Option<u16> {
        self.failure().map(|f| f.status)
    }
}
