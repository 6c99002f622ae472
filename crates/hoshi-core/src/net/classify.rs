//! Classify HTTP responses into retry/terminal outcomes.
//!
//! The classifier, not the transport, decides success or failure: the
//! session is built with status-raising disabled and every response lands
//! here. Pure and deterministic so the table is trivially testable.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use super::error::{Failure, HttpError};

/// Outcome of classifying one response attempt.
///
/// Only `Success` and `Fatal` terminate the retry loop; `RateLimited` stays
/// inside it as data.
#[derive(Debug)]
pub enum Outcome {
    /// 2xx; the caller extracts the payload.
    Success,
    /// 429; retry after the server-supplied delay when present.
    RateLimited {
        failure: Failure,
        retry_after: Option<Duration>,
        message: String,
    },
    /// Terminal typed error, raised immediately without retry.
    Fatal(HttpError),
}

/// Map a response's status, headers, and raw body to an [`Outcome`].
pub fn classify(status: StatusCode, headers: &HeaderMap, url: &str, body: &[u8]) -> Outcome {
    if status.is_success() {
        return Outcome::Success;
    }

    let failure = Failure {
        status: status.as_u16(),
        url: url.to_owned(),
        body: decode_body(body),
        headers: stringify_headers(headers),
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = retry_after(headers);
            let message = headers
                .get("message")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("too many requests")
                .to_owned();
            Outcome::RateLimited {
                failure,
                retry_after,
                message,
            }
        }
        StatusCode::UNAUTHORIZED => Outcome::Fatal(HttpError::Unauthorized(failure)),
        StatusCode::FORBIDDEN => Outcome::Fatal(HttpError::Forbidden(failure)),
        StatusCode::NOT_FOUND => Outcome::Fatal(HttpError::NotFound(failure)),
        StatusCode::BAD_REQUEST => Outcome::Fatal(HttpError::BadRequest(failure)),
        s if s.is_server_error() => Outcome::Fatal(HttpError::Internal(failure)),
        _ => Outcome::Fatal(HttpError::Status(failure)),
    }
}

/// Parse a `Retry-After` header as seconds (fractional values allowed).
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs: f64 = headers.get("Retry-After")?.to_str().ok()?.parse().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}

/// Decode a failure body as JSON, falling back to a lossy string.
fn decode_body(body: &[u8]) -> serde_json::Value {
    if body.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn stringify_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
