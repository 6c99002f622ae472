//! Outbound HTTP pipeline.
//!
//! One [`HttpNet`] owns one lazily-created session and serializes all
//! callers through a mutual-exclusion gate, so concurrent requests queue
//! instead of racing on shared transport state. Each logical request runs a
//! bounded retry loop: transport failures and 429s are retried with backoff
//! (the 429 delay coming verbatim from the server), every other non-2xx
//! status raises a typed error immediately.

mod backoff;
mod classify;
mod error;
mod session;

pub use backoff::Backoff;
pub use classify::{classify, Outcome};
pub use error::{Failure, HttpError, SessionError};
pub use session::Session;

use std::time::Duration;

use reqwest::Method;
use tokio::sync::Mutex;
use url::Url;

use crate::config::RetryConfig;
use crate::traits::NetRunner;

/// Identifying header attached to every outbound request.
pub const USER_AGENT: &str = concat!("Hoshi DiscordBot/", env!("CARGO_PKG_VERSION"));

/// Default per-call transport timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracted response payload.
///
/// An empty 2xx body decodes to `Json(Value::Null)` rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            Payload::Json(_) => None,
        }
    }
}

/// Immutable description of one logical request. Built once, never mutated
/// by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Narrow the decoded JSON object down to this key. A missing key is a
    /// fatal lookup error, not a retry.
    pub getter: Option<String>,
    /// Optional JSON request body.
    pub json: Option<serde_json::Value>,
    /// Optional bearer token.
    pub auth: Option<String>,
    /// Return the raw body without JSON decoding.
    pub unwrap_bytes: bool,
    /// Extra query parameters.
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn getter(mut self, key: impl Into<String>) -> Self {
        self.getter = Some(key.into());
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(token.into());
        self
    }

    pub fn unwrap_bytes(mut self) -> Self {
        self.unwrap_bytes = true;
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// How one attempt ended when it didn't produce a payload.
enum Step {
    /// Terminal: surface to the caller as-is.
    Fatal(HttpError),
    /// Retryable: loop again, optionally with a server-dictated delay.
    Retry {
        err: HttpError,
        server_delay: Option<Duration>,
    },
}

/// The request pipeline. Cheap to share behind an `Arc`; distinct instances
/// are fully independent and never contend.
#[derive(Debug)]
pub struct HttpNet {
    /// Session and single-flight gate in one: holding the lock is holding
    /// the right to use the transport.
    session: Mutex<Session>,
    retry: RetryConfig,
}

impl Default for HttpNet {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpNet {
    pub fn new() -> Self {
        Self::with_config(RetryConfig::default(), DEFAULT_TIMEOUT)
    }

    pub fn with_config(retry: RetryConfig, timeout: Duration) -> Self {
        Self {
            session: Mutex::new(Session::new(timeout)),
            retry,
        }
    }

    /// Eagerly open the session. Fails if already open.
    pub async fn open(&self) -> Result<(), SessionError> {
        self.session.lock().await.open()
    }

    /// Close the session. Fails if not open. Subsequent requests re-open
    /// lazily.
    pub async fn close(&self) -> Result<(), SessionError> {
        self.session.lock().await.close()
    }

    /// Perform one logical request.
    ///
    /// Returns the raw bytes when `unwrap_bytes` is set, the value under
    /// `getter` when one is set, and the whole decoded body otherwise.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<Payload, HttpError> {
        let target = Url::parse(url).map_err(|source| HttpError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;

        // The gate: held for the whole call, including backoff sleeps, so at
        // most one request per instance touches the transport at a time.
        let mut session = self.session.lock().await;
        let client = session.client_or_open()?.clone();

        let mut backoff = Backoff::from_config(&self.retry);
        loop {
            match self.attempt(&client, method.clone(), &target, &opts).await {
                Ok(payload) => return Ok(payload),
                Err(Step::Fatal(err)) => return Err(err),
                Err(Step::Retry { err, server_delay }) => {
                    if let Some(delay) = server_delay {
                        backoff.set_next_backoff(delay);
                    }
                    match backoff.next() {
                        Some(delay) => {
                            tracing::debug!(
                                url = %target,
                                retry = backoff.attempts(),
                                ?delay,
                                %err,
                                "retrying request"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            return Err(HttpError::RetriesExhausted {
                                attempts: backoff.attempts(),
                                last: Box::new(err),
                            })
                        }
                    }
                }
            }
        }
    }

    /// Send the request once and classify what came back.
    async fn attempt(
        &self,
        client: &reqwest::Client,
        method: Method,
        url: &Url,
        opts: &RequestOptions,
    ) -> Result<Payload, Step> {
        let mut request = client.request(method.clone(), url.clone());
        if !opts.query.is_empty() {
            request = request.query(&opts.query);
        }
        if let Some(body) = &opts.json {
            request = request.json(body);
        }
        if let Some(token) = &opts.auth {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            // Payload/decode mismatches abort retrying; connection-level
            // failures are retryable.
            Err(e) if e.is_decode() || e.is_body() => {
                return Err(Step::Fatal(HttpError::Transport(e)))
            }
            Err(e) => {
                return Err(Step::Retry {
                    err: HttpError::Transport(e),
                    server_delay: None,
                })
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(Step::Fatal(HttpError::Transport(e))),
        };

        match classify(status, &headers, url.as_str(), &bytes) {
            Outcome::Success => {
                tracing::debug!(%method, %url, %status, "request success");
                self.extract(url, opts, &bytes).map_err(Step::Fatal)
            }
            Outcome::RateLimited {
                failure,
                retry_after,
                message,
            } => {
                tracing::warn!(%method, %url, ?retry_after, %message, "rate limited");
                Err(Step::Retry {
                    err: HttpError::RateLimited {
                        failure,
                        retry_after,
                        message,
                    },
                    server_delay: retry_after,
                })
            }
            Outcome::Fatal(err) => Err(Step::Fatal(err)),
        }
    }

    /// Narrow a successful response body down to the requested payload.
    fn extract(
        &self,
        url: &Url,
        opts: &RequestOptions,
        bytes: &[u8],
    ) -> Result<Payload, HttpError> {
        if opts.unwrap_bytes {
            return Ok(Payload::Bytes(bytes.to_vec()));
        }
        if bytes.is_empty() {
            return Ok(Payload::Json(serde_json::Value::Null));
        }

        let data: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|source| HttpError::Decode {
                url: url.to_string(),
                source,
            })?;

        let Some(key) = &opts.getter else {
            return Ok(Payload::Json(data));
        };

        match data {
            serde_json::Value::Object(mut map) => match map.remove(key) {
                Some(value) => Ok(Payload::Json(value)),
                None => Err(HttpError::MissingKey {
                    key: key.clone(),
                    url: url.to_string(),
                }),
            },
            _ => Err(HttpError::NotAnObject {
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl NetRunner for HttpNet {
    async fn request(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<Payload, HttpError> {
        HttpNet::request(self, method, url, opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accessors() {
        assert_eq!(
            Payload::Json(serde_json::json!(1)).into_json(),
            Some(serde_json::json!(1))
        );
        assert_eq!(Payload::Json(serde_json::json!(1)).into_bytes(), None);
        assert_eq!(Payload::Bytes(vec![1, 2]).into_bytes(), Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_any_io() {
        let net = HttpNet::new();
        let err = net
            .request(Method::GET, "not a url", RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn explicit_open_close_pairing() {
        let net = HttpNet::new();
        net.open().await.unwrap();
        assert_eq!(net.open().await, Err(SessionError::AlreadyOpen));
        net.close().await.unwrap();
        assert_eq!(net.close().await, Err(SessionError::NotOpen));
    }
}
