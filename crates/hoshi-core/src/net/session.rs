//! Session lifecycle for the shared HTTP transport.
//!
//! Exactly one live client per pipeline instance, created lazily on first
//! use. The transport never raises on status (the classifier decides) and
//! never picks up proxy settings from the environment.

use std::time::Duration;

use super::error::SessionError;
use super::USER_AGENT;

/// Owned, lazily-created connection handle.
#[derive(Debug)]
pub struct Session {
    client: Option<reqwest::Client>,
    timeout: Duration,
}

impl Session {
    /// A closed session. Nothing is connected until [`Session::open`].
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: None,
            timeout,
        }
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    /// Create the underlying client. Fails if the session is already open.
    pub fn open(&mut self) -> Result<(), SessionError> {
        if self.client.is_some() {
            return Err(SessionError::AlreadyOpen);
        }
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .no_proxy()
            .build()
            .map_err(|e| SessionError::Build(e.to_string()))?;
        self.client = Some(client);
        tracing::debug!("acquired client session");
        Ok(())
    }

    /// Drop the underlying client. Fails if the session is not open.
    pub fn close(&mut self) -> Result<(), SessionError> {
        if self.client.take().is_none() {
            return Err(SessionError::NotOpen);
        }
        tracing::debug!("closed client session");
        Ok(())
    }

    /// Borrow the live client, or fail if the session is closed.
    pub fn client(&self) -> Result<&reqwest::Client, SessionError> {
        self.client.as_ref().ok_or(SessionError::NotOpen)
    }

    /// Borrow the live client, opening the session first if needed.
    /// Idempotent: an already-open session is reused as-is.
    pub(crate) fn client_or_open(&mut self) -> Result<&reqwest::Client, SessionError> {
        if self.client.is_none() {
            self.open()?;
        }
        self.client()
    }
}
