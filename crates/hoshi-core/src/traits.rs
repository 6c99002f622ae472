//! Capability traits at the collaborator seams.
//!
//! Consumers take these instead of concrete types so the transport and the
//! hash store can be swapped (or mocked) without touching call sites.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use crate::cache::CacheError;
use crate::net::{HttpError, Payload, RequestOptions};

/// Any HTTP client able to run the request pipeline contract.
#[async_trait]
pub trait NetRunner: Send + Sync {
    /// Perform one logical request. See [`crate::net::HttpNet::request`].
    async fn request(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<Payload, HttpError>;
}

/// Keyed hash store: buckets of field -> JSON value, with optional expiry.
#[async_trait]
pub trait HashRunner: Send + Sync {
    async fn set(
        &self,
        bucket: &str,
        field: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// Returns `None` when the field is absent or expired.
    async fn get(&self, bucket: &str, field: &str) -> Result<Option<serde_json::Value>, CacheError>;

    async fn delete(&self, bucket: &str, field: &str) -> Result<(), CacheError>;
}
