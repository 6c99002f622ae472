//! Key-value hash cache: fast bucket/field -> value storage for bot state
//! (guild prefixes, mute roles) that doesn't belong in the relational store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::traits::HashRunner;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The looked-up entry is absent (or expired).
    #[error("no cached entry for {0}")]
    Missing(String),
    /// A stored value didn't have the expected shape.
    #[error("invalid cached value for {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory [`HashRunner`] implementation.
///
/// Entries carry an optional expiry and are dropped lazily on read.
#[derive(Debug, Default)]
pub struct Memory {
    buckets: RwLock<HashMap<String, HashMap<String, Entry>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HashRunner for Memory {
    async fn set(
        &self,
        bucket: &str,
        field: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        let mut buckets = self.buckets.write().await;
        buckets
            .entry(bucket.to_owned())
            .or_default()
            .insert(field.to_owned(), entry);
        Ok(())
    }

    async fn get(&self, bucket: &str, field: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let now = Instant::now();
        let mut buckets = self.buckets.write().await;
        let Some(fields) = buckets.get_mut(bucket) else {
            return Ok(None);
        };
        match fields.get(field) {
            Some(entry) if entry.is_expired(now) => {
                fields.remove(field);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, bucket: &str, field: &str) -> Result<(), CacheError> {
        let mut buckets = self.buckets.write().await;
        if let Some(fields) = buckets.get_mut(bucket) {
            fields.remove(field);
        }
        Ok(())
    }
}

const PREFIXES: &str = "prefixes";
const MUTES: &str = "mutes";

/// Typed layer over a [`HashRunner`] for the bot's per-guild state.
#[derive(Clone)]
pub struct BotCache {
    hash: Arc<dyn HashRunner>,
}

impl BotCache {
    pub fn new(hash: Arc<dyn HashRunner>) -> Self {
        Self { hash }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(Memory::new()))
    }

    pub async fn set_prefix(&self, guild_id: u64, prefix: &str) -> Result<(), CacheError> {
        self.hash
            .set(PREFIXES, &guild_id.to_string(), prefix.into(), None)
            .await
    }

    /// The cached prefix for a guild. Missing entries are an error so the
    /// caller can fall back to the default prefix explicitly.
    pub async fn prefix(&self, guild_id: u64) -> Result<String, CacheError> {
        let key = guild_id.to_string();
        match self.hash.get(PREFIXES, &key).await? {
            Some(serde_json::Value::String(prefix)) => Ok(prefix),
            Some(_) => Err(CacheError::Invalid(key)),
            None => Err(CacheError::Missing(key)),
        }
    }

    pub async fn remove_prefix(&self, guild_id: u64) -> Result<(), CacheError> {
        self.hash.delete(PREFIXES, &guild_id.to_string()).await
    }

    pub async fn set_mute_role(&self, guild_id: u64, role_id: u64) -> Result<(), CacheError> {
        self.hash
            .set(MUTES, &guild_id.to_string(), role_id.into(), None)
            .await
    }

    pub async fn mute_role(&self, guild_id: u64) -> Result<u64, CacheError> {
        let key = guild_id.to_string();
        match self.hash.get(MUTES, &key).await? {
            Some(value) => value
                .as_u64()
                .ok_or(CacheError::Invalid(key)),
            None => Err(CacheError::Missing(key)),
        }
    }

    pub async fn remove_mute_role(&self, guild_id: u64) -> Result<(), CacheError> {
        self.hash.delete(MUTES, &guild_id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_roundtrip() {
        let memory = Memory::new();
        memory
            .set("b", "f", serde_json::json!(42), None)
            .await
            .unwrap();
        assert_eq!(
            memory.get("b", "f").await.unwrap(),
            Some(serde_json::json!(42))
        );
        memory.delete("b", "f").await.unwrap();
        assert_eq!(memory.get("b", "f").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let memory = Memory::new();
        memory
            .set("b", "f", serde_json::json!("x"), Some(Duration::from_millis(10)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(memory.get("b", "f").await.unwrap(), None);
    }

    #[tokio::test]
    async fn prefix_missing_is_distinct() {
        let cache = BotCache::in_memory();
        assert_eq!(
            cache.prefix(1).await,
            Err(CacheError::Missing("1".to_owned()))
        );
        cache.set_prefix(1, "?").await.unwrap();
        assert_eq!(cache.prefix(1).await.unwrap(), "?");
        cache.remove_prefix(1).await.unwrap();
        assert!(matches!(cache.prefix(1).await, Err(CacheError::Missing(_))));
    }

    #[tokio::test]
    async fn mute_role_roundtrip() {
        let cache = BotCache::in_memory();
        cache.set_mute_role(7, 99).await.unwrap();
        assert_eq!(cache.mute_role(7).await.unwrap(), 99);
        cache.remove_mute_role(7).await.unwrap();
        assert!(matches!(
            cache.mute_role(7).await,
            Err(CacheError::Missing(_))
        ));
    }
}
