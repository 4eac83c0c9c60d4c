//! TTL key/value cache used in front of upstream HTTP calls.
//!
//! Two backends implement [`Cache`]: [`MemoryCache`] for the lifetime
//! of the process and [`RestCache`] for a shared Redis-compatible
//! REST store. Both store JSON values and treat expired, missing and
//! unreadable entries the same way: as a miss.

mod clock;
mod memory;
mod rest;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryCache;
pub use rest::RestCache;

use crate::core::{AppConfig, CacheBackend};

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn set(&self, key: &str, value: Value, ttl: Duration);
    /// Remove a single key, or everything this cache owns when `key`
    /// is `None`.
    async fn clear(&self, key: Option<&str>);
}

/// Read a typed value. Anything that doesn't deserialize into `T` is a
/// miss.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let value = cache.get(key).await?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Ignoring unreadable cache entry {}: {}", key, e);
            None
        }
    }
}

pub async fn set_json<T: Serialize>(cache: &dyn Cache, key: &str, value: &T, ttl: Duration) {
    match serde_json::to_value(value) {
        Ok(v) => cache.set(key, v, ttl).await,
        Err(e) => tracing::warn!("Skipping cache write for {}: {}", key, e),
    }
}

/// Build the cache selected by the config.
pub fn cache_from_config(config: &AppConfig) -> Arc<dyn Cache> {
    match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCache::default()),
        CacheBackend::Rest => Arc::new(RestCache::new(
            config.cache_rest_url.as_deref(),
            config.cache_rest_token.as_deref(),
            &config.cache_key_prefix,
        )),
    }
}
