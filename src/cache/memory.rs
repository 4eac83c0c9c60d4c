use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Cache, CacheEntry, Clock, SystemClock};

/// Process-local cache. Entries are only evicted when read after they
/// expire or when cleared, so the map grows with the number of distinct
/// keys.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry<Value>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("Cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("Cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl));
        let Some(expires_at) = expires_at else {
            tracing::warn!("TTL out of range for {}, not caching", key);
            return;
        };
        self.entries
            .lock()
            .expect("Cache lock poisoned")
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    async fn clear(&self, key: Option<&str>) {
        let mut entries = self.entries.lock().expect("Cache lock poisoned");
        match key {
            Some(k) => {
                entries.remove(k);
            }
            None => entries.clear(),
        }
    }
}
