use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::ResponseCache;
use crate::CoreResult;

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// In-process TTL cache, used when no Redis is configured.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().await
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) -> CoreResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key.to_string(), CacheEntry {
            value,
            expires_at: now + ttl,
        });

        Ok(())
    }
}
