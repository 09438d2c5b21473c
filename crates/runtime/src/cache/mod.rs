mod memory;

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{CoreError, CoreResult};

pub use memory::MemoryCache;

/// Key/value store for catalog responses. Never a source of truth: a miss, an expired entry
/// or an undecodable entry are all recovered by fetching again.
#[async_trait::async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn put(&self, key: &str, value: Value, ttl: Duration) -> CoreResult<()>;
}

pub async fn get_json<T: DeserializeOwned>(cache: &dyn ResponseCache, key: &str) -> Option<T> {
    let value = cache.get(key).await?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Failed to deserialize cache key {}: {}", key, e);
            None
        }
    }
}

pub async fn set_json<T: Serialize>(cache: &dyn ResponseCache, key: &str, value: &T, ttl: Duration) -> CoreResult<()> {
    let value = serde_json::to_value(value).map_err(|e| CoreError::Cache(e.to_string()))?;
    cache.put(key, value, ttl).await
}

// Cache key builders; each entity kind gets its own namespace
pub mod keys {
    pub fn card_printings(card_id: &str) -> String {
        format!("card_printings_{}", card_id)
    }

    pub fn set_info(set_id: &str) -> String {
        format!("set_info_{}", set_id)
    }

    pub fn set_icon(set_id: &str) -> String {
        format!("set_icon_{}", set_id)
    }
}

pub mod ttl {
    use std::time::Duration;

    pub const CARD_PRINTINGS: Duration = Duration::from_secs(24 * 60 * 60);
    pub const SET_INFO: Duration = Duration::from_secs(48 * 60 * 60);
    pub const SET_ICON: Duration = Duration::from_secs(48 * 60 * 60);
}

/// Per key-class expiry. Each class is configured on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub card_printings: Duration,
    pub set_info: Duration,
    pub set_icon: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            card_printings: ttl::CARD_PRINTINGS,
            set_info: ttl::SET_INFO,
            set_icon: ttl::SET_ICON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_kind() {
        let id = "0e386888-57f5-4eb6-88e8-5679bb8eb290";
        let keys = [keys::card_printings(id), keys::set_info(id), keys::set_icon(id)];
        assert_eq!(keys[0], format!("card_printings_{}", id));
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
    }

    #[test]
    fn printings_refresh_twice_as_often_as_sets() {
        let ttl = CacheTtl::default();
        assert_eq!(ttl.card_printings * 2, ttl.set_info);
        assert_eq!(ttl.set_info, ttl.set_icon);
    }
}
