use std::time::Duration;

use anyhow::anyhow;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde_json::Value;
use tracing::{error, info, warn};

use cardfolio_common::{define_module_client, ModuleClient};
use cardfolio_runtime::{CoreError, CoreResult, ResponseCache};

define_module_client! {
    (struct RedisClient, "redis")
    client_type: ConnectionManager,
    env: ["REDIS_URL"],
    setup: async {
        let redis_url = std::env::var("REDIS_URL")?;
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url)
            .map_err(|e| anyhow!("Failed to create Redis client: {}", e))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| anyhow!("Failed to create Redis connection manager: {}", e))?;

        info!("Redis connection established");
        Ok::<_, anyhow::Error>(manager)
    }
}

impl RedisClient {
    fn connection(&self) -> ConnectionManager {
        self.get_client().clone()
    }
}

#[async_trait::async_trait]
impl ResponseCache for RedisClient {
    async fn get(&self, key: &str) -> Option<Value> {
        let mut conn = self.connection();

        let data = match conn.get::<&str, Option<String>>(key).await {
            Ok(data) => data?,
            Err(e) => {
                warn!("Redis GET error for key {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to deserialize cache key {}: {}", key, e);
                None
            }
        }
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) -> CoreResult<()> {
        let mut conn = self.connection();

        // SETEX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);
        let json_data = value.to_string();

        conn.set_ex::<&str, String, ()>(key, json_data, ttl_secs)
            .await
            .map_err(|e| {
                error!("Redis SET error for key {}: {}", key, e);
                CoreError::Cache(format!("Redis SET failed: {}", e))
            })
    }
}
