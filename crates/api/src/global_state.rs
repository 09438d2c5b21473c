use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use cardfolio_clients::{PostgresClient, RedisClient, ScryfallClient};
use cardfolio_common::ModuleClient;
use cardfolio_runtime::{CollectionStore, EnrichmentService, MemoryCache, ResponseCache};

use crate::env::ApiServerEnv;

#[derive(Clone)]
pub struct GlobalState {
    pub enrichment: EnrichmentService,
    secret_salt: Arc<str>,
}

impl GlobalState {
    pub async fn new(env: &ApiServerEnv) -> Result<Self> {
        let db = PostgresClient::setup_connection().await?;
        let store: Arc<dyn CollectionStore> = Arc::new(db.collection_store());

        let cache: Arc<dyn ResponseCache> = match env.redis_url {
            Some(_) => Arc::new(RedisClient::setup_connection().await?),
            None => {
                info!("REDIS_URL not set, caching catalog responses in memory");
                Arc::new(MemoryCache::new())
            }
        };

        let catalog = Arc::new(ScryfallClient::setup_connection().await?);
        let enrichment = EnrichmentService::with_ttl(catalog, cache, store, env.cache_ttl());

        Ok(Self::from_parts(enrichment, &env.secret_salt))
    }

    pub fn from_parts(enrichment: EnrichmentService, secret_salt: &str) -> Self {
        Self {
            enrichment,
            secret_salt: Arc::from(secret_salt),
        }
    }

    pub fn store(&self) -> &Arc<dyn CollectionStore> {
        self.enrichment.store()
    }

    pub fn secret_salt(&self) -> &str {
        &self.secret_salt
    }
}
