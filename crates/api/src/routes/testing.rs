use std::sync::Arc;

use cardfolio_runtime::{
    CardCatalog, CatalogError, EnrichmentService, MemoryCache, MemoryCollectionStore, RawPrinting, RawSetInfo,
};

use crate::GlobalState;

pub const BOLT: &str = "4457ed35-7c10-48c8-9776-456485fdf070";

struct EmptyCatalog;

#[async_trait::async_trait]
impl CardCatalog for EmptyCatalog {
    async fn search_printings_by_card_id(&self, _card_id: &str) -> Result<Vec<RawPrinting>, CatalogError> {
        Ok(Vec::new())
    }

    async fn get_set_metadata(&self, set_id: &str) -> Result<RawSetInfo, CatalogError> {
        Ok(RawSetInfo { id: set_id.to_string(), ..Default::default() })
    }
}

/// State over in-memory parts with the given accounts registered.
pub async fn memory_state(users: &[i64]) -> (GlobalState, Arc<MemoryCollectionStore>) {
    let store = Arc::new(MemoryCollectionStore::new());
    for user in users {
        store.add_user(*user).await;
    }

    let enrichment = EnrichmentService::new(Arc::new(EmptyCatalog), Arc::new(MemoryCache::new()), store.clone());
    (GlobalState::from_parts(enrichment, "salt"), store)
}
