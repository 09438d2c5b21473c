use std::collections::{BTreeMap, HashSet};

use tokio::sync::RwLock;

use super::{collection_not_found, user_not_found, CollectionStore, DUPLICATE_COLLECTION, DUPLICATE_PRINT};
use crate::{CollectedCardPrint, Collection, CoreError, CoreResult};

#[derive(Default)]
struct MemoryState {
    users: HashSet<i64>,
    collections: BTreeMap<i64, Collection>,
    prints: Vec<CollectedCardPrint>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store with the same constraints as the Postgres one. Every mutation runs
/// under a single write lock, so a collection and its prints always disappear together.
#[derive(Default)]
pub struct MemoryCollectionStore {
    state: RwLock<MemoryState>,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account id, standing in for the authentication service.
    pub async fn add_user(&self, user_id: i64) {
        self.state.write().await.users.insert(user_id);
    }

    pub async fn print_count(&self, collection_id: i64) -> usize {
        self.state.read().await
            .prints
            .iter()
            .filter(|print| print.collection_id == collection_id)
            .count()
    }
}

#[async_trait::async_trait]
impl CollectionStore for MemoryCollectionStore {
    async fn user_exists(&self, user_id: i64) -> CoreResult<bool> {
        Ok(self.state.read().await.users.contains(&user_id))
    }

    async fn create_collection(&self, mut collection: Collection) -> CoreResult<Collection> {
        let mut state = self.state.write().await;

        if !state.users.contains(&collection.user_id) {
            return Err(user_not_found(collection.user_id));
        }
        let duplicate = state.collections.values().any(|existing| {
            existing.user_id == collection.user_id && existing.card_id == collection.card_id
        });
        if duplicate {
            return Err(CoreError::Conflict(DUPLICATE_COLLECTION.to_string()));
        }

        collection.id = state.next_id();
        state.collections.insert(collection.id, collection.clone());
        Ok(collection)
    }

    async fn find_collection(&self, collection_id: i64) -> CoreResult<Option<Collection>> {
        Ok(self.state.read().await.collections.get(&collection_id).cloned())
    }

    async fn list_collections(&self, user_id: i64) -> CoreResult<Vec<Collection>> {
        let mut collections = self.state.read().await
            .collections
            .values()
            .filter(|collection| collection.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        collections.sort_by(|a, b| a.card_name.cmp(&b.card_name));
        Ok(collections)
    }

    async fn delete_collection(&self, collection_id: i64) -> CoreResult<u64> {
        let mut state = self.state.write().await;

        if state.collections.remove(&collection_id).is_none() {
            return Err(collection_not_found(collection_id));
        }

        let before = state.prints.len();
        state.prints.retain(|print| print.collection_id != collection_id);
        Ok((before - state.prints.len()) as u64)
    }

    async fn add_print(&self, mut print: CollectedCardPrint) -> CoreResult<CollectedCardPrint> {
        let mut state = self.state.write().await;

        if !state.collections.contains_key(&print.collection_id) {
            return Err(collection_not_found(print.collection_id));
        }
        let duplicate = state.prints.iter().any(|existing| {
            existing.collection_id == print.collection_id && existing.scryfall_id == print.scryfall_id
        });
        if duplicate {
            return Err(CoreError::Conflict(DUPLICATE_PRINT.to_string()));
        }

        print.id = state.next_id();
        state.prints.push(print.clone());
        Ok(print)
    }

    async fn remove_print(&self, collection_id: i64, scryfall_id: &str) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.prints.len();
        state.prints.retain(|print| !(print.collection_id == collection_id && print.scryfall_id == scryfall_id));
        Ok(state.prints.len() < before)
    }

    async fn is_print_collected(&self, collection_id: i64, scryfall_id: &str) -> CoreResult<bool> {
        Ok(self.state.read().await.prints.iter().any(|print| {
            print.collection_id == collection_id && print.scryfall_id == scryfall_id
        }))
    }

    async fn collected_print_ids(&self, collection_id: i64) -> CoreResult<HashSet<String>> {
        Ok(self.state.read().await
            .prints
            .iter()
            .filter(|print| print.collection_id == collection_id)
            .map(|print| print.scryfall_id.clone())
            .collect())
    }
}
