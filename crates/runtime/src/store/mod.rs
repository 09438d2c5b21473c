mod memory;
mod postgres;

use std::collections::HashSet;

use crate::{CollectedCardPrint, Collection, CoreError, CoreResult};

pub use memory::MemoryCollectionStore;
pub use postgres::{PgCollectionStore, bootstrap_schema};

pub(crate) const DUPLICATE_COLLECTION: &str = "A collection for this card already exists.";
pub(crate) const DUPLICATE_PRINT: &str = "Card print already exists in the collection.";

/// Persistence for collections and the prints collected within them.
///
/// Implementations must reject duplicate (`user_id`, `card_id`) collections and duplicate
/// (`collection_id`, `scryfall_id`) prints with `CoreError::Conflict`, and must delete a
/// collection together with its prints as one atomic unit.
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    async fn user_exists(&self, user_id: i64) -> CoreResult<bool>;

    /// Fails with `NotFound` when the owner does not exist.
    async fn create_collection(&self, collection: Collection) -> CoreResult<Collection>;
    async fn find_collection(&self, collection_id: i64) -> CoreResult<Option<Collection>>;
    async fn list_collections(&self, user_id: i64) -> CoreResult<Vec<Collection>>;

    /// Removes the collection and all of its prints. Returns how many prints went with it.
    async fn delete_collection(&self, collection_id: i64) -> CoreResult<u64>;

    /// Fails with `NotFound` when the collection does not exist.
    async fn add_print(&self, print: CollectedCardPrint) -> CoreResult<CollectedCardPrint>;
    /// Returns whether a row was removed.
    async fn remove_print(&self, collection_id: i64, scryfall_id: &str) -> CoreResult<bool>;
    async fn is_print_collected(&self, collection_id: i64, scryfall_id: &str) -> CoreResult<bool>;
    async fn collected_print_ids(&self, collection_id: i64) -> CoreResult<HashSet<String>>;

    /// Loads a collection on behalf of `user_id`. Someone else's collection is reported as
    /// missing.
    async fn find_owned_collection(&self, user_id: i64, collection_id: i64) -> CoreResult<Collection> {
        self.find_collection(collection_id)
            .await?
            .filter(|collection| collection.user_id == user_id)
            .ok_or_else(|| collection_not_found(collection_id))
    }
}

pub(crate) fn collection_not_found(collection_id: i64) -> CoreError {
    CoreError::NotFound(format!("Collection {} not found", collection_id))
}

pub(crate) fn user_not_found(user_id: i64) -> CoreError {
    CoreError::NotFound(format!("User {} not found", user_id))
}
