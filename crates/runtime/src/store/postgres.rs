use std::collections::HashSet;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use cardfolio_database::{ensure_table, is_unique_violation, OrderDirection, QueryCriteria, SqlxCrud, SqlxFilterQuery};

use super::{collection_not_found, user_not_found, CollectionStore, DUPLICATE_COLLECTION, DUPLICATE_PRINT};
use crate::{CollectedCardPrint, Collection, CoreError, CoreResult, User};

/// Creates the tables this crate reads and writes, parents first.
pub async fn bootstrap_schema(pool: &PgPool) -> Result<()> {
    ensure_table::<User>(pool).await?;
    ensure_table::<Collection>(pool).await?;
    ensure_table::<CollectedCardPrint>(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}

#[derive(Clone)]
pub struct PgCollectionStore {
    pool: PgPool,
}

impl PgCollectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn by_print(collection_id: i64, scryfall_id: &str) -> QueryCriteria {
    QueryCriteria::new()
        .add_valued_filter("collection_id", "=", collection_id)
        .add_valued_filter("scryfall_id", "=", scryfall_id.to_string())
}

#[async_trait::async_trait]
impl CollectionStore for PgCollectionStore {
    async fn user_exists(&self, user_id: i64) -> CoreResult<bool> {
        let count = User::count_by_criteria(QueryCriteria::by_id::<User>(user_id), &self.pool).await?;
        Ok(count > 0)
    }

    async fn create_collection(&self, collection: Collection) -> CoreResult<Collection> {
        let mut tx = self.pool.begin().await?;

        let owner = User::count_by_criteria(QueryCriteria::by_id::<User>(collection.user_id), &mut *tx).await?;
        if owner == 0 {
            return Err(user_not_found(collection.user_id));
        }

        let created = match collection.create(&mut *tx).await {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => {
                return Err(CoreError::Conflict(DUPLICATE_COLLECTION.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(created)
    }

    async fn find_collection(&self, collection_id: i64) -> CoreResult<Option<Collection>> {
        Ok(Collection::find_one_by_criteria(QueryCriteria::by_id::<Collection>(collection_id), &self.pool).await?)
    }

    async fn list_collections(&self, user_id: i64) -> CoreResult<Vec<Collection>> {
        let criteria = QueryCriteria::new()
            .add_valued_filter("user_id", "=", user_id)
            .order_by("card_name", OrderDirection::Asc);
        Ok(Collection::find_by_criteria(criteria, &self.pool).await?)
    }

    async fn delete_collection(&self, collection_id: i64) -> CoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let prints_removed = CollectedCardPrint::delete_by_criteria(
            QueryCriteria::new().add_valued_filter("collection_id", "=", collection_id),
            &mut *tx,
        ).await?;

        let deleted = Collection::delete_by_criteria(QueryCriteria::by_id::<Collection>(collection_id), &mut *tx).await?;
        if deleted == 0 {
            tx.rollback().await?;
            return Err(collection_not_found(collection_id));
        }

        tx.commit().await?;
        Ok(prints_removed)
    }

    async fn add_print(&self, print: CollectedCardPrint) -> CoreResult<CollectedCardPrint> {
        let mut tx = self.pool.begin().await?;

        // FOR SHARE keeps a concurrent delete from removing the collection under us
        let locked = sqlx::query("SELECT id FROM collections WHERE id = $1 FOR SHARE")
            .bind(print.collection_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(collection_not_found(print.collection_id));
        }

        let created = match print.create(&mut *tx).await {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => {
                return Err(CoreError::Conflict(DUPLICATE_PRINT.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(created)
    }

    async fn remove_print(&self, collection_id: i64, scryfall_id: &str) -> CoreResult<bool> {
        let removed = CollectedCardPrint::delete_by_criteria(by_print(collection_id, scryfall_id), &self.pool).await?;
        Ok(removed > 0)
    }

    async fn is_print_collected(&self, collection_id: i64, scryfall_id: &str) -> CoreResult<bool> {
        let count = CollectedCardPrint::count_by_criteria(by_print(collection_id, scryfall_id), &self.pool).await?;
        Ok(count > 0)
    }

    async fn collected_print_ids(&self, collection_id: i64) -> CoreResult<HashSet<String>> {
        let prints = CollectedCardPrint::find_by_criteria(
            QueryCriteria::new().add_valued_filter("collection_id", "=", collection_id),
            &self.pool,
        ).await?;

        Ok(prints.into_iter().map(|print| print.scryfall_id).collect())
    }
}
