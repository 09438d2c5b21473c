use serde::{Deserialize, Serialize};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use cardfolio_common::get_current_timestamp;
use cardfolio_database::{SqlxCrud, SqlxFilterQuery, SqlxSchema};

use crate::{parse_oracle_id, CoreError, CoreResult};

/// Account row. Accounts are created by the authentication service; this crate only needs
/// them to exist for ownership and foreign keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,

    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = get_current_timestamp();
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl SqlxSchema for User {
    type Id = i64;

    const TABLE_NAME: &'static str = "users";
    const ID_COLUMN_NAME: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "created_at", "updated_at"];
    const INSERT_COLUMNS: &'static [&'static str] = &["name", "email", "created_at", "updated_at"];
    const CREATE_TABLE_SQL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )"#;
    const INDEXES_SQL: &'static [&'static str] = &[];
}

impl SqlxCrud for User {
    fn bind_insert<'q>(&self, query: QueryAs<'q, Postgres, Self, PgArguments>) -> QueryAs<'q, Postgres, Self, PgArguments> {
        query
            .bind(self.name.clone())
            .bind(self.email.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl SqlxFilterQuery for User {}

/// A user's tracking record for one card, identified by its oracle id.
/// At most one per (`user_id`, `card_id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Collection {
    pub id: i64,
    pub user_id: i64,
    pub card_id: String,
    pub card_name: String,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Collection {
    /// Validates and builds an unsaved collection. The id is assigned by the store.
    pub fn new(user_id: i64, card_id: &str, card_name: &str) -> CoreResult<Self> {
        let card_id = parse_oracle_id(card_id)?;
        let card_name = required("card_name", card_name)?;
        let now = get_current_timestamp();

        Ok(Self {
            id: 0,
            user_id,
            card_id,
            card_name,
            created_at: now,
            updated_at: now,
        })
    }
}

impl SqlxSchema for Collection {
    type Id = i64;

    const TABLE_NAME: &'static str = "collections";
    const ID_COLUMN_NAME: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "card_id", "card_name", "created_at", "updated_at"];
    const INSERT_COLUMNS: &'static [&'static str] = &["user_id", "card_id", "card_name", "created_at", "updated_at"];
    const CREATE_TABLE_SQL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS collections (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            card_id TEXT NOT NULL,
            card_name TEXT NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            CONSTRAINT collections_card_id_user_id_unique UNIQUE (card_id, user_id)
        )"#;
    const INDEXES_SQL: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_collections_user_id ON collections(user_id)",
    ];
}

impl SqlxCrud for Collection {
    fn bind_insert<'q>(&self, query: QueryAs<'q, Postgres, Self, PgArguments>) -> QueryAs<'q, Postgres, Self, PgArguments> {
        query
            .bind(self.user_id)
            .bind(self.card_id.clone())
            .bind(self.card_name.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl SqlxFilterQuery for Collection {}

/// "This collection contains this print." `scryfall_id` may carry the foil suffix.
/// At most one per (`collection_id`, `scryfall_id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CollectedCardPrint {
    pub id: i64,
    pub collection_id: i64,
    pub scryfall_id: String,

    pub created_at: i64,
    pub updated_at: i64,
}

impl CollectedCardPrint {
    pub fn new(collection_id: i64, scryfall_id: &str) -> CoreResult<Self> {
        let scryfall_id = required("scryfall_id", scryfall_id)?;
        let now = get_current_timestamp();

        Ok(Self {
            id: 0,
            collection_id,
            scryfall_id,
            created_at: now,
            updated_at: now,
        })
    }
}

impl SqlxSchema for CollectedCardPrint {
    type Id = i64;

    const TABLE_NAME: &'static str = "collected_card_prints";
    const ID_COLUMN_NAME: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["id", "collection_id", "scryfall_id", "created_at", "updated_at"];
    const INSERT_COLUMNS: &'static [&'static str] = &["collection_id", "scryfall_id", "created_at", "updated_at"];
    // no ON DELETE CASCADE: the store removes prints in the same transaction as their collection
    const CREATE_TABLE_SQL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS collected_card_prints (
            id BIGSERIAL PRIMARY KEY,
            collection_id BIGINT NOT NULL REFERENCES collections(id),
            scryfall_id TEXT NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            CONSTRAINT collected_card_prints_collection_print_unique UNIQUE (collection_id, scryfall_id)
        )"#;
    const INDEXES_SQL: &'static [&'static str] = &[];
}

impl SqlxCrud for CollectedCardPrint {
    fn bind_insert<'q>(&self, query: QueryAs<'q, Postgres, Self, PgArguments>) -> QueryAs<'q, Postgres, Self, PgArguments> {
        query
            .bind(self.collection_id)
            .bind(self.scryfall_id.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl SqlxFilterQuery for CollectedCardPrint {}

fn required(field: &str, value: &str) -> CoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::Validation(format!("The {} field is required.", field)));
    }
    Ok(value.to_string())
}
