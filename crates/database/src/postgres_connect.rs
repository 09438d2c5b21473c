use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{DatabaseEnv, SqlxSchema};

/// Opens the connection pool described by `env`.
pub async fn connect(env: &DatabaseEnv) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(env.max_connections)
        .connect(&env.database_url)
        .await
        .context("Failed to connect to database")?;

    info!("Connected to Postgres (max {} connections)", env.max_connections);
    Ok(pool)
}

/// Creates the table and indexes for `T` when they do not exist yet.
/// Tables with foreign keys must be ensured after the tables they reference.
pub async fn ensure_table<T: SqlxSchema>(pool: &PgPool) -> Result<()> {
    sqlx::query(T::CREATE_TABLE_SQL)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create table '{}'", T::TABLE_NAME))?;

    for index_sql in T::INDEXES_SQL {
        sqlx::query(index_sql)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create index on '{}'", T::TABLE_NAME))?;
    }

    Ok(())
}
