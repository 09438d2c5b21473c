use sqlx::PgPool;

use cardfolio_common::{define_module_client, EnvVars, ModuleClient};
use cardfolio_database::{connect, DatabaseEnv};
use cardfolio_runtime::{bootstrap_schema, PgCollectionStore};

define_module_client! {
    (struct PostgresClient, "postgres")
    client_type: PgPool,
    env: ["DATABASE_URL"],
    setup: async {
        let pool = connect(&DatabaseEnv::load()?).await?;
        bootstrap_schema(&pool).await?;
        Ok::<_, anyhow::Error>(pool)
    }
}

impl PostgresClient {
    pub fn collection_store(&self) -> PgCollectionStore {
        PgCollectionStore::new(self.get_client().clone())
    }
}
