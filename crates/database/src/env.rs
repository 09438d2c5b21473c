use anyhow::{Context, Result};

use cardfolio_common::{env_parse_or, EnvVars};

pub struct DatabaseEnv {
    pub database_url: String,
    pub max_connections: u32,
}

impl EnvVars for DatabaseEnv {
    fn load() -> Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
            max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }

    fn get_env_var(&self, key: &str) -> Option<String> {
        match key {
            "DATABASE_URL" => Some(self.database_url.clone()),
            "DATABASE_MAX_CONNECTIONS" => Some(self.max_connections.to_string()),
            _ => None,
        }
    }
}
