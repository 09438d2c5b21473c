use std::time::Duration;

use anyhow::{Context, Result};
use cardfolio_common::{env_parse_or, EnvVars};
use cardfolio_runtime::{ttl, CacheTtl};

pub struct ApiServerEnv {
    pub secret_salt: String,
    pub port: u16,
    pub redis_url: Option<String>,
    pub request_timeout_secs: u64,

    pub card_printings_ttl_secs: u64,
    pub set_info_ttl_secs: u64,
    pub set_icon_ttl_secs: u64,
}

impl ApiServerEnv {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> CacheTtl {
        CacheTtl {
            card_printings: Duration::from_secs(self.card_printings_ttl_secs),
            set_info: Duration::from_secs(self.set_info_ttl_secs),
            set_icon: Duration::from_secs(self.set_icon_ttl_secs),
        }
    }
}

impl EnvVars for ApiServerEnv {
    fn load() -> Result<Self> {
        Ok(Self {
            secret_salt: std::env::var("SECRET_SALT").context("SECRET_SALT is not set")?,
            port: env_parse_or("PORT", 3033)?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            request_timeout_secs: env_parse_or("REQUEST_TIMEOUT_SECS", 30)?,

            card_printings_ttl_secs: env_parse_or("CARD_PRINTINGS_TTL_SECS", ttl::CARD_PRINTINGS.as_secs())?,
            set_info_ttl_secs: env_parse_or("SET_INFO_TTL_SECS", ttl::SET_INFO.as_secs())?,
            set_icon_ttl_secs: env_parse_or("SET_ICON_TTL_SECS", ttl::SET_ICON.as_secs())?,
        })
    }

    fn get_env_var(&self, key: &str) -> Option<String> {
        match key {
            "SECRET_SALT" => Some(self.secret_salt.clone()),
            "PORT" => Some(self.port.to_string()),
            "REDIS_URL" => self.redis_url.clone(),
            "REQUEST_TIMEOUT_SECS" => Some(self.request_timeout_secs.to_string()),
            "CARD_PRINTINGS_TTL_SECS" => Some(self.card_printings_ttl_secs.to_string()),
            "SET_INFO_TTL_SECS" => Some(self.set_info_ttl_secs.to_string()),
            "SET_ICON_TTL_SECS" => Some(self.set_icon_ttl_secs.to_string()),
            _ => None,
        }
    }
}
