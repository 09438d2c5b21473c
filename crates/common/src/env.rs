use std::str::FromStr;

use anyhow::{anyhow, Result};

pub trait EnvVars: Sized {
    fn load() -> Result<Self>;
    fn get_env_var(&self, key: &str) -> Option<String>;
}

/// Reads `key`, falling back to `default` when it is unset or empty.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Reads and parses `key`. A present but unparsable value is an error, not a silent default.
pub fn env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.is_empty() => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        _ => Ok(default),
    }
}
