mod client;
mod env;
mod token;

pub use client::{missing_env_vars, ModuleClient};
pub use env::{EnvVars, env_or, env_parse_or};
pub use token::{sign_user_token, verify_user_token};

pub fn get_current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
