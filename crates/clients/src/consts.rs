use std::time::Duration;

pub const DEFAULT_SCRYFALL_API_URL: &str = "https://api.scryfall.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// the catalog asks API consumers to identify themselves
pub const USER_AGENT: &str = concat!("cardfolio/", env!("CARGO_PKG_VERSION"));
