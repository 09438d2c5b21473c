mod consts;
mod postgres;
mod redis_client;
mod scryfall;

pub use postgres::PostgresClient;
pub use redis_client::RedisClient;
pub use scryfall::{ScryfallApi, ScryfallClient};

pub use consts::*;
