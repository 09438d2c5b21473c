mod env;
mod postgres_connect;
mod sqlx_postgres;

pub use env::DatabaseEnv;
pub use postgres_connect::{connect, ensure_table};
pub use sqlx_postgres::*;
