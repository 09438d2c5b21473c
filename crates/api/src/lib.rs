mod env;
mod global_state;
mod middleware;
mod response;
mod utils;
mod routes;

pub use routes::{
    card_routes,
    collection_routes,
    misc_routes,
    print_routes,
};

pub use env::ApiServerEnv;
pub use global_state::GlobalState;
pub use utils::setup_tracing;
pub use middleware::authenticate;
pub use response::{AppError, AppSuccess};
