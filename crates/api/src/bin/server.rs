use anyhow::{Context, Result};
use axum::Router;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use cardfolio_common::EnvVars;
use cardfolio_service_api::{
    card_routes, collection_routes, misc_routes, print_routes, setup_tracing, ApiServerEnv, GlobalState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing()?;

    let env = ApiServerEnv::load()?;
    let state = GlobalState::new(&env).await?;

    let cors = CorsLayer::very_permissive();
    let trace = TraceLayer::new_for_http();
    let timeout = TimeoutLayer::new(env.request_timeout());

    let app = Router::new()
        .merge(collection_routes(state.clone()))
        .merge(print_routes(state.clone()))
        .merge(card_routes(state.clone()))
        .merge(misc_routes())
        .layer(timeout)
        .layer(cors)
        .layer(trace)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!(":::{}", env.port))
        .await
        .with_context(|| format!("failed to bind port {}", env.port))?;

    tracing::info!("LISTENING ON {}", env.port);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
