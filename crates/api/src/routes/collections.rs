use axum::{
    extract::{Path, State}, http::StatusCode, middleware, routing::{get, post}, Extension, Json, Router
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use cardfolio_runtime::Collection;

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess};
use crate::GlobalState;

pub fn collection_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/collections", get(list_collections))
        .route("/collection/create", post(create_collection))
        .route("/collection/{id}", get(get_collection).delete(delete_collection))
        .route("/collection/{id}/card", get(get_collection_card))
        .route("/collection/{id}/stats", get(get_collection_stats))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

async fn list_collections(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
) -> Result<AppSuccess, AppError> {
    let collections = state.store().list_collections(user_id).await?;
    Ok(AppSuccess::new(StatusCode::OK, "Collections fetched successfully", json!(collections)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub card_name: String,
}
async fn create_collection(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Json(payload): Json<CreateCollectionRequest>,
) -> Result<AppSuccess, AppError> {
    let collection = Collection::new(user_id, &payload.card_id, &payload.card_name)?;
    let collection = state.store().create_collection(collection).await?;

    info!("User {} created collection {} for card {}", user_id, collection.id, collection.card_id);
    Ok(AppSuccess::new(StatusCode::CREATED, "Collection created successfully", json!(collection)))
}

async fn get_collection(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path(id): Path<i64>,
) -> Result<AppSuccess, AppError> {
    let collection = state.store().find_owned_collection(user_id, id).await?;
    Ok(AppSuccess::new(StatusCode::OK, "Collection fetched successfully", json!(collection)))
}

async fn delete_collection(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path(id): Path<i64>,
) -> Result<AppSuccess, AppError> {
    state.store().find_owned_collection(user_id, id).await?;
    let prints_removed = state.store().delete_collection(id).await?;

    info!("User {} deleted collection {} with {} prints", user_id, id, prints_removed);
    Ok(AppSuccess::new(StatusCode::OK, "Collection deleted successfully", json!({
        "prints_removed": prints_removed
    })))
}

async fn get_collection_card(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path(id): Path<i64>,
) -> Result<AppSuccess, AppError> {
    let collection = state.store().find_owned_collection(user_id, id).await?;
    let view = state.enrichment.card_view(&collection.card_id, collection.id).await?;

    Ok(AppSuccess::new(StatusCode::OK, "Card fetched successfully", json!(view)))
}

async fn get_collection_stats(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path(id): Path<i64>,
) -> Result<AppSuccess, AppError> {
    state.store().find_owned_collection(user_id, id).await?;
    let stats = state.enrichment.collection_stats(id).await?;

    Ok(AppSuccess::new(StatusCode::OK, "Collection stats fetched successfully", json!(stats)))
}
