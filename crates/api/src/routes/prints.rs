use axum::{
    extract::{Path, State}, http::StatusCode, middleware, routing::{get, post}, Extension, Json, Router
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use cardfolio_runtime::CollectedCardPrint;

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess};
use crate::GlobalState;

pub fn print_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/collection/{id}/prints", post(add_print))
        .route("/collection/{id}/prints/{scryfall_id}", get(check_print).delete(remove_print))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddPrintRequest {
    #[serde(default)]
    pub scryfall_id: String,
}
async fn add_print(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path(id): Path<i64>,
    Json(payload): Json<AddPrintRequest>,
) -> Result<AppSuccess, AppError> {
    let print = CollectedCardPrint::new(id, &payload.scryfall_id)?;
    state.store().find_owned_collection(user_id, id).await?;
    let print = state.store().add_print(print).await?;

    Ok(AppSuccess::new(StatusCode::CREATED, "Card print added successfully", json!(print)))
}

async fn check_print(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path((id, scryfall_id)): Path<(i64, String)>,
) -> Result<AppSuccess, AppError> {
    state.store().find_owned_collection(user_id, id).await?;
    let collected = state.store().is_print_collected(id, &scryfall_id).await?;

    Ok(AppSuccess::new(StatusCode::OK, "Card print checked successfully", json!({
        "collected": collected
    })))
}

async fn remove_print(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path((id, scryfall_id)): Path<(i64, String)>,
) -> Result<AppSuccess, AppError> {
    state.store().find_owned_collection(user_id, id).await?;
    let removed = state.store().remove_print(id, &scryfall_id).await?;

    Ok(AppSuccess::new(StatusCode::OK, "Card print removed successfully", json!({
        "removed": removed
    })))
}
