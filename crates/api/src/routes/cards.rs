use axum::{
    extract::{Path, Query, State}, http::StatusCode, middleware, routing::get, Extension, Router
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess};
use crate::GlobalState;

pub fn card_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/set/{set_id}", get(get_set))

        .route("/card/{card_id}",
            get(get_card)
            .route_layer(middleware::from_fn_with_state(state, authenticate))
        )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardQuery {
    collection_id: i64,
}
async fn get_card(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<i64>,
    Path(card_id): Path<String>,
    Query(query): Query<CardQuery>,
) -> Result<AppSuccess, AppError> {
    state.store().find_owned_collection(user_id, query.collection_id).await?;
    let view = state.enrichment.card_view(&card_id, query.collection_id).await?;

    Ok(AppSuccess::new(StatusCode::OK, "Card fetched successfully", json!(view)))
}

async fn get_set(
    State(state): State<GlobalState>,
    Path(set_id): Path<String>,
) -> Result<AppSuccess, AppError> {
    let set = state.enrichment.set_info(&set_id).await?;
    Ok(AppSuccess::new(StatusCode::OK, "Set fetched successfully", json!(set)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::memory_state;

    #[tokio::test]
    async fn set_id_with_a_path_is_unprocessable() {
        let (state, _) = memory_state(&[]).await;

        let err = get_set(State(state.clone()), Path("../cards/some-card".to_string())).await.unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);

        let set = get_set(State(state), Path("xln".to_string())).await.unwrap();
        assert_eq!(set.data["id"], "xln");
    }

    #[tokio::test]
    async fn card_for_an_unknown_collection_is_not_found() {
        let (state, _) = memory_state(&[1]).await;

        let err = get_card(
            State(state),
            Extension(1),
            Path("4457ed35-7c10-48c8-9776-456485fdf070".to_string()),
            Query(CardQuery { collection_id: 7 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
