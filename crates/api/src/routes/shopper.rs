use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    auth::RequireNormalUser,
    error::ApiResult,
    extract::ApiJson,
    ratings,
    state::AppState,
    stores::{self, StoreForViewer},
};

pub async fn stores(
    State(state): State<AppState>,
    RequireNormalUser(user): RequireNormalUser,
) -> ApiResult<Json<Vec<StoreForViewer>>> {
    Ok(Json(stores::list_for_viewer(&state.db, user.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    store_id: i32,
    rating: i32,
}

pub async fn rate(
    State(state): State<AppState>,
    RequireNormalUser(user): RequireNormalUser,
    ApiJson(body): ApiJson<RateRequest>,
) -> ApiResult<Json<Value>> {
    ratings::submit(&state.db, user.id, body.store_id, body.rating).await?;
    Ok(Json(json!({ "success": true })))
}
