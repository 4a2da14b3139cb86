use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    ratings,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RatingBody {
    rating: i32,
}

/// Open to every role, unlike `/api/user/rate`.
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(store_id): ApiPath<i32>,
    ApiJson(body): ApiJson<RatingBody>,
) -> ApiResult<Json<Value>> {
    ratings::submit(&state.db, user.id, store_id, body.rating).await?;
    Ok(Json(json!({ "message": "Rating submitted successfully." })))
}
