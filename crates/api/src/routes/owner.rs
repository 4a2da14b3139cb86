use axum::{extract::State, Json};
use entity::store;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    auth::RequireStoreOwner,
    error::{ApiError, ApiResult},
    state::AppState,
    stores::{self, OwnerRating},
};

#[derive(Debug, Serialize)]
pub struct MyStoreResponse {
    store: store::Model,
    ratings: Vec<OwnerRating>,
    average: String,
}

pub async fn my_store(
    State(state): State<AppState>,
    RequireStoreOwner(owner): RequireStoreOwner,
) -> ApiResult<Json<MyStoreResponse>> {
    let store = stores::find_owned_by(&state.db, owner.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store not found."))?;
    let ratings = stores::ratings_for(&state.db, store.id).await?;
    let average = stores::format_average(&ratings);
    Ok(Json(MyStoreResponse {
        store,
        ratings,
        average,
    }))
}

pub async fn all_stores(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let all = stores::list_all(&state.db).await?;
    Ok(Json(json!({ "stores": all })))
}
