use axum::{extract::State, Json};
use entity::user;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    auth::RequireAdmin,
    error::ApiResult,
    extract::{ApiJson, ApiQuery},
    state::AppState,
    stores::{self, StoreWithAverage},
    users::{self, Summary, UserFilter},
};

pub async fn summary(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> ApiResult<Json<Summary>> {
    Ok(Json(users::summary(&state.db).await?))
}

pub async fn users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> ApiResult<Json<Vec<user::Model>>> {
    Ok(Json(users::filter(&state.db, &filter).await?))
}

pub async fn stores(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> ApiResult<Json<Vec<StoreWithAverage>>> {
    Ok(Json(stores::list_with_average(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddStoreRequest {
    #[serde(default)]
    name: String,
    email: Option<String>,
    address: Option<String>,
    image: Option<String>,
    owner_id: Option<i32>,
}

pub async fn add_store(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(body): ApiJson<AddStoreRequest>,
) -> ApiResult<Json<Value>> {
    let store = stores::create(
        &state.db,
        stores::NewStore {
            name: body.name,
            email: body.email,
            address: body.address,
            image: body.image,
            owner_id: body.owner_id,
        },
    )
    .await?;
    info!(store_id = store.id, admin_id = admin.id, owner_id = ?store.owner_id, "store created");
    Ok(Json(json!({ "success": true, "id": store.id })))
}
