use entity::rating::{self, MAX_RATING, MIN_RATING};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::stores;

pub fn validate(value: i32) -> ApiResult<i32> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::bad_request("Rating must be between 1 and 5."))
    }
}

/// Records `value` as `user_id`'s rating for `store_id`, replacing any
/// earlier rating from the same user in the same statement.
pub async fn submit(
    db: &DatabaseConnection,
    user_id: i32,
    store_id: i32,
    value: i32,
) -> ApiResult<()> {
    let value = validate(value)?;
    if stores::find(db, store_id).await?.is_none() {
        return Err(ApiError::not_found("Store not found."));
    }
    let model = rating::ActiveModel {
        user_id: Set(user_id),
        store_id: Set(store_id),
        rating: Set(value),
        ..Default::default()
    };
    rating::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([rating::Column::UserId, rating::Column::StoreId])
                .update_column(rating::Column::Rating)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    info!(user_id, store_id, rating = value, "rating recorded");
    Ok(())
}
