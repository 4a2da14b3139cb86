use entity::{rating, store, user, Role};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Statement,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// A store row plus the mean of its ratings (`None` when unrated).
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct StoreWithAverage {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
    pub owner_id: Option<i32>,
    pub average_rating: Option<f64>,
}

/// [`StoreWithAverage`] plus the viewer's own rating.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct StoreForViewer {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
    pub owner_id: Option<i32>,
    pub average_rating: Option<f64>,
    pub user_rating: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct OwnerRating {
    pub username: String,
    pub rating: i32,
}

pub async fn list_with_average(db: &DatabaseConnection) -> ApiResult<Vec<StoreWithAverage>> {
    let average = SimpleExpr::from(Func::avg(Expr::col((rating::Entity, rating::Column::Rating))));
    Ok(store::Entity::find()
        .column_as(average, "average_rating")
        .join(JoinType::LeftJoin, store::Relation::Rating.def())
        .group_by(store::Column::Id)
        .order_by_asc(store::Column::Id)
        .into_model::<StoreWithAverage>()
        .all(db)
        .await?)
}

const VIEWER_STORES_SQL: &str = r#"
SELECT s.id, s.name, s.email, s.address, s.image, s.owner_id,
       AVG(r.rating) AS average_rating,
       (SELECT mine.rating FROM ratings mine
         WHERE mine.user_id = ? AND mine.store_id = s.id) AS user_rating
FROM stores s
LEFT JOIN ratings r ON r.store_id = s.id
GROUP BY s.id
ORDER BY s.id
"#;

pub async fn list_for_viewer(
    db: &DatabaseConnection,
    viewer_id: i32,
) -> ApiResult<Vec<StoreForViewer>> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        VIEWER_STORES_SQL,
        [viewer_id.into()],
    );
    Ok(StoreForViewer::find_by_statement(stmt).all(db).await?)
}

pub async fn list_all(db: &DatabaseConnection) -> ApiResult<Vec<store::Model>> {
    Ok(store::Entity::find()
        .order_by_asc(store::Column::Id)
        .all(db)
        .await?)
}

pub async fn find(db: &DatabaseConnection, store_id: i32) -> ApiResult<Option<store::Model>> {
    Ok(store::Entity::find_by_id(store_id).one(db).await?)
}

pub async fn find_owned_by(
    db: &DatabaseConnection,
    owner_id: i32,
) -> ApiResult<Option<store::Model>> {
    Ok(store::Entity::find()
        .filter(store::Column::OwnerId.eq(owner_id))
        .order_by_asc(store::Column::Id)
        .one(db)
        .await?)
}

pub async fn ratings_for(db: &DatabaseConnection, store_id: i32) -> ApiResult<Vec<OwnerRating>> {
    Ok(rating::Entity::find()
        .select_only()
        .column(user::Column::Username)
        .column(rating::Column::Rating)
        .join(JoinType::InnerJoin, rating::Relation::User.def())
        .filter(rating::Column::StoreId.eq(store_id))
        .order_by_asc(rating::Column::Id)
        .into_model::<OwnerRating>()
        .all(db)
        .await?)
}

/// Mean of `ratings` with one decimal, ties rounded up, `"0.0"` when empty.
pub fn format_average(ratings: &[OwnerRating]) -> String {
    if ratings.is_empty() {
        return "0.0".to_string();
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(r.rating)).sum();
    let count = ratings.len() as i64;
    // Integer tenths avoid the ties-to-even rounding of `{:.1}`.
    let tenths = (sum * 20 + count) / (2 * count);
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[derive(Debug, Clone, Default)]
pub struct NewStore {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
    pub owner_id: Option<i32>,
}

pub async fn create(db: &DatabaseConnection, input: NewStore) -> ApiResult<store::Model> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Store name is required."));
    }
    if let Some(owner_id) = input.owner_id {
        ensure_assignable_owner(db, owner_id).await?;
    }
    let model = store::ActiveModel {
        name: Set(name.to_string()),
        email: Set(non_blank(input.email)),
        address: Set(non_blank(input.address)),
        image: Set(non_blank(input.image)),
        owner_id: Set(input.owner_id),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

async fn ensure_assignable_owner(db: &DatabaseConnection, owner_id: i32) -> ApiResult<()> {
    let owner = user::Entity::find_by_id(owner_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::bad_request("Owner not found."))?;
    if owner.role != Role::StoreOwner {
        return Err(ApiError::bad_request(
            "Owner must be registered as storeowner.",
        ));
    }
    if find_owned_by(db, owner_id).await?.is_some() {
        return Err(ApiError::bad_request("Owner already has a store."));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
