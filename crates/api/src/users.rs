use entity::{rating, store, user, Role};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub address: Option<String>,
}

/// Inserts a user. A duplicate email surfaces as the generic signup conflict.
pub async fn create(db: &DatabaseConnection, input: NewUser) -> ApiResult<user::Model> {
    let model = user::ActiveModel {
        username: Set(input.username),
        email: Set(input.email),
        password: Set(input.password_hash),
        role: Set(input.role),
        address: Set(input.address),
        ..Default::default()
    };
    model.insert(db).await.map_err(|err| {
        if is_unique_violation(&err) {
            ApiError::bad_request("User already exists or invalid data.")
        } else {
            err.into()
        }
    })
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> ApiResult<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn update_password(
    db: &DatabaseConnection,
    user_id: i32,
    password_hash: String,
) -> ApiResult<()> {
    let result = user::Entity::update_many()
        .col_expr(user::Column::Password, Expr::value(password_hash))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("User not found."));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}

pub async fn summary(db: &DatabaseConnection) -> ApiResult<Summary> {
    Ok(Summary {
        total_users: user::Entity::find().count(db).await?,
        total_stores: store::Entity::find().count(db).await?,
        total_ratings: rating::Entity::find().count(db).await?,
    })
}

/// Admin user search. Every non-empty field must occur verbatim
/// (case-sensitive) in the matching column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: String,
}

impl UserFilter {
    fn terms(&self) -> [(user::Column, &str); 4] {
        [
            (user::Column::Username, self.name.as_str()),
            (user::Column::Email, self.email.as_str()),
            (user::Column::Address, self.address.as_str()),
            (user::Column::Role, self.role.as_str()),
        ]
    }

    pub fn matches(&self, model: &user::Model) -> bool {
        self.terms().iter().all(|(column, term)| {
            if term.is_empty() {
                return true;
            }
            let value = match column {
                user::Column::Username => Some(model.username.as_str()),
                user::Column::Email => Some(model.email.as_str()),
                user::Column::Address => model.address.as_deref(),
                user::Column::Role => Some(model.role.as_str()),
                _ => None,
            };
            value.is_some_and(|value| value.contains(term))
        })
    }
}

fn like_pattern(term: &str) -> LikeExpr {
    let escaped = term
        .replace('!', "!!")
        .replace('%', "!%")
        .replace('_', "!_");
    LikeExpr::new(format!("%{escaped}%")).escape('!')
}

pub async fn filter(db: &DatabaseConnection, filter: &UserFilter) -> ApiResult<Vec<user::Model>> {
    let mut query = user::Entity::find();
    for (column, term) in filter.terms() {
        if !term.is_empty() {
            query = query.filter(Expr::col((user::Entity, column)).like(like_pattern(term)));
        }
    }
    let mut records = query.order_by_asc(user::Column::Id).all(db).await?;
    // SQLite's LIKE folds ASCII case; narrow to exact-case matches here.
    records.retain(|model| filter.matches(model));
    Ok(records)
}
