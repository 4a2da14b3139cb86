mod admin;
mod auth;
mod health;
mod owner;
mod ratings;
mod shopper;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Every REST route of the service, without transport layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/admin/summary", get(admin::summary))
        .route("/api/admin/users", get(admin::users))
        .route("/api/admin/stores", get(admin::stores))
        .route("/api/admin/add-store", post(admin::add_store))
        .route("/api/user/stores", get(shopper::stores))
        .route("/api/user/rate", post(shopper::rate))
        .route("/api/store/my-store", get(owner::my_store))
        .route("/api/store/all", get(owner::all_stores))
        .route("/api/ratings/{store_id}", post(ratings::submit))
        .with_state(state)
}
