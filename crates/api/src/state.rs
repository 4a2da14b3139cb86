use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::AuthConfig;

/// Per-request handles injected into every handler through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, auth: AuthConfig) -> Self {
        Self {
            db: Arc::new(db),
            auth: Arc::new(auth),
        }
    }
}
