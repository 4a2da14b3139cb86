#![allow(dead_code)]

use api::{auth::AuthConfig, router, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

pub struct Account {
    pub id: i64,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        let state = AppState::new(conn, AuthConfig::new(TEST_SECRET));
        let router = router(state.clone());
        Self { state, router }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.state.db.as_ref()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn signup(&self, username: &str, email: &str, role: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/signup",
            None,
            json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
                "role": role,
                "address": format!("{username} Street 1"),
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str, role: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password, "role": role }),
        )
        .await
    }

    /// Signs up and logs in, panicking if either step fails.
    pub async fn account(&self, username: &str, email: &str, role: &str) -> Account {
        let (status, body) = self.signup(username, email, role).await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        let (status, body) = self.login(email, PASSWORD, role).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        Account {
            id: body["userId"].as_i64().unwrap(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn add_store(&self, admin: &Account, name: &str, owner_id: Option<i64>) -> i64 {
        let (status, body) = self
            .post(
                "/api/admin/add-store",
                Some(&admin.token),
                json!({
                    "name": name,
                    "email": format!("{}@stores.test", name.to_lowercase().replace(' ', "-")),
                    "address": "1 High Street",
                    "owner_id": owner_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "add-store failed: {body}");
        body["id"].as_i64().unwrap()
    }
}
