mod common;

use api::seed::{seed_demo, SEED_OWNER_EMAIL};
use axum::http::StatusCode;
use common::TestApp;
use entity::user;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

fn emails(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn summary_counts_every_table() {
    let app = TestApp::new().await;
    let admin = app.account("ada", "ada@x.test", "systemadmin").await;
    let nora = app.account("nora", "nora@x.test", "normaluser").await;
    let store_id = app.add_store(&admin, "Corner Market", None).await;
    app.add_store(&admin, "Quiet Shop", None).await;
    app.post(
        "/api/user/rate",
        Some(&nora.token),
        json!({ "store_id": store_id, "rating": 4 }),
    )
    .await;

    let (status, body) = app.get("/api/admin/summary", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "total_users": 2, "total_stores": 2, "total_ratings": 1 })
    );
}

#[tokio::test]
async fn user_filter_by_role_returns_only_that_role() {
    let app = TestApp::new().await;
    let admin = app.account("ada", "ada@x.test", "systemadmin").await;
    app.signup("olive", "olive@x.test", "storeowner").await;
    app.signup("oscar", "oscar@x.test", "storeowner").await;
    app.signup("nora", "nora@x.test", "normaluser").await;

    let (status, body) = app
        .get("/api/admin/users?role=storeowner", Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(emails(&body), ["olive@x.test", "oscar@x.test"]);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .all(|u| u["role"] == "storeowner"));
}

#[tokio::test]
async fn user_filters_are_anded_and_case_sensitive() {
    let app = TestApp::new().await;
    let admin = app.account("ada", "ada@x.test", "systemadmin").await;
    app.signup("Olive", "olive@x.test", "storeowner").await;
    app.signup("olivia", "olivia@x.test", "normaluser").await;

    let (_, body) = app
        .get("/api/admin/users?name=Oliv", Some(&admin.token))
        .await;
    assert_eq!(emails(&body), ["olive@x.test"]);

    let (_, body) = app
        .get("/api/admin/users?name=oliv&role=normal", Some(&admin.token))
        .await;
    assert_eq!(emails(&body), ["olivia@x.test"]);

    let (_, body) = app
        .get("/api/admin/users?email=x.test&address=Street", Some(&admin.token))
        .await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn empty_filter_lists_everyone_without_password_hashes() {
    let app = TestApp::new().await;
    let admin = app.account("ada", "ada@x.test", "systemadmin").await;
    app.post(
        "/api/auth/signup",
        None,
        json!({ "username": "nomad", "email": "nomad@x.test", "password": "pw", "role": "normaluser" }),
    )
    .await;

    let (status, body) = app
        .get("/api/admin/users?name=&email=", Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(emails(&body), ["ada@x.test", "nomad@x.test"]);
    for row in body.as_array().unwrap() {
        assert!(row.get("password").is_none());
    }
}

#[tokio::test]
async fn like_wildcards_in_filters_are_literal() {
    let app = TestApp::new().await;
    let admin = app.account("ada", "ada@x.test", "systemadmin").await;
    app.signup("under_score", "u@x.test", "normaluser").await;
    app.signup("underXscore", "v@x.test", "normaluser").await;

    let (_, body) = app
        .get("/api/admin/users?name=r_s", Some(&admin.token))
        .await;
    assert_eq!(emails(&body), ["u@x.test"]);

    let (_, body) = app.get("/api/admin/users?name=%25", Some(&admin.token)).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn add_store_validates_owner() {
    let app = TestApp::new().await;
    let admin = app.account("ada", "ada@x.test", "systemadmin").await;
    let owner = app.account("olive", "olive@x.test", "storeowner").await;
    let shopper = app.account("nora", "nora@x.test", "normaluser").await;

    let attempts = [
        (json!({ "name": "  " }), "Store name is required."),
        (json!({ "name": "Ghost", "owner_id": 999 }), "Owner not found."),
        (
            json!({ "name": "Wrong", "owner_id": shopper.id }),
            "Owner must be registered as storeowner.",
        ),
    ];
    for (body, message) in attempts {
        let (status, resp) = app
            .post("/api/admin/add-store", Some(&admin.token), body)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["message"], message);
    }

    app.add_store(&admin, "Corner Market", Some(owner.id)).await;
    let (status, resp) = app
        .post(
            "/api/admin/add-store",
            Some(&admin.token),
            json!({ "name": "Second", "owner_id": owner.id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Owner already has a store.");
}

#[tokio::test]
async fn add_store_without_owner_succeeds() {
    let app = TestApp::new().await;
    let admin = app.account("ada", "ada@x.test", "systemadmin").await;
    let (status, body) = app
        .post(
            "/api/admin/add-store",
            Some(&admin.token),
            json!({ "name": "Orphan Outlet", "email": "", "image": "https://img.test/o.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = app.get("/api/store/all", None).await;
    let store = &body["stores"][0];
    assert_eq!(store["name"], "Orphan Outlet");
    assert!(store["owner_id"].is_null());
    assert!(store["email"].is_null());
    assert_eq!(store["image"], "https://img.test/o.png");
}

#[tokio::test]
async fn seed_is_idempotent_and_loginable() {
    let app = TestApp::new().await;
    let first = seed_demo(app.db(), "seed-pass").await.unwrap();
    let second = seed_demo(app.db(), "seed-pass").await.unwrap();
    assert_eq!(first.store.id, second.store.id);
    assert_eq!(user::Entity::find().count(app.db()).await.unwrap(), 3);

    let owner = first.user_email(SEED_OWNER_EMAIL).unwrap();
    assert_eq!(first.store.owner_id, Some(owner.id));
    let (status, _) = app.login(SEED_OWNER_EMAIL, "seed-pass", "storeowner").await;
    assert_eq!(status, StatusCode::OK);
}
