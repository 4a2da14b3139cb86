//! Demo fixtures for local development. Safe to run repeatedly.

use anyhow::{anyhow, Context, Result};
use entity::{store, user, Role};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{auth::hash_password, error::ApiError, stores, users};

pub const SEED_ADMIN_EMAIL: &str = "admin@stores.test";
pub const SEED_OWNER_EMAIL: &str = "owner@stores.test";
pub const SEED_USER_EMAIL: &str = "user@stores.test";

const SEED_USERS: [(&str, &str, Role, &str); 3] = [
    ("Ada Admin", SEED_ADMIN_EMAIL, Role::SystemAdmin, "1 Admin Way"),
    ("Olive Owner", SEED_OWNER_EMAIL, Role::StoreOwner, "22 Market Street"),
    ("Nora Normal", SEED_USER_EMAIL, Role::NormalUser, "333 Elm Road"),
];

#[derive(Debug, Clone)]
pub struct SeededRecords {
    pub users: Vec<user::Model>,
    pub store: store::Model,
}

impl SeededRecords {
    pub fn user_email(&self, email: &str) -> Option<&user::Model> {
        self.users.iter().find(|u| u.email == email)
    }
}

pub async fn seed_demo(db: &DatabaseConnection, password: &str) -> Result<SeededRecords> {
    let mut seeded = Vec::with_capacity(SEED_USERS.len());
    for (username, email, role, address) in SEED_USERS {
        let existing = users::find_by_email(db, email)
            .await
            .map_err(ApiError::into_anyhow)
            .with_context(|| format!("lookup of {email} failed"))?;
        let model = match existing {
            Some(model) => model,
            None => {
                let password_hash =
                    hash_password(password).map_err(|err| anyhow!("hash error: {err}"))?;
                let created = users::create(
                    db,
                    users::NewUser {
                        username: username.to_string(),
                        email: email.to_string(),
                        password_hash,
                        role,
                        address: Some(address.to_string()),
                    },
                )
                .await
                .map_err(ApiError::into_anyhow)
                .with_context(|| format!("insert of {email} failed"))?;
                info!(email, role = %role, "seeded user");
                created
            }
        };
        seeded.push(model);
    }

    let owner_id = seeded
        .iter()
        .find(|u| u.role == Role::StoreOwner)
        .map(|u| u.id)
        .context("seed owner missing")?;
    let store = match stores::find_owned_by(db, owner_id)
        .await
        .map_err(ApiError::into_anyhow)
        .context("store lookup failed")?
    {
        Some(store) => store,
        None => {
            let created = stores::create(
                db,
                stores::NewStore {
                    name: "Corner Market".into(),
                    email: Some("hello@cornermarket.test".into()),
                    address: Some("22 Market Street".into()),
                    image: None,
                    owner_id: Some(owner_id),
                },
            )
            .await
            .map_err(ApiError::into_anyhow)
            .context("store insert failed")?;
            info!(store_id = created.id, "seeded store");
            created
        }
    };

    Ok(SeededRecords {
        users: seeded,
        store,
    })
}
