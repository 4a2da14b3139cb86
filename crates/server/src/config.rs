use anyhow::{Context, Result};
use api::auth::{AuthConfig, DEFAULT_TOKEN_TTL_MINUTES};
use tracing::warn;

const DEFAULT_DATABASE_URL: &str = "sqlite://database.sqlite?mode=rwc";
const DEV_SECRET: &str = "dev-secret";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        let jwt_secret = match std::env::var("AUTH_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!("AUTH_SECRET not set; using the development secret");
                DEV_SECRET.into()
            }
        };

        let token_ttl_minutes = match std::env::var("TOKEN_TTL_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("invalid TOKEN_TTL_MINUTES {raw:?}"))?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        );

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl_minutes,
            cors_allowed_origins,
        })
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_minutes: self.token_ttl_minutes,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
