use axum::{extract::State, http::StatusCode, Json};
use entity::Role;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    auth::{hash_password, issue_token, verify_password, CurrentUser},
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
    users,
};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    address: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let role = Role::parse(&body.role).ok_or_else(|| ApiError::bad_request("Invalid role."))?;
    let username = body.username.trim();
    let email = body.email.trim();
    if username.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request(
            "Username, email and password are required.",
        ));
    }
    let password_hash = hash_password(&body.password)
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("hash error: {err}")))?;
    let user = users::create(
        &state.db,
        users::NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            address: body.address,
        },
    )
    .await?;
    info!(user_id = user.id, role = %role, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully." })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let invalid = || ApiError::unauthenticated("Invalid credentials.");
    let Some(user) = users::find_by_email(&state.db, body.email.trim()).await? else {
        debug!("login for unknown email");
        return Err(invalid());
    };
    if user.role.as_str() != body.role {
        debug!(user_id = user.id, "login with mismatched role");
        return Err(ApiError::forbidden(format!(
            "This account is not registered as {}.",
            body.role
        )));
    }
    if !verify_password(&body.password, &user.password) {
        debug!(user_id = user.id, "login with wrong password");
        return Err(invalid());
    }
    let token = issue_token(user.id, user.role, &state.auth)
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("token error: {err}")))?;
    info!(user_id = user.id, "login succeeded");
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "role": user.role,
        "userId": user.id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default, rename = "newPassword")]
    new_password: Option<String>,
}

pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    let new_password = body
        .new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("New password is required."))?;
    let password_hash = hash_password(&new_password)
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("hash error: {err}")))?;
    users::update_password(&state.db, user.id, password_hash).await?;
    info!(user_id = user.id, "password changed");
    Ok(Json(json!({ "message": "Password updated successfully." })))
}
