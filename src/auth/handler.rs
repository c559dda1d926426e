//! HTTP handlers for registration and login
//!
//! Provides 3 REST endpoints:
//! - POST   /api/v1/users      — register
//! - POST   /api/v1/token      — OAuth2 password grant
//! - GET    /api/v1/users/me   — current user

use crate::auth::extract::AuthUser;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::UserStore;
use crate::auth::types::*;
use crate::body::{FormBody, JsonBody};
use crate::error::{Error, Result};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for authentication; embedded in every module state
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserStore>,
    pub tokens: Arc<TokenIssuer>,
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/api/v1/users", post(register))
        .route("/api/v1/users/me", get(current_user))
        .route("/api/v1/token", post(login))
        .with_state(state)
}

/// POST /api/v1/users
async fn register(
    State(state): State<AuthState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    request.validate()?;

    let password = request.password;
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::Internal(format!("Password hashing task failed: {}", e)))??;

    let user = state.users.create(request.username.trim(), &hashed).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/token
async fn login(
    State(state): State<AuthState>,
    FormBody(form): FormBody<LoginForm>,
) -> Result<Json<TokenResponse>> {
    let rejected = || Error::Unauthorized("Incorrect username or password".into());

    let record = state
        .users
        .get_by_username(form.username.trim())
        .await?
        .ok_or_else(rejected)?;

    let password = form.password;
    let hash = record.hashed_password.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal(format!("Password verification task failed: {}", e)))??;
    if !valid {
        tracing::debug!(user_id = record.user.id, "Rejected login");
        return Err(rejected());
    }

    let token = state.tokens.issue(&record.user.username)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// GET /api/v1/users/me
async fn current_user(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
