//! Authentication HTTP handlers: register, login, current user.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use docuflow_auth::{default_token_ttl, generate_token, hash_token, hash_password, verify_password};
use docuflow_core::{
    CreateUserRequest, SessionRepository, User, UserPublic, UserRepository,
};

use crate::auth::RequireUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response issued at registration and login. The token is opaque;
/// clients attach it as `Authorization: Bearer <access_token>`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserPublic,
}

/// Issue a fresh 24-hour session for `user` and build the token response.
async fn issue_session(state: &AppState, user: User) -> Result<TokenResponse, ApiError> {
    let token = generate_token();
    let expires_at = Utc::now() + default_token_ttl();
    state
        .db
        .sessions
        .create(user.id, &hash_token(&token), expires_at)
        .await?;

    Ok(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: user.into(),
    })
}

/// Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required".to_string()));
    }
    if username.len() > 50 {
        return Err(ApiError::BadRequest(
            "Username must be 50 characters or less".to_string(),
        ));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("A valid email is required".to_string()));
    }

    // Friendly 400s on the common paths; the unique indexes still catch
    // concurrent registrations and map to 409.
    if state.db.users.find_by_email(email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }
    if state.db.users.find_by_username(username).await?.is_some() {
        return Err(ApiError::BadRequest("Username already taken".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .db
        .users
        .insert(CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;

    info!(
        subsystem = "api",
        component = "auth",
        op = "register",
        user_id = %user.id,
        "User registered"
    );

    let token = issue_session(&state, user).await?;
    Ok(Json(token))
}

/// Authenticate with email and password.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .db
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    info!(
        subsystem = "api",
        component = "auth",
        op = "login",
        user_id = %user.id,
        "User logged in"
    );

    let token = issue_session(&state, user).await?;
    Ok(Json(token))
}

/// Return the authenticated user's record.
pub async fn me(auth: RequireUser) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(UserPublic::from(auth.user)))
}

/// Liveness probe, no authentication.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
