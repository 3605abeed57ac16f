//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use docuflow_auth::{hash_token, looks_like_token};
use docuflow_core::{SessionRepository, User};

use crate::error::ApiError;
use crate::AppState;

/// Extractor that requires a valid, unexpired bearer token.
///
/// Usage:
/// ```ignore
/// async fn my_handler(auth: RequireUser) -> Result<..., ApiError> {
///     let user_id = auth.user.id;
///     // ... handler logic
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser {
    pub user: User,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                header.trim_start_matches("Bearer ").trim()
            }
            _ => {
                return Err(ApiError::Unauthorized(
                    "Authentication required".to_string(),
                ))
            }
        };

        // Reject malformed tokens before touching the database.
        if !looks_like_token(token) {
            return Err(ApiError::Unauthorized("Invalid token".to_string()));
        }

        let user = state
            .db
            .sessions
            .find_user_by_token_hash(&hash_token(token))
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(RequireUser { user })
    }
}
