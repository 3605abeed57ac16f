//! API error mapping.
//!
//! Every failure becomes a JSON body with a `detail` message field — the
//! convention the frontend extracts for its notifications.

use axum::{http::StatusCode, response::IntoResponse, Json};

#[derive(Debug)]
pub enum ApiError {
    Database(docuflow_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<docuflow_core::Error> for ApiError {
    fn from(err: docuflow_core::Error) -> Self {
        use docuflow_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::DocumentNotFound(_) => ApiError::NotFound("Document not found".to_string()),
            Error::CategoryNotFound(_) => ApiError::NotFound("Category not found".to_string()),
            // Blob lookup failures surface as the original backend's
            // "File not found" so the UI message stays stable.
            Error::Storage(_) => ApiError::NotFound("File not found".to_string()),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    // Constraint and index names stay server-side; the
                    // repositories map the known cases to friendly text.
                    return ApiError::Conflict("Resource already exists".to_string());
                }
                ApiError::Database(Error::Database(sqlx_err))
            }
            other => ApiError::Database(other),
        }
    }
}

impl From<docuflow_auth::AuthError> for ApiError {
    fn from(err: docuflow_auth::AuthError) -> Self {
        use docuflow_auth::AuthError;
        match err {
            AuthError::PasswordTooShort(min) => ApiError::BadRequest(format!(
                "Password must be at least {} characters",
                min
            )),
            // Hashing failures and corrupt stored hashes are server-side
            // problems; never leak detail to the client.
            other => {
                tracing::error!(error = %other, "credential operation failed");
                ApiError::Database(docuflow_core::Error::Internal(
                    "Internal server error".to_string(),
                ))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "detail": message,
        }));

        (status, body).into_response()
    }
}
