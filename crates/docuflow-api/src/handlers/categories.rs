//! Category HTTP handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docuflow_core::CategoryRepository;

use crate::auth::RequireUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// List the user's categories, ordered by name.
pub async fn list_categories(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.db.categories.list(auth.user.id).await?;
    Ok(Json(categories))
}

/// Create a category.
pub async fn create_category(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.db.categories.insert(auth.user.id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a category. Documents referencing it become uncategorized.
pub async fn delete_category(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.categories.delete(auth.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
