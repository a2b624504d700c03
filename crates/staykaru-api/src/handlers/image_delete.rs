use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::image_get::parse_category;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use staykaru_core::AppError;
use staykaru_storage::StorageError;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteImageResponse {
    pub message: String,
    pub filename: String,
}

/// Delete a stored image and, when present, its thumbnail
#[utoipa::path(
    delete,
    path = "/upload/image/{uploadType}/{filename}",
    tag = "uploads",
    params(
        ("uploadType" = String, Path, description = "accommodation, food-provider, menu-item or general"),
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "Image deleted", body = DeleteImageResponse),
        (status = 400, description = "Unknown upload type or invalid filename", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path((upload_type, filename)): Path<(String, String)>,
) -> Result<Json<DeleteImageResponse>, HttpAppError> {
    let category = parse_category(&upload_type)?;

    state
        .storage
        .delete(&filename, category)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => {
                HttpAppError(AppError::NotFound("Image not found".to_string()))
            }
            other => other.into(),
        })?;

    tracing::info!(filename = %filename, category = %category, "Image deleted");

    Ok(Json(DeleteImageResponse {
        message: "Image deleted successfully".to_string(),
        filename,
    }))
}
