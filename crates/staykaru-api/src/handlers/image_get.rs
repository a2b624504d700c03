use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::content_type_from_extension;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use futures::{stream, StreamExt};
use staykaru_core::{AppError, UploadCategory};
use staykaru_processing::detect_mime_type;
use staykaru_storage::{thumbnail_filename, Storage, StorageError};
use std::sync::Arc;

pub(crate) fn parse_category(upload_type: &str) -> Result<UploadCategory, HttpAppError> {
    upload_type
        .parse::<UploadCategory>()
        .map_err(|e| AppError::BadRequest(e.to_string()).into())
}

/// Stream a stored file back with a sniffed content type.
///
/// The first chunk is inspected for the image signature; the extension is the
/// fallback.
async fn stream_image(
    storage: &dyn Storage,
    filename: &str,
    category: UploadCategory,
    not_found: &str,
) -> Result<Response, HttpAppError> {
    let mut byte_stream = storage
        .read_stream(filename, category)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => HttpAppError(AppError::NotFound(not_found.to_string())),
            other => other.into(),
        })?;

    let first = match byte_stream.next().await {
        Some(chunk) => Some(chunk?),
        None => None,
    };

    let content_type = first
        .as_deref()
        .and_then(detect_mime_type)
        .unwrap_or_else(|| content_type_from_extension(filename));

    let body_stream = stream::iter(first.map(Ok))
        .chain(byte_stream)
        .map(|result| {
            result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
        });

    tracing::debug!(
        filename = %filename,
        category = %category,
        content_type = %content_type,
        "Serving image"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string()).into()
        })
}

#[utoipa::path(
    get,
    path = "/upload/images/{uploadType}/{filename}",
    tag = "uploads",
    params(
        ("uploadType" = String, Path, description = "accommodation, food-provider, menu-item or general"),
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Unknown upload type or invalid filename", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path((upload_type, filename)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    let category = parse_category(&upload_type)?;
    stream_image(state.storage.as_ref(), &filename, category, "Image not found").await
}

#[utoipa::path(
    get,
    path = "/upload/images/{uploadType}/{filename}/thumbnail",
    tag = "uploads",
    params(
        ("uploadType" = String, Path, description = "accommodation, food-provider, menu-item or general"),
        ("filename" = String, Path, description = "Stored filename of the main image")
    ),
    responses(
        (status = 200, description = "Thumbnail bytes", content_type = "image/jpeg"),
        (status = 400, description = "Unknown upload type or invalid filename", body = ErrorResponse),
        (status = 404, description = "Thumbnail not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path((upload_type, filename)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    let category = parse_category(&upload_type)?;
    let thumbnail = thumbnail_filename(&filename);
    stream_image(
        state.storage.as_ref(),
        &thumbnail,
        category,
        "Thumbnail not found",
    )
    .await
}

/// Public delivery of the URLs returned in `url` and `thumbnailUrl`
#[utoipa::path(
    get,
    path = "/images/{category}/{filename}",
    tag = "images",
    params(
        ("category" = String, Path, description = "accommodations, food-providers, menu-items or general"),
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    Path((category, filename)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    let category = parse_category(&category)?;
    stream_image(state.storage.as_ref(), &filename, category, "Image not found").await
}
