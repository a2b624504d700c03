use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use staykaru_core::{UploadCategory, UploadedImage};
use staykaru_processing::BatchUploadResult;
use utoipa::ToSchema;

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_image_files, BATCH_FIELDS, SINGLE_FIELD};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationImagesResponse {
    pub message: String,
    pub accommodation_id: String,
    pub images: Vec<UploadedImage>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodProviderImagesResponse {
    pub message: String,
    pub food_provider_id: String,
    pub images: Vec<UploadedImage>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemImageResponse {
    pub message: String,
    pub menu_item_id: String,
    pub image: UploadedImage,
}

fn batch_message(result: &BatchUploadResult) -> String {
    if result.success {
        "Images uploaded successfully".to_string()
    } else {
        "Images uploaded with errors".to_string()
    }
}

/// Read the batch out of the form and run it through the category preset.
///
/// Per-file failures end up in `errors`; only an empty or oversized form, or a
/// category directory that cannot be created, fail the request.
async fn upload_batch(
    state: &AppState,
    category: UploadCategory,
    multipart: Multipart,
) -> Result<BatchUploadResult, HttpAppError> {
    let files =
        extract_image_files(multipart, BATCH_FIELDS, state.config.max_files_per_upload()).await?;
    let options = state.presets.options_for(category);

    let result = state
        .upload_service
        .upload_many(files, category, &options)
        .await?;

    Ok(result)
}

/// Upload up to ten images for an accommodation
#[utoipa::path(
    post,
    path = "/upload/accommodation/{id}/images",
    tag = "uploads",
    params(
        ("id" = String, Path, description = "Accommodation ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Field `images`, up to 10 files"),
    responses(
        (status = 201, description = "Batch processed; failed files are listed in `errors`", body = AccommodationImagesResponse),
        (status = 400, description = "No files or too many files", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, accommodation_id = %id, operation = "upload_accommodation_images")
)]
pub async fn upload_accommodation_images(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AccommodationImagesResponse>), HttpAppError> {
    let result = upload_batch(&state, UploadCategory::Accommodations, multipart).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccommodationImagesResponse {
            message: batch_message(&result),
            accommodation_id: id,
            images: result.images,
            errors: result.errors,
        }),
    ))
}

/// Upload up to ten images for a food provider
#[utoipa::path(
    post,
    path = "/upload/food-provider/{id}/images",
    tag = "uploads",
    params(
        ("id" = String, Path, description = "Food provider ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Field `images`, up to 10 files"),
    responses(
        (status = 201, description = "Batch processed; failed files are listed in `errors`", body = FoodProviderImagesResponse),
        (status = 400, description = "No files or too many files", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, food_provider_id = %id, operation = "upload_food_provider_images")
)]
pub async fn upload_food_provider_images(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FoodProviderImagesResponse>), HttpAppError> {
    let result = upload_batch(&state, UploadCategory::FoodProviders, multipart).await?;

    Ok((
        StatusCode::CREATED,
        Json(FoodProviderImagesResponse {
            message: batch_message(&result),
            food_provider_id: id,
            images: result.images,
            errors: result.errors,
        }),
    ))
}

/// Upload the image of a menu item
///
/// Unlike the batch routes, a rejected file fails the request with its own
/// status code.
#[utoipa::path(
    post,
    path = "/upload/menu-item/{id}/image",
    tag = "uploads",
    params(
        ("id" = String, Path, description = "Menu item ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Field `image`, one file"),
    responses(
        (status = 201, description = "Image uploaded", body = MenuItemImageResponse),
        (status = 400, description = "Invalid, unsupported or oversized image", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, menu_item_id = %id, operation = "upload_menu_item_image")
)]
pub async fn upload_menu_item_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MenuItemImageResponse>), HttpAppError> {
    let mut files = extract_image_files(multipart, SINGLE_FIELD, 1).await?;
    let Some(file) = files.pop() else {
        return Err(staykaru_core::AppError::BadRequest("No files uploaded".to_string()).into());
    };

    let category = UploadCategory::MenuItems;
    let options = state.presets.options_for(category);
    let image = state
        .upload_service
        .upload_one(file, category, &options)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MenuItemImageResponse {
            message: "Image uploaded successfully".to_string(),
            menu_item_id: id,
            image,
        }),
    ))
}
