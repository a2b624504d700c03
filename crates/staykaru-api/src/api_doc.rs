//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use staykaru_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StayKaru Image Upload API",
        version = "0.1.0",
        description = "Image upload, resizing, thumbnail generation and delivery for accommodations, food providers and menu items."
    ),
    paths(
        handlers::image_upload::upload_accommodation_images,
        handlers::image_upload::upload_food_provider_images,
        handlers::image_upload::upload_menu_item_image,
        handlers::image_get::get_image,
        handlers::image_get::get_thumbnail,
        handlers::image_get::serve_image,
        handlers::image_delete::delete_image,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadedImage,
            models::ImageDimensions,
            models::UploadCategory,
            handlers::image_upload::AccommodationImagesResponse,
            handlers::image_upload::FoodProviderImagesResponse,
            handlers::image_upload::MenuItemImageResponse,
            handlers::image_delete::DeleteImageResponse,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "uploads", description = "Authenticated upload, retrieval and deletion of category images"),
        (name = "images", description = "Public delivery of stored images"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
