//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::handlers;
use crate::middleware::{request_id_middleware, security_headers_middleware, SecurityHeadersConfig};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use staykaru_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let config = &state.config;
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(config.jwt_secret()));

    let protected = protected_routes().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let body_limit = config.max_request_body_bytes();
    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    tracing::info!(
        body_limit_bytes = body_limit,
        request_timeout_secs = config.request_timeout_secs(),
        "HTTP limits configured"
    );

    let app = public_routes(config.images_url_prefix())
        .merge(protected)
        .with_state(state.clone())
        .merge(RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs(),
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ));

    Ok(app)
}

/// Routes that need no bearer token.
///
/// Stored images are mounted under the same prefix `url` and `thumbnailUrl`
/// are built with. Those URLs are meant to be embedded in listings, so they
/// are served without auth; filenames are unguessable and there is no listing.
fn public_routes(images_url_prefix: &str) -> Router<Arc<AppState>> {
    let images = Router::new().route(
        "/{category}/{filename}",
        get(handlers::image_get::serve_image),
    );

    let router = Router::new().route("/health", get(handlers::health::health_check));
    match images_url_prefix.trim_end_matches('/') {
        "" => router.merge(images),
        prefix => router.nest(prefix, images),
    }
}

/// Upload, retrieval and deletion routes behind bearer auth
fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/upload/accommodation/{id}/images",
            post(handlers::image_upload::upload_accommodation_images),
        )
        .route(
            "/upload/food-provider/{id}/images",
            post(handlers::image_upload::upload_food_provider_images),
        )
        .route(
            "/upload/menu-item/{id}/image",
            post(handlers::image_upload::upload_menu_item_image),
        )
        .route(
            "/upload/image/{upload_type}/{filename}",
            delete(handlers::image_delete::delete_image),
        )
        .route(
            "/upload/images/{upload_type}/{filename}",
            get(handlers::image_get::get_image),
        )
        .route(
            "/upload/images/{upload_type}/{filename}/thumbnail",
            get(handlers::image_get::get_thumbnail),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
