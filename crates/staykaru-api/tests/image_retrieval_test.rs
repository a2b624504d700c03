mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{dimensions, form, jpeg_bytes, part};
use helpers::{setup_test_app, setup_test_app_with, TestApp};
use serde_json::Value;

/// Upload one accommodation image and return its stored filename
async fn upload_accommodation_image(app: &TestApp) -> String {
    let response = app
        .client()
        .post("/upload/accommodation/acc-1/images")
        .authorization_bearer(&app.token)
        .multipart(form(
            "images",
            vec![part(jpeg_bytes(1600, 1200), "room.jpg", "image/jpeg")],
        ))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    body["images"][0]["filename"]
        .as_str()
        .expect("filename")
        .to_string()
}

#[tokio::test]
async fn test_served_bytes_match_stored_bytes() {
    let app = setup_test_app().await;
    let filename = upload_accommodation_image(&app).await;

    let response = app
        .client()
        .get(&format!("/upload/images/accommodation/{}", filename))
        .authorization_bearer(&app.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/jpeg");

    let stored = std::fs::read(app.stored_path("accommodations", &filename)).unwrap();
    assert_eq!(response.as_bytes().as_ref(), stored.as_slice());
}

#[tokio::test]
async fn test_public_url_serves_image() {
    let app = setup_test_app().await;
    let filename = upload_accommodation_image(&app).await;

    let response = app
        .client()
        .get(&format!("/images/accommodations/{}", filename))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(dimensions(response.as_bytes()), (1200, 800));
}

#[tokio::test]
async fn test_returned_urls_follow_custom_prefix() {
    let app = setup_test_app_with(|config| {
        config.upload.images_url_prefix = "/static".to_string();
    })
    .await;

    let response = app
        .client()
        .post("/upload/accommodation/acc-1/images")
        .authorization_bearer(&app.token)
        .multipart(form(
            "images",
            vec![part(jpeg_bytes(1600, 1200), "room.jpg", "image/jpeg")],
        ))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    let image = &body["images"][0];
    let filename = image["filename"].as_str().unwrap();
    let url = image["url"].as_str().unwrap();
    assert_eq!(url, format!("/static/accommodations/{}", filename));

    let response = app.client().get(url).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let stored = std::fs::read(app.stored_path("accommodations", filename)).unwrap();
    assert_eq!(response.as_bytes().as_ref(), stored.as_slice());

    let thumbnail = app
        .client()
        .get(image["thumbnailUrl"].as_str().unwrap())
        .await;
    assert_eq!(thumbnail.status_code(), StatusCode::OK);
    assert_eq!(dimensions(thumbnail.as_bytes()), (200, 200));

    let response = app
        .client()
        .get(&format!("/images/accommodations/{}", filename))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_thumbnail_is_served() {
    let app = setup_test_app().await;
    let filename = upload_accommodation_image(&app).await;

    let response = app
        .client()
        .get(&format!("/upload/images/accommodation/{}/thumbnail", filename))
        .authorization_bearer(&app.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(dimensions(response.as_bytes()), (200, 200));
}

#[tokio::test]
async fn test_missing_image_and_thumbnail_are_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/upload/images/accommodation/image-0-000000000.jpg")
        .authorization_bearer(&app.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Image not found");

    let response = app
        .client()
        .get("/upload/images/accommodation/image-0-000000000.jpg/thumbnail")
        .authorization_bearer(&app.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Thumbnail not found");
}

#[tokio::test]
async fn test_image_is_not_visible_in_other_category() {
    let app = setup_test_app().await;
    let filename = upload_accommodation_image(&app).await;

    let response = app
        .client()
        .get(&format!("/upload/images/menu-item/{}", filename))
        .authorization_bearer(&app.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_upload_type_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/upload/images/villas/image-1-2.jpg")
        .authorization_bearer(&app.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_retrieval_requires_bearer_token() {
    let app = setup_test_app().await;
    let filename = upload_accommodation_image(&app).await;

    let response = app
        .client()
        .get(&format!("/upload/images/accommodation/{}", filename))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_removes_image_and_thumbnail() {
    let app = setup_test_app().await;
    let filename = upload_accommodation_image(&app).await;
    assert_eq!(app.file_count("accommodations"), 2);

    let response = app
        .client()
        .delete(&format!("/upload/image/accommodation/{}", filename))
        .authorization_bearer(&app.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Image deleted successfully");
    assert_eq!(body["filename"], filename.as_str());
    assert_eq!(app.file_count("accommodations"), 0);

    let response = app
        .client()
        .delete(&format!("/upload/image/accommodation/{}", filename))
        .authorization_bearer(&app.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .client()
        .get(&format!("/images/accommodations/{}", filename))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_succeeds_when_thumbnail_already_gone() {
    let app = setup_test_app().await;
    let filename = upload_accommodation_image(&app).await;

    let thumbnail = staykaru_storage::thumbnail_filename(&filename);
    std::fs::remove_file(app.stored_path("accommodations", &thumbnail)).unwrap();

    let response = app
        .client()
        .delete(&format!("/upload/image/accommodation/{}", filename))
        .authorization_bearer(&app.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_path_traversal_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .delete("/upload/image/accommodation/..%2F..%2Fsecret.jpg")
        .authorization_bearer(&app.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_response_headers() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"]["/upload/menu-item/{id}/image"].is_object());
}
