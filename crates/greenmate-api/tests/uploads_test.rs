//! Upload API integration tests.
//!
//! Run with: `cargo test -p greenmate-api --test uploads_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, fixtures, setup_test_app, setup_test_app_with, StubWeather};
use serde_json::Value;

fn file_form(data: Vec<u8>, filename: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type(mime),
    )
}

#[tokio::test]
async fn test_upload_image_with_thumbnail() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/uploads"))
        .add_query_param("folder", "plants")
        .multipart(file_form(fixtures::png(2000, 500), "monstera.png", "image/png"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let metadata = &body["metadata"];
    assert_eq!(metadata["width"], 1200);
    assert_eq!(metadata["height"], 300);
    assert_eq!(metadata["format"], "jpeg");
    assert_eq!(metadata["content_type"], "image/jpeg");
    assert_eq!(metadata["original_filename"], "monstera.png");
    assert!(body["original_url"]
        .as_str()
        .unwrap()
        .starts_with("http://localhost:4000/uploads/plants/"));
    assert!(body["thumbnail_url"].as_str().unwrap().contains("/plants/thumb-"));

    // The stored thumbnail is served back through the local file route.
    let thumb_key = metadata["thumbnail_key"].as_str().unwrap();
    let file = client.get(&format!("/uploads/{}", thumb_key)).await;
    file.assert_status_ok();
    assert_eq!(file.header("content-type"), "image/jpeg");
    let thumb = image::load_from_memory(file.as_bytes()).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (300, 300));
}

#[tokio::test]
async fn test_upload_query_overrides() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .add_query_param("format", "webp")
        .add_query_param("thumbnail", "false")
        .add_query_param("max_width", "100")
        .multipart(file_form(fixtures::jpeg(400, 300), "leaf.jpg", "image/jpeg"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["metadata"]["format"], "webp");
    assert_eq!(body["metadata"]["width"], 100);
    assert_eq!(body["metadata"]["height"], 75);
    assert!(body.get("thumbnail_url").is_none());
}

#[tokio::test]
async fn test_upload_rejects_type_mismatch() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form(fixtures::png(64, 64), "leaf.jpg", "image/jpeg"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "TYPE_MISMATCH");
    assert_eq!(body["recoverable"], false);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form(b"GIF89a....".to_vec(), "anim.gif", "image/gif"))
        .await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_TYPE");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "NO_FILE_PROVIDED");
}

#[tokio::test]
async fn test_upload_too_small_dimensions() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form(fixtures::png(5, 50), "tiny.png", "image/png"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "DIMENSION_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_upload_file_too_large() {
    let app = setup_test_app_with(
        |config| config.max_file_size_bytes = 512,
        StubWeather::returning(fixtures::hot_clear_day()),
    )
    .await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form(fixtures::jpeg(400, 400), "big.jpg", "image/jpeg"))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "FILE_TOO_LARGE");
}

/// PNG signature followed by filler, far beyond the configured limit and the
/// multipart headroom.
fn oversized_png(len: usize) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.resize(len, 0xAB);
    data
}

#[tokio::test]
async fn test_upload_far_over_limit_is_file_too_large() {
    let app = setup_test_app_with(
        |config| config.max_file_size_bytes = 512,
        StubWeather::returning(fixtures::hot_clear_day()),
    )
    .await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form(oversized_png(300 * 1024), "huge.png", "image/png"))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "FILE_TOO_LARGE");

    let response = app
        .client()
        .post(&api_path("/uploads/validate"))
        .multipart(file_form(oversized_png(300 * 1024), "huge.png", "image/png"))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "FILE_TOO_LARGE");
}

#[tokio::test]
async fn test_upload_rejects_unsupported_output_format() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .add_query_param("format", "avif")
        .multipart(file_form(fixtures::png(64, 64), "leaf.png", "image/png"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn test_validate_endpoint_reports_detected_type() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads/validate"))
        .multipart(file_form(
            fixtures::png(640, 480),
            "../../etc/passwd",
            "image/png",
        ))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["valid"], true);
    assert_eq!(body["detected_type"], "image/png");
    assert_eq!(body["width"], 640);
    assert_eq!(body["height"], 480);
    assert_eq!(body["sanitized_filename"], "passwd");
}

#[tokio::test]
async fn test_validate_endpoint_rejects_unusable_filename() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads/validate"))
        .multipart(file_form(fixtures::png(64, 64), "!!!", "image/png"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_FILENAME");
}

#[tokio::test]
async fn test_missing_local_file_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/uploads/uploads/missing.jpg").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
