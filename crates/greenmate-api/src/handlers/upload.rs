use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use greenmate_core::models::{UploadResponse, ValidationReport};
use greenmate_core::AppError;
use greenmate_processing::{process_file_upload, require_filename, validate_uploaded_file};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{apply_upload_query, extract_upload_candidate, UploadQuery};

/// Upload an image
///
/// Validates the `file` form field, normalizes it to the requested format and
/// size, stores it together with an optional square thumbnail and returns
/// both URLs.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    tag = "uploads",
    params(UploadQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded successfully", body = UploadResponse),
        (status = 400, description = "Invalid file or parameters", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported file type", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let options = apply_upload_query(&state.upload_defaults, query)?;
    let candidate = extract_upload_candidate(multipart, options.limits.max_file_size).await?;

    let outcome = process_file_upload(state.storage.clone(), candidate, &options).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            original_url: outcome.original_url,
            thumbnail_url: outcome.thumbnail_url,
            metadata: outcome.metadata,
        }),
    ))
}

/// Validate an image without storing it
///
/// Runs the same checks as the upload endpoint and reports what was detected.
#[utoipa::path(
    post,
    path = "/api/v1/uploads/validate",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File is a valid image", body = ValidationReport),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported file type", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "validate_upload"))]
pub async fn validate_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ValidationReport>, HttpAppError> {
    let limits = state.upload_defaults.limits;
    let candidate = extract_upload_candidate(multipart, limits.max_file_size).await?;

    let (filename, validated) = tokio::task::spawn_blocking(move || {
        let result = validate_uploaded_file(&candidate, &limits);
        (candidate.filename, result)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Validation task failed: {}", e)))?;
    let validated = validated?;
    let sanitized_filename = require_filename(&filename)?;

    tracing::debug!(
        detected = %validated.detected,
        width = validated.width,
        height = validated.height,
        "Upload validated"
    );

    Ok(Json(ValidationReport {
        valid: true,
        detected_type: validated.detected.as_str().to_string(),
        width: validated.width,
        height: validated.height,
        sanitized_filename,
    }))
}
