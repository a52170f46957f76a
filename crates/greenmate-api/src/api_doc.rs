//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use greenmate_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GreenMate API",
        version = "0.1.0",
        description = "Plant photo uploads with validation, normalization and thumbnails, plus weather-based plant care recommendations. All endpoints are versioned under /api/v1/."
    ),
    paths(
        // Uploads
        handlers::upload::upload_image,
        handlers::upload::validate_upload,
        // Care
        handlers::care::get_care_recommendations,
        handlers::care::recommend_for_weather,
        // Health
        health::health_check,
        health::liveness_check,
    ),
    components(schemas(
        error::ErrorResponse,
        models::UploadResponse,
        models::ImageMetadata,
        models::ValidationReport,
        models::OutputFormat,
        models::WeatherObservation,
        models::ResolvedLocation,
        models::WeatherCareReport,
        models::CareRecommendation,
        models::CareCategory,
        models::Priority,
        handlers::care::CareRequest,
        handlers::care::CareRecommendationsResponse,
        health::HealthCheckResponse,
    )),
    tags(
        (name = "uploads", description = "Image upload and validation"),
        (name = "care", description = "Plant care recommendations"),
        (name = "health", description = "Service health probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_versioned_paths() {
        let spec = get_openapi_spec();
        for path in [
            "/api/v1/uploads",
            "/api/v1/uploads/validate",
            "/api/v1/care/recommendations",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
