use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use greenmate_care::{
    build_forecast, generate_care_recommendations, generate_care_recommendations_for_month,
};
use greenmate_core::models::{
    CareRecommendation, LocationQuery, WeatherCareReport, WeatherObservation,
};
use greenmate_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::upload::parse_plant_types;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CareQuery {
    /// Latitude; used together with `lon`
    pub lat: Option<f64>,
    /// Longitude; used together with `lat`
    pub lon: Option<f64>,
    /// City name, used when no coordinates are given
    pub city: Option<String>,
    /// Optional country code for `city`
    pub country: Option<String>,
    /// Comma-separated plant types (currently informational)
    pub plant_types: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CareRequest {
    pub weather: WeatherObservation,
    #[serde(default)]
    pub plant_types: Option<Vec<String>>,
    /// Calendar month 1-12; defaults to the current UTC month.
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CareRecommendationsResponse {
    pub recommendations: Vec<CareRecommendation>,
    pub forecast: String,
}

/// Weather-based care recommendations for a location
///
/// Fetches current weather once for the given coordinates or city and derives
/// a prioritized list of care actions from it.
#[utoipa::path(
    get,
    path = "/api/v1/care/recommendations",
    tag = "care",
    params(CareQuery),
    responses(
        (status = 200, description = "Recommendations for the location", body = WeatherCareReport),
        (status = 400, description = "No usable location", body = ErrorResponse),
        (status = 502, description = "Weather provider failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "care_recommendations"))]
pub async fn get_care_recommendations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CareQuery>,
) -> Result<Json<WeatherCareReport>, HttpAppError> {
    let plant_types = parse_plant_types(query.plant_types.as_deref());
    let location = LocationQuery {
        lat: query.lat,
        lon: query.lon,
        city: query.city,
        country: query.country,
    };

    let report = state
        .care
        .get_weather_based_care_recommendations(&location, plant_types.as_deref())
        .await?;

    Ok(Json(report))
}

/// Care recommendations for a supplied weather observation
///
/// Runs the rule engine only; no weather provider call is made.
#[utoipa::path(
    post,
    path = "/api/v1/care/recommendations",
    tag = "care",
    request_body = CareRequest,
    responses(
        (status = 200, description = "Recommendations for the observation", body = CareRecommendationsResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(body), fields(operation = "care_for_weather"))]
pub async fn recommend_for_weather(
    ValidatedJson(body): ValidatedJson<CareRequest>,
) -> Result<Json<CareRecommendationsResponse>, HttpAppError> {
    let plant_types = body.plant_types.as_deref();
    let recommendations = match body.month {
        Some(month) if (1..=12).contains(&month) => {
            generate_care_recommendations_for_month(&body.weather, plant_types, month)
        }
        Some(month) => {
            return Err(AppError::InvalidInput(format!(
                "month must be between 1 and 12, got {}",
                month
            ))
            .into());
        }
        None => generate_care_recommendations(&body.weather, plant_types),
    };

    Ok(Json(CareRecommendationsResponse {
        forecast: build_forecast(&body.weather),
        recommendations,
    }))
}
