//! Location → weather → recommendations.

use std::sync::Arc;

use chrono::Utc;
use greenmate_core::models::{LocationQuery, WeatherCareReport, WeatherObservation};

use crate::error::CareError;
use crate::location::resolve_location;
use crate::recommendations::generate_care_recommendations;
use crate::weather::WeatherProvider;

/// Short human-readable summary of an observation.
pub fn build_forecast(weather: &WeatherObservation) -> String {
    let mut forecast = format!(
        "Current conditions: {}, {:.1}°C",
        weather.description, weather.temperature
    );
    if weather.precipitation != 0.0 {
        forecast.push_str(&format!(
            ", {:.1} mm precipitation in the last hour",
            weather.precipitation
        ));
    }
    forecast
}

#[derive(Clone)]
pub struct CareService {
    provider: Arc<dyn WeatherProvider>,
}

impl CareService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Resolve the location, fetch current weather once and derive
    /// recommendations from it. Provider errors are returned as-is.
    #[tracing::instrument(skip(self, plant_types), fields(provider = self.provider.provider_name()))]
    pub async fn get_weather_based_care_recommendations(
        &self,
        query: &LocationQuery,
        plant_types: Option<&[String]>,
    ) -> Result<WeatherCareReport, CareError> {
        let location = resolve_location(query)?;

        let weather = match self.provider.current_weather(&location).await {
            Ok(weather) => weather,
            Err(e) => {
                tracing::warn!(error = %e, location = %location, "Weather lookup failed");
                return Err(e);
            }
        };

        let recommendations = generate_care_recommendations(&weather, plant_types);
        let forecast = build_forecast(&weather);

        tracing::info!(
            location = %location,
            recommendation_count = recommendations.len(),
            "Generated weather-based care recommendations"
        );

        Ok(WeatherCareReport {
            location,
            weather,
            recommendations,
            forecast,
            last_updated: Utc::now(),
        })
    }
}
