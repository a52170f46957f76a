//! Weather provider and application state construction

use anyhow::{Context, Result};
use greenmate_care::{CareService, OpenWeatherMapClient, WeatherProvider};
use greenmate_core::Config;
use greenmate_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

pub fn setup_weather_provider(config: &Config) -> Result<Arc<dyn WeatherProvider>> {
    if config.weather_api_key().is_none() {
        tracing::warn!("WEATHER_API_KEY not set; weather-based recommendations will fail");
    }

    let client = OpenWeatherMapClient::new(
        config.weather_api_key().map(String::from),
        config.weather_api_base_url(),
        Duration::from_secs(config.weather_timeout_secs()),
    )
    .context("Failed to create weather HTTP client")?;

    tracing::info!(
        base_url = %config.weather_api_base_url(),
        timeout_secs = config.weather_timeout_secs(),
        "Weather provider initialized"
    );
    Ok(Arc::new(client))
}

/// Assemble the shared state from already constructed clients.
pub fn initialize_services(
    config: Config,
    storage: Arc<dyn Storage>,
    weather: Arc<dyn WeatherProvider>,
) -> Arc<AppState> {
    Arc::new(AppState::new(config, storage, CareService::new(weather)))
}
