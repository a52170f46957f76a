//! Application setup and initialization
//!
//! Everything `main` needs to go from a `Config` to a served router. Tests
//! use [`services::initialize_services`] and [`routes::setup_routes`]
//! directly with their own storage and weather provider.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use greenmate_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment(), config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;
    let weather = services::setup_weather_provider(&config)?;
    let state = services::initialize_services(config, storage, weather);

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
