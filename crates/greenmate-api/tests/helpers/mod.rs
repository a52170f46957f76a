//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in-process: local storage in a temp dir and a stub
//! weather provider, so no network or Docker is needed.

#![allow(dead_code)]
pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use greenmate_api::constants;
use greenmate_api::setup::{routes, services};
use greenmate_api::AppState;
use greenmate_care::{CareError, WeatherProvider};
use greenmate_core::models::{ResolvedLocation, WeatherObservation};
use greenmate_core::{Config, GreenMateConfig};
use greenmate_storage::{LocalStorage, Storage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const STORAGE_BASE_URL: &str = "http://localhost:4000/uploads";

/// API path prefix for tests (e.g. `/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Weather provider returning a canned observation, or failing.
pub struct StubWeather {
    pub observation: Option<WeatherObservation>,
    pub calls: AtomicUsize,
}

impl StubWeather {
    pub fn returning(observation: WeatherObservation) -> Self {
        Self {
            observation: Some(observation),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            observation: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for StubWeather {
    async fn current_weather(
        &self,
        _location: &ResolvedLocation,
    ) -> Result<WeatherObservation, CareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.observation
            .clone()
            .ok_or_else(|| CareError::WeatherFetchFailed("stub provider is down".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

/// Test application: server, state and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub weather: Arc<StubWeather>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(temp_dir: &TempDir) -> GreenMateConfig {
    let mut config = GreenMateConfig::default();
    config.local_storage_path = Some(temp_dir.path().to_string_lossy().into_owned());
    config.local_storage_base_url = Some(STORAGE_BASE_URL.to_string());
    config
}

/// Setup test app with local storage and a stub weather provider.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}, StubWeather::returning(fixtures::hot_clear_day())).await
}

pub async fn setup_test_app_with(
    configure: impl FnOnce(&mut GreenMateConfig),
    weather: StubWeather,
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let mut inner = test_config(&temp_dir);
    configure(&mut inner);
    let config: Config = inner.into();

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path(), STORAGE_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );
    let weather = Arc::new(weather);

    let state = services::initialize_services(config, storage, weather.clone());
    let router = routes::setup_routes(state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        weather,
        _temp_dir: temp_dir,
    }
}
