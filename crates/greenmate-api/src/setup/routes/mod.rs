//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
pub(crate) mod health;

use crate::middleware::{rate_limit_middleware, request_timeout_middleware};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use greenmate_core::{Config, StorageBackend};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::constants::{DEFAULT_HTTP_CONCURRENCY_LIMIT, LOCAL_FILES_PATH};

/// Headroom for multipart boundaries and form fields on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let config = &state.config;
    let cors = setup_cors(config)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
        .max(1);
    let request_timeout = Duration::from_secs(config.request_timeout_secs().max(1));
    let body_limit = config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    tracing::info!(
        http_concurrency_limit,
        request_timeout_secs = request_timeout.as_secs(),
        body_limit_bytes = body_limit,
        rate_limit_per_minute = config.http_rate_limit_per_minute(),
        shard_count = config.rate_limiter_shard_count(),
        trusted_proxy_count = config.trusted_proxy_count(),
        "HTTP layers configured"
    );

    let mut routes = public_routes(state.clone()).merge(api_routes(state.clone()));
    if state.storage.backend_type() == StorageBackend::Local {
        routes = routes.merge(domains::local_file_routes(state.clone()));
        tracing::info!(path = LOCAL_FILES_PATH, "Serving locally stored files");
    }

    let app = routes
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn_with_state(
            request_timeout,
            request_timeout_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
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
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn api_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .merge(domains::upload_routes())
        .merge(domains::care_routes())
        .with_state(state)
}
