//! Domain route groups (uploads, care, local files).

use crate::constants::{API_PREFIX, LOCAL_FILES_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/uploads", API_PREFIX),
            post(handlers::upload::upload_image),
        )
        .route(
            &format!("{}/uploads/validate", API_PREFIX),
            post(handlers::upload::validate_upload),
        )
}

pub fn care_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/care/recommendations", API_PREFIX),
        get(handlers::care::get_care_recommendations)
            .post(handlers::care::recommend_for_weather),
    )
}

pub fn local_file_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            &format!("{}/{{*key}}", LOCAL_FILES_PATH),
            get(handlers::files::serve_local_file),
        )
        .with_state(state)
}
