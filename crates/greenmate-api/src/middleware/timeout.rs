use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use greenmate_core::AppError;

use crate::error::HttpAppError;

/// Fail requests that run longer than the configured timeout with a 500.
pub async fn request_timeout_middleware(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, timeout_secs = timeout.as_secs(), "Request timed out");
            HttpAppError(AppError::Internal(format!(
                "Request exceeded {}s timeout",
                timeout.as_secs()
            )))
            .into_response()
        }
    }
}
