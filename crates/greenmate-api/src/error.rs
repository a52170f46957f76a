//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! from the processing, storage and care crates convert into `HttpAppError`
//! through their `ErrorKind`, so status codes never depend on message text.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use greenmate_care::CareError;
use greenmate_core::{AppError, ErrorKind, ErrorMetadata, LogLevel};
use greenmate_processing::{ProcessingError, UploadError, ValidationError};
use greenmate_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Wait 60s and retry")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(app_error: &AppError, include_details: bool) -> Self {
        Self {
            error: app_error.client_message(),
            details: include_details.then(|| app_error.detailed_message()),
            error_type: include_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from greenmate-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, code, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|env| {
            let env = env.to_lowercase();
            env == "production" || env == "prod"
        })
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production, and never for sensitive errors.
        let include_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, include_details);

        (status, Json(body)).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::domain(ErrorKind::StorageFailed, other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(AppError::domain(err.kind(), err.to_string()))
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        HttpAppError(AppError::domain(err.kind(), err.to_string()))
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Storage(e) => e.into(),
            other => HttpAppError(AppError::domain(other.kind(), other.to_string())),
        }
    }
}

impl From<CareError> for HttpAppError {
    fn from(err: CareError) -> Self {
        HttpAppError(AppError::domain(err.kind(), err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenmate_processing::SupportedMime;

    fn status_of(err: HttpAppError) -> u16 {
        err.0.http_status_code()
    }

    #[test]
    fn test_validation_errors_map_by_kind() {
        let too_large: HttpAppError = ValidationError::FileTooLarge {
            size: 1000,
            max: 500,
        }
        .into();
        assert_eq!(too_large.0.kind(), Some(ErrorKind::FileTooLarge));
        assert_eq!(status_of(too_large), 413);

        let unsupported: HttpAppError = ValidationError::UnsupportedType {
            content_type: "image/gif".to_string(),
        }
        .into();
        assert_eq!(status_of(unsupported), 415);

        let mismatch: HttpAppError = ValidationError::TypeMismatch {
            declared: SupportedMime::Jpeg,
            detected: Some(SupportedMime::Png),
        }
        .into();
        assert_eq!(mismatch.0.error_code(), "TYPE_MISMATCH");
        assert_eq!(status_of(mismatch), 400);
    }

    #[test]
    fn test_storage_errors() {
        let HttpAppError(app) = StorageError::NotFound("missing".to_string()).into();
        assert!(matches!(app, AppError::NotFound(_)));

        let HttpAppError(app) = StorageError::InvalidKey("bad".to_string()).into();
        assert!(matches!(app, AppError::InvalidInput(_)));

        let HttpAppError(app) = StorageError::UploadFailed("disk full".to_string()).into();
        assert_eq!(app.kind(), Some(ErrorKind::StorageFailed));
        assert_eq!(app.http_status_code(), 500);
        assert!(app.is_sensitive());
    }

    #[test]
    fn test_upload_error_storage_branch_uses_storage_mapping() {
        let err = UploadError::Storage(StorageError::NotFound("x".to_string()));
        let HttpAppError(app) = err.into();
        assert!(matches!(app, AppError::NotFound(_)));
    }

    #[test]
    fn test_care_errors() {
        let HttpAppError(app) = CareError::LocationRequired.into();
        assert_eq!(app.http_status_code(), 400);

        let HttpAppError(app) = CareError::WeatherFetchFailed("timeout".to_string()).into();
        assert_eq!(app.http_status_code(), 502);
        assert_eq!(app.client_message(), "Failed to fetch weather data");
    }

    /// Verifies the public error response contract: serialized ErrorResponse has "error",
    /// "code", "recoverable", and optionally "details" / "error_type" / "suggested_action".
    #[test]
    fn test_error_response_shape() {
        let app = AppError::domain(ErrorKind::LocationRequired, "Location required");
        let json = serde_json::to_value(ErrorResponse::from_app_error(&app, false)).unwrap();
        assert_eq!(json["code"], "LOCATION_REQUIRED");
        assert_eq!(json["recoverable"], false);
        assert!(json.get("details").is_none());

        let json = serde_json::to_value(ErrorResponse::from_app_error(&app, true)).unwrap();
        assert_eq!(json["error_type"], "Domain");
        assert!(json["details"].as_str().unwrap().contains("Location required"));
    }
}
