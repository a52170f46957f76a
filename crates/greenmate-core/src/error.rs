//! Error types module
//!
//! This module provides the error types shared across GreenMate. Domain crates
//! keep their own `thiserror` enums; each of them maps onto an [`ErrorKind`]
//! so the HTTP layer can decide the response by discriminant, never by
//! inspecting messages.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like upstream outages
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// The fixed failure taxonomy of the upload and care cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoFileProvided,
    FileTooLarge,
    UnsupportedType,
    TypeMismatch,
    InvalidFilename,
    InvalidImage,
    DimensionOutOfRange,
    UnsupportedFormat,
    ImageProcessingFailed,
    LocationRequired,
    WeatherFetchFailed,
    StorageFailed,
}

impl ErrorKind {
    /// True when the caller sent something we will never accept.
    pub fn is_client_fault(self) -> bool {
        !matches!(
            self,
            ErrorKind::ImageProcessingFailed | ErrorKind::WeatherFetchFailed | ErrorKind::StorageFailed
        )
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NoFileProvided => "NO_FILE_PROVIDED",
            ErrorKind::FileTooLarge => "FILE_TOO_LARGE",
            ErrorKind::UnsupportedType => "UNSUPPORTED_TYPE",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::InvalidFilename => "INVALID_FILENAME",
            ErrorKind::InvalidImage => "INVALID_IMAGE",
            ErrorKind::DimensionOutOfRange => "DIMENSION_OUT_OF_RANGE",
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::ImageProcessingFailed => "IMAGE_PROCESSING_FAILED",
            ErrorKind::LocationRequired => "LOCATION_REQUIRED",
            ErrorKind::WeatherFetchFailed => "WEATHER_FETCH_FAILED",
            ErrorKind::StorageFailed => "STORAGE_ERROR",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failure from one of the domain cores, classified by kind.
    #[error("{message}")]
    Domain { kind: ErrorKind, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn domain(kind: ErrorKind, message: impl Into<String>) -> Self {
        AppError::Domain {
            kind,
            message: message.into(),
        }
    }

    /// The taxonomy entry, if this error came from a domain core.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Domain { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

type StaticMetadata = (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
);

/// Static metadata for each taxonomy entry: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn kind_static_metadata(kind: ErrorKind) -> StaticMetadata {
    let code = kind.code();
    match kind {
        ErrorKind::NoFileProvided => (
            400,
            code,
            false,
            Some("Attach an image in the 'file' form field"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::FileTooLarge => (
            413,
            code,
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::UnsupportedType => (
            415,
            code,
            false,
            Some("Upload a JPEG, PNG or WebP image"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::TypeMismatch => (
            400,
            code,
            false,
            Some("Make sure the file extension and content type match the file"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::InvalidFilename => (
            400,
            code,
            false,
            Some("Rename the file using letters, digits, '.', '_' or '-'"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::InvalidImage => (
            400,
            code,
            false,
            Some("Check image format and try a different file"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::DimensionOutOfRange => (
            400,
            code,
            false,
            Some("Use an image between 10 and 4096 pixels on each side"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::UnsupportedFormat => (
            400,
            code,
            false,
            Some("Request one of jpeg, png or webp"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::ImageProcessingFailed => (
            500,
            code,
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        ErrorKind::LocationRequired => (
            400,
            code,
            false,
            Some("Provide lat and lon, or a city name"),
            false,
            LogLevel::Debug,
        ),
        ErrorKind::WeatherFetchFailed => (
            502,
            code,
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Warn,
        ),
        ErrorKind::StorageFailed => (
            500,
            code,
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

fn app_error_static_metadata(err: &AppError) -> StaticMetadata {
    match err {
        AppError::Domain { kind, .. } => kind_static_metadata(*kind),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Domain { .. } => "Domain",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Domain { kind, message } => match kind {
                ErrorKind::ImageProcessingFailed => "Failed to process image".to_string(),
                ErrorKind::WeatherFetchFailed => "Failed to fetch weather data".to_string(),
                ErrorKind::StorageFailed => "Failed to access storage".to_string(),
                _ => message.clone(),
            },
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_faults_map_to_4xx() {
        let kinds = [
            ErrorKind::NoFileProvided,
            ErrorKind::FileTooLarge,
            ErrorKind::UnsupportedType,
            ErrorKind::TypeMismatch,
            ErrorKind::InvalidFilename,
            ErrorKind::InvalidImage,
            ErrorKind::DimensionOutOfRange,
            ErrorKind::UnsupportedFormat,
            ErrorKind::LocationRequired,
        ];
        for kind in kinds {
            assert!(kind.is_client_fault(), "{kind} should be a client fault");
            let err = AppError::domain(kind, "x");
            let status = err.http_status_code();
            assert!((400..500).contains(&status), "{kind} mapped to {status}");
            assert!(!err.is_sensitive());
        }
    }

    #[test]
    fn test_server_faults_map_to_5xx() {
        for kind in [
            ErrorKind::ImageProcessingFailed,
            ErrorKind::WeatherFetchFailed,
            ErrorKind::StorageFailed,
        ] {
            assert!(!kind.is_client_fault());
            let err = AppError::domain(kind, "upstream exploded");
            assert!(err.http_status_code() >= 500);
            assert!(err.is_sensitive());
            assert!(!err.client_message().contains("exploded"));
        }
    }

    #[test]
    fn test_error_metadata_file_too_large() {
        let err = AppError::domain(ErrorKind::FileTooLarge, "File exceeds 10485760 bytes");
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
        assert_eq!(err.kind(), Some(ErrorKind::FileTooLarge));
        assert_eq!(err.client_message(), "File exceeds 10485760 bytes");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_internal() {
        let err = AppError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.kind(), None);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.detailed_message().contains("disk on fire"));
    }

    #[test]
    fn test_error_metadata_suggested_actions() {
        let err = AppError::domain(ErrorKind::WeatherFetchFailed, "timeout");
        assert_eq!(err.suggested_action(), Some("Retry after a short delay"));
        assert!(err.is_recoverable());

        let err = AppError::InvalidInput("test".to_string());
        assert_eq!(
            err.suggested_action(),
            Some("Check request parameters and try again")
        );
    }

    #[test]
    fn test_generic_variants_metadata() {
        let cases = [
            (AppError::InvalidInput("x".to_string()), 400, "INVALID_INPUT"),
            (AppError::NotFound("x".to_string()), 404, "NOT_FOUND"),
            (AppError::Internal("x".to_string()), 500, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.http_status_code(), status);
            assert_eq!(err.error_code(), code);
            assert_eq!(err.kind(), None);
        }
    }
}
