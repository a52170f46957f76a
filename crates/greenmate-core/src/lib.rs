//! GreenMate Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the upload pipeline, the care engine and the HTTP service.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GreenMateConfig};
pub use error::{AppError, ErrorKind, ErrorMetadata, LogLevel};
pub use models::{
    CareCategory, CareRecommendation, OutputFormat, Priority, WeatherObservation,
};
pub use storage_types::StorageBackend;
