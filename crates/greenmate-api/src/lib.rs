//! GreenMate API Library
//!
//! This crate provides the HTTP handlers, middleware, and application setup
//! around the upload pipeline and the care engine.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod middleware;
pub mod setup;
pub mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
