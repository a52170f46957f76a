//! Upload orchestration: validate → optimize → thumbnail → store.

pub mod pipeline;
pub mod types;

pub use pipeline::process_file_upload;
pub use types::{UploadOptions, UploadOutcome};
