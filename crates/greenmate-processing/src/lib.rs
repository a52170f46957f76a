//! GreenMate Processing Library
//!
//! Upload validation and image normalization:
//! - magic-number sniffing and filename sanitizing (`signature`, `validator`)
//! - bounded re-encoding and thumbnails (`image`, `compression`)
//! - the validate → optimize → store orchestration (`upload`)

pub mod compression;
pub mod error;
pub mod image;
pub mod naming;
pub mod signature;
pub mod upload;
pub mod validator;

pub use compression::ImageCompressor;
pub use error::{ProcessingError, UploadError};
pub use crate::image::{
    create_thumbnail, process_and_optimize_image, ProcessOptions, ProcessedImage,
};
pub use signature::{detect_signature, validate_type, SupportedMime};
pub use upload::{process_file_upload, UploadOptions, UploadOutcome};
pub use validator::{
    require_filename, sanitize_filename, validate_uploaded_file, DimensionBound, UploadCandidate,
    ValidatedUpload, ValidationError, ValidationLimits,
};
