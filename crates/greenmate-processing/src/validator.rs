//! Upload validation gate.
//!
//! Checks run in a fixed order and the first failure is returned, so a given
//! upload always fails with the same, most specific reason.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Cursor;

use greenmate_core::ErrorKind;
use image::{GenericImageView, ImageReader};

use crate::signature::{detect_signature, SupportedMime};

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const MIN_DIMENSION: u32 = 10;
pub const MAX_DIMENSION: u32 = 4096;
const MAX_FILENAME_LEN: usize = 255;

/// Which side of the allowed dimension range an image fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionBound {
    TooSmall,
    TooLarge,
}

impl Display for DimensionBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DimensionBound::TooSmall => f.write_str("too small"),
            DimensionBound::TooLarge => f.write_str("too large"),
        }
    }
}

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No file provided")]
    NoFileProvided,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported file type: {content_type} (allowed: image/jpeg, image/png, image/webp)")]
    UnsupportedType { content_type: String },

    #[error(
        "File content does not match declared type {declared} (detected: {})",
        .detected.map_or("unknown", SupportedMime::as_str)
    )]
    TypeMismatch {
        declared: SupportedMime,
        detected: Option<SupportedMime>,
    },

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Image dimensions {width}x{height} are {bound} (allowed: {min}-{max} pixels per side)")]
    DimensionOutOfRange {
        width: u32,
        height: u32,
        bound: DimensionBound,
        min: u32,
        max: u32,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::NoFileProvided => ErrorKind::NoFileProvided,
            ValidationError::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            ValidationError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            ValidationError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ValidationError::InvalidFilename(_) => ErrorKind::InvalidFilename,
            ValidationError::InvalidImage(_) => ErrorKind::InvalidImage,
            ValidationError::DimensionOutOfRange { .. } => ErrorKind::DimensionOutOfRange,
        }
    }
}

/// A file as received from the client. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct UploadCandidate {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
    /// Size the client claimed, when it sent one.
    pub declared_size: Option<usize>,
}

impl UploadCandidate {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            declared_size: Some(data.len()),
            data,
            content_type: content_type.into(),
            filename: filename.into(),
        }
    }
}

/// Proof that a candidate passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub detected: SupportedMime,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    pub max_file_size: usize,
    pub min_dimension: u32,
    pub max_dimension: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            min_dimension: MIN_DIMENSION,
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl ValidationLimits {
    pub fn with_max_file_size(max_file_size: usize) -> Self {
        Self {
            max_file_size,
            ..Default::default()
        }
    }
}

/// Reduce a client filename to a safe basename.
///
/// Directory components are dropped (both `/` and `\` separators), every
/// character outside `[A-Za-z0-9._-]` is removed and the result is cut to
/// 255 characters. A name made only of dots becomes empty. The result may be
/// empty; see [`require_filename`].
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '.' | '_' | '-'))
        .take(MAX_FILENAME_LEN)
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        String::new()
    } else {
        cleaned
    }
}

/// Sanitize a filename and reject it if nothing usable is left.
pub fn require_filename(name: &str) -> Result<String, ValidationError> {
    let sanitized = sanitize_filename(name);
    if sanitized.is_empty() {
        return Err(ValidationError::InvalidFilename(name.to_string()));
    }
    Ok(sanitized)
}

/// Run the validation gate over an upload candidate.
///
/// Order: presence, size, declared type and signature, decodability,
/// dimensions. Decoding is CPU-bound; async callers should run this on the
/// blocking pool.
pub fn validate_uploaded_file(
    candidate: &UploadCandidate,
    limits: &ValidationLimits,
) -> Result<ValidatedUpload, ValidationError> {
    if candidate.data.is_empty() {
        return Err(ValidationError::NoFileProvided);
    }

    let size = candidate
        .declared_size
        .unwrap_or(0)
        .max(candidate.data.len());
    if size > limits.max_file_size {
        return Err(ValidationError::FileTooLarge {
            size,
            max: limits.max_file_size,
        });
    }

    let declared = SupportedMime::parse(&candidate.content_type)?;
    if !declared.matches(&candidate.data) {
        return Err(ValidationError::TypeMismatch {
            declared,
            detected: detect_signature(&candidate.data),
        });
    }

    let img = ImageReader::new(Cursor::new(&candidate.data))
        .with_guessed_format()
        .map_err(|e| ValidationError::InvalidImage(e.to_string()))?
        .decode()
        .map_err(|e| ValidationError::InvalidImage(e.to_string()))?;

    let (width, height) = img.dimensions();
    let bound = if width < limits.min_dimension || height < limits.min_dimension {
        Some(DimensionBound::TooSmall)
    } else if width > limits.max_dimension || height > limits.max_dimension {
        Some(DimensionBound::TooLarge)
    } else {
        None
    };

    if let Some(bound) = bound {
        return Err(ValidationError::DimensionOutOfRange {
            width,
            height,
            bound,
            min: limits.min_dimension,
            max: limits.max_dimension,
        });
    }

    tracing::debug!(
        detected = %declared,
        width = width,
        height = height,
        size_bytes = candidate.data.len(),
        "Upload passed validation"
    );

    Ok(ValidatedUpload {
        detected: declared,
        width,
        height,
    })
}
