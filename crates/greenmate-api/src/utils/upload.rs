//! Request parsing shared by the upload and care handlers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use greenmate_core::AppError;
use greenmate_processing::compression::parse_output_format;
use greenmate_processing::{UploadCandidate, UploadOptions, ValidationError};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::HttpAppError;

/// Per-request overrides for the upload pipeline.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Storage folder (sanitized; defaults to "uploads")
    pub folder: Option<String>,
    /// Whether to create a square thumbnail (default true)
    pub thumbnail: Option<bool>,
    /// Output format: jpeg, png or webp
    pub format: Option<String>,
    /// Encoder quality 1-100
    pub quality: Option<u8>,
    /// Maximum output width, capped by the server setting
    pub max_width: Option<u32>,
    /// Maximum output height, capped by the server setting
    pub max_height: Option<u32>,
}

/// Apply query overrides on top of the configured defaults.
///
/// Requested bounds can only shrink the configured box, never grow it.
pub fn apply_upload_query(
    defaults: &UploadOptions,
    query: UploadQuery,
) -> Result<UploadOptions, HttpAppError> {
    let mut options = defaults.clone();
    options.folder = query.folder;

    if let Some(thumbnail) = query.thumbnail {
        options.thumbnail = thumbnail;
    }
    if let Some(format) = query.format.as_deref() {
        options.format = parse_output_format(format)?;
    }
    if let Some(quality) = query.quality {
        if !(1..=100).contains(&quality) {
            return Err(AppError::InvalidInput("quality must be between 1 and 100".to_string()).into());
        }
        options.quality = quality;
    }
    if let Some(width) = query.max_width {
        options.max_width = bounded_dimension("max_width", width, defaults.max_width)?;
    }
    if let Some(height) = query.max_height {
        options.max_height = bounded_dimension("max_height", height, defaults.max_height)?;
    }

    Ok(options)
}

fn bounded_dimension(name: &str, requested: u32, configured: u32) -> Result<u32, HttpAppError> {
    if requested == 0 {
        return Err(AppError::InvalidInput(format!("{} must be greater than 0", name)).into());
    }
    Ok(requested.min(configured))
}

/// Read the single `file` field of a multipart form into an upload candidate.
///
/// A form without a `file` field (or with an empty one) is `NoFileProvided`.
/// Missing filename or content type are passed through empty so validation
/// reports them with the right error. The field is read in chunks and reading
/// stops as soon as it exceeds `max_file_size`, so oversized files are
/// `FileTooLarge` however far past the limit they are.
pub async fn extract_upload_candidate(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<UploadCandidate, HttpAppError> {
    let mut candidate: Option<UploadCandidate> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to read multipart", max_file_size))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if candidate.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            )
            .into());
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, "Failed to read file data", max_file_size))?
        {
            data.extend_from_slice(&chunk);
            if data.len() > max_file_size {
                return Err(ValidationError::FileTooLarge {
                    size: data.len(),
                    max: max_file_size,
                }
                .into());
            }
        }

        candidate = Some(UploadCandidate::new(data, content_type, filename));
    }

    candidate
        .filter(|c| !c.data.is_empty())
        .ok_or_else(|| ValidationError::NoFileProvided.into())
}

/// A body cut off by the request size limit is reported as `FileTooLarge`.
fn multipart_error(err: MultipartError, context: &str, max_file_size: usize) -> HttpAppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ValidationError::FileTooLarge {
            size: max_file_size.saturating_add(1),
            max: max_file_size,
        }
        .into();
    }
    AppError::InvalidInput(format!("{}: {}", context, err)).into()
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_plant_types(raw: Option<&str>) -> Option<Vec<String>> {
    let types: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!types.is_empty()).then_some(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenmate_core::{ErrorKind, OutputFormat};

    #[test]
    fn test_query_overrides_are_capped() {
        let defaults = UploadOptions::default();
        let query = UploadQuery {
            folder: Some("plants".to_string()),
            thumbnail: Some(false),
            format: Some("webp".to_string()),
            quality: Some(60),
            max_width: Some(5000),
            max_height: Some(600),
        };
        let options = apply_upload_query(&defaults, query).unwrap();
        assert_eq!(options.folder.as_deref(), Some("plants"));
        assert!(!options.thumbnail);
        assert_eq!(options.format, OutputFormat::Webp);
        assert_eq!(options.quality, 60);
        assert_eq!(options.max_width, defaults.max_width);
        assert_eq!(options.max_height, 600);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let defaults = UploadOptions::default();

        let err = apply_upload_query(
            &defaults,
            UploadQuery {
                format: Some("tiff".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.0.kind(), Some(ErrorKind::UnsupportedFormat));

        assert!(apply_upload_query(
            &defaults,
            UploadQuery {
                quality: Some(0),
                ..Default::default()
            },
        )
        .is_err());

        assert!(apply_upload_query(
            &defaults,
            UploadQuery {
                max_width: Some(0),
                ..Default::default()
            },
        )
        .is_err());
    }

    #[test]
    fn test_parse_plant_types() {
        assert_eq!(parse_plant_types(None), None);
        assert_eq!(parse_plant_types(Some(" , ")), None);
        assert_eq!(
            parse_plant_types(Some("fern, cactus,,")),
            Some(vec!["fern".to_string(), "cactus".to_string()])
        );
    }
}
