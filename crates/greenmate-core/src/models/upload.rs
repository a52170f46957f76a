use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::image::OutputFormat;

/// Facts about a stored, normalized image.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageMetadata {
    pub filename: String,
    pub original_filename: String,
    pub format: OutputFormat,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    pub storage_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub metadata: ImageMetadata,
}

/// Result of the validation-only endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationReport {
    pub valid: bool,
    /// MIME type the file content was recognised as.
    pub detected_type: String,
    pub width: u32,
    pub height: u32,
    pub sanitized_filename: String,
}
