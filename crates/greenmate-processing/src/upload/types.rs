//! Types for the upload pipeline.

use greenmate_core::models::ImageMetadata;
use greenmate_core::{Config, OutputFormat};

use crate::image::{ProcessOptions, DEFAULT_THUMBNAIL_SIZE};
use crate::validator::ValidationLimits;

/// Per-request upload settings.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Storage folder; sanitized by the storage layer.
    pub folder: Option<String>,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub format: OutputFormat,
    pub thumbnail: bool,
    pub thumbnail_size: u32,
    pub limits: ValidationLimits,
}

impl Default for UploadOptions {
    fn default() -> Self {
        let process = ProcessOptions::default();
        Self {
            folder: None,
            max_width: process.max_width,
            max_height: process.max_height,
            quality: process.quality,
            format: process.format,
            thumbnail: true,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            limits: ValidationLimits::default(),
        }
    }
}

impl UploadOptions {
    /// Options seeded from service configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            folder: None,
            max_width: config.image_max_width(),
            max_height: config.image_max_height(),
            quality: config.image_quality(),
            format: config.image_format(),
            thumbnail: true,
            thumbnail_size: config.thumbnail_size(),
            limits: ValidationLimits::with_max_file_size(config.max_file_size_bytes()),
        }
    }

    pub(crate) fn process_options(&self, original_name: &str) -> ProcessOptions {
        ProcessOptions {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
            format: self.format,
            original_name: original_name.to_string(),
        }
    }
}

/// What a successful upload produced.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub original_url: String,
    pub thumbnail_url: Option<String>,
    pub metadata: ImageMetadata,
}
