//! Image normalizer - bounded re-encoding and thumbnails

use std::io::Cursor;

use greenmate_core::OutputFormat;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};

use super::resize::fit_within;
use crate::compression::ImageCompressor;
use crate::error::ProcessingError;
use crate::naming::{generate_filename, generate_thumbnail_filename};

pub const DEFAULT_MAX_DIMENSION: u32 = 1200;
pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 300;
pub const THUMBNAIL_QUALITY: u8 = 80;

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub format: OutputFormat,
    /// Client filename, mixed into the generated name's hash.
    pub original_name: String,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            format: OutputFormat::Jpeg,
            original_name: "image".to_string(),
        }
    }
}

/// A re-encoded image ready for storage.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub data: Vec<u8>,
    pub filename: String,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

fn decode(buffer: &[u8]) -> Result<DynamicImage, ProcessingError> {
    let img = ImageReader::new(Cursor::new(buffer))
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

/// Decode, downscale to fit the configured box and re-encode.
///
/// CPU-bound; async callers run it through `spawn_blocking`.
pub fn process_and_optimize_image(
    buffer: &[u8],
    options: &ProcessOptions,
) -> Result<ProcessedImage, ProcessingError> {
    let start = std::time::Instant::now();
    let img = decode(buffer)?;
    let (src_width, src_height) = img.dimensions();

    let (width, height) = fit_within(src_width, src_height, options.max_width, options.max_height);
    let img = if (width, height) != (src_width, src_height) {
        img.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    let data = ImageCompressor::compress(&img, options.format, options.quality)?;

    tracing::debug!(
        src_width = src_width,
        src_height = src_height,
        width = width,
        height = height,
        format = %options.format,
        input_bytes = buffer.len(),
        output_bytes = data.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Image optimized"
    );

    Ok(ProcessedImage {
        data,
        filename: generate_filename(&options.original_name, options.format),
        format: options.format,
        width,
        height,
    })
}

/// Square "cover" thumbnail: scale to fill `size x size`, center-crop, JPEG q80.
pub fn create_thumbnail(
    buffer: &[u8],
    size: u32,
    original_name: &str,
) -> Result<ProcessedImage, ProcessingError> {
    if size == 0 {
        return Err(ProcessingError::ImageProcessingFailed(
            "Thumbnail size must be greater than 0".to_string(),
        ));
    }

    let img = decode(buffer)?;
    let thumb = img.resize_to_fill(size, size, FilterType::Lanczos3);
    let data = ImageCompressor::compress(&thumb, OutputFormat::Jpeg, THUMBNAIL_QUALITY)?;

    Ok(ProcessedImage {
        data,
        filename: generate_thumbnail_filename(original_name),
        format: OutputFormat::Jpeg,
        width: size,
        height: size,
    })
}
