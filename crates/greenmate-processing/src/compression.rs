//! Encoders for the normalized output formats.

use std::io::Cursor;

use greenmate_core::OutputFormat;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, GenericImageView};

use crate::error::ProcessingError;

/// WebP effort level (0 fastest, 6 smallest output).
const WEBP_METHOD: i32 = 6;

/// Parse a client-supplied format name.
pub fn parse_output_format(value: &str) -> Result<OutputFormat, ProcessingError> {
    value
        .parse()
        .map_err(|_| ProcessingError::UnsupportedFormat(value.to_string()))
}

/// Main compression service
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode an image in the requested format.
    ///
    /// `quality` (1-100) applies to JPEG and WebP. PNG is lossless and always
    /// uses maximum compression with adaptive filtering.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Vec<u8>, ProcessingError> {
        let quality = quality.clamp(1, 100);
        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::Webp => Self::compress_webp(img, quality),
        }
    }

    /// Progressive JPEG via mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }

    fn compress_png(img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            Cursor::new(&mut buffer),
            CompressionType::Best,
            FilterType::Adaptive,
        );
        img.write_with_encoder(encoder)?;

        Ok(buffer)
    }

    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let mut config = webp::WebPConfig::new().map_err(|_| {
            ProcessingError::ImageProcessingFailed("Failed to initialise WebP encoder".to_string())
        })?;
        config.quality = quality as f32;
        config.method = WEBP_METHOD;

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode_advanced(&config).map_err(|e| {
            ProcessingError::ImageProcessingFailed(format!("WebP encoding failed: {:?}", e))
        })?;

        Ok(webp_data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{detect_signature, SupportedMime};
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        let mut img = RgbaImage::new(64, 48);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 4) as u8, (y * 5) as u8, 90, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("webp").unwrap(), OutputFormat::Webp);
        assert!(matches!(
            parse_output_format("avif"),
            Err(ProcessingError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_compress_each_format_has_matching_signature() {
        let img = sample();
        let cases = [
            (OutputFormat::Jpeg, SupportedMime::Jpeg),
            (OutputFormat::Png, SupportedMime::Png),
            (OutputFormat::Webp, SupportedMime::Webp),
        ];
        for (format, mime) in cases {
            let data = ImageCompressor::compress(&img, format, 85).unwrap();
            assert!(!data.is_empty());
            assert_eq!(detect_signature(&data), Some(mime));
            let decoded = image::load_from_memory(&data).unwrap();
            assert_eq!(decoded.dimensions(), (64, 48));
        }
    }

    #[test]
    fn test_jpeg_quality_affects_size() {
        let img = sample();
        let low = ImageCompressor::compress(&img, OutputFormat::Jpeg, 10).unwrap();
        let high = ImageCompressor::compress(&img, OutputFormat::Jpeg, 100).unwrap();
        assert!(low.len() < high.len());
    }
}
