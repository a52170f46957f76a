//! Upload pipeline: validate → optimize → thumbnail → store.
//!
//! Nothing reaches storage until validation has fully passed and every image
//! has been encoded. If the thumbnail write fails, the already stored
//! original is removed again so a failed upload leaves nothing behind.

use std::sync::Arc;

use greenmate_core::models::ImageMetadata;
use greenmate_storage::{sanitize_folder, Storage};

use super::types::{UploadOptions, UploadOutcome};
use crate::error::UploadError;
use crate::image::{create_thumbnail, process_and_optimize_image, ProcessedImage};
use crate::validator::{require_filename, validate_uploaded_file, UploadCandidate};

/// Run the full upload flow for one candidate.
pub async fn process_file_upload(
    storage: Arc<dyn Storage>,
    candidate: UploadCandidate,
    options: &UploadOptions,
) -> Result<UploadOutcome, UploadError> {
    let start = std::time::Instant::now();

    // Decoding is CPU-bound; run off the async pool.
    let limits = options.limits;
    let (candidate, validated) = tokio::task::spawn_blocking(move || {
        let result = validate_uploaded_file(&candidate, &limits);
        (candidate, result)
    })
    .await?;
    let validated = validated?;

    let original_filename = require_filename(&candidate.filename)?;

    let process_options = options.process_options(&original_filename);
    let want_thumbnail = options.thumbnail;
    let thumbnail_size = options.thumbnail_size;
    let thumb_name = original_filename.clone();
    let data = candidate.data;

    let (optimized, thumbnail) = tokio::task::spawn_blocking(
        move || -> Result<(ProcessedImage, Option<ProcessedImage>), UploadError> {
            let optimized = process_and_optimize_image(&data, &process_options)?;
            let thumbnail = if want_thumbnail {
                Some(create_thumbnail(
                    &optimized.data,
                    thumbnail_size,
                    &thumb_name,
                )?)
            } else {
                None
            };
            Ok((optimized, thumbnail))
        },
    )
    .await??;

    let folder = sanitize_folder(options.folder.as_deref());
    let content_type = optimized.format.content_type();
    let size_bytes = optimized.data.len();

    let (storage_key, original_url) = storage
        .upload(&folder, &optimized.filename, content_type, optimized.data)
        .await?;

    let (thumbnail_key, thumbnail_url) = match thumbnail {
        Some(thumb) => {
            let stored = storage
                .upload(
                    &folder,
                    &thumb.filename,
                    thumb.format.content_type(),
                    thumb.data,
                )
                .await;
            match stored {
                Ok((key, url)) => (Some(key), Some(url)),
                Err(e) => {
                    if let Err(cleanup) = storage.delete(&storage_key).await {
                        tracing::warn!(
                            error = %cleanup,
                            key = %storage_key,
                            "Failed to remove original after thumbnail upload error"
                        );
                    }
                    return Err(e.into());
                }
            }
        }
        None => (None, None),
    };

    tracing::info!(
        detected = %validated.detected,
        src_width = validated.width,
        src_height = validated.height,
        width = optimized.width,
        height = optimized.height,
        format = %optimized.format,
        key = %storage_key,
        thumbnail = thumbnail_key.is_some(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Image upload stored"
    );

    Ok(UploadOutcome {
        original_url,
        thumbnail_url,
        metadata: ImageMetadata {
            filename: optimized.filename,
            original_filename,
            format: optimized.format,
            content_type: content_type.to_string(),
            width: optimized.width,
            height: optimized.height,
            size_bytes,
            storage_key,
            thumbnail_key,
        },
    })
}
