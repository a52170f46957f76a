//! Image normalization
//!
//! - bounded "fit inside" resizing (resize)
//! - re-encoding and cover thumbnails (processor)

pub mod processor;
pub mod resize;

pub use processor::{
    create_thumbnail, process_and_optimize_image, ProcessOptions, ProcessedImage,
    DEFAULT_THUMBNAIL_SIZE, THUMBNAIL_QUALITY,
};
pub use resize::fit_within;
