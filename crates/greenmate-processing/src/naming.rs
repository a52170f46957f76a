//! Generated filenames for stored images.
//!
//! Format: `{unix_millis}-{md5(original_name + millis)[..8]}-{uuid_v4}{ext}`.

use chrono::Utc;
use greenmate_core::OutputFormat;
use md5::{Digest, Md5};
use uuid::Uuid;

pub const THUMBNAIL_PREFIX: &str = "thumb-";

const HASH_PREFIX_LEN: usize = 8;

/// Generate a unique filename for a normalized image.
pub fn generate_filename(original_name: &str, format: OutputFormat) -> String {
    filename_at(
        original_name,
        Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        format.extension(),
    )
}

/// Generate a unique filename for a JPEG thumbnail.
pub fn generate_thumbnail_filename(original_name: &str) -> String {
    format!(
        "{}{}",
        THUMBNAIL_PREFIX,
        generate_filename(original_name, OutputFormat::Jpeg)
    )
}

fn filename_at(original_name: &str, millis: i64, id: Uuid, extension: &str) -> String {
    let digest = Md5::digest(format!("{}{}", original_name, millis).as_bytes());
    let hash = hex::encode(digest);
    format!(
        "{}-{}-{}{}",
        millis,
        &hash[..HASH_PREFIX_LEN],
        id,
        extension
    )
}
