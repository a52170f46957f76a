//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{filename}`, with the folder reduced to
//! `[A-Za-z0-9_-/]` segments.

use crate::traits::{StorageError, StorageResult};

pub const DEFAULT_FOLDER: &str = "uploads";

/// Normalize a caller-supplied folder into a safe key prefix.
///
/// Characters outside `[A-Za-z0-9_-/]` are dropped, empty and dot segments
/// are removed, and leading/trailing slashes disappear. `None` or a folder
/// that sanitizes to nothing becomes [`DEFAULT_FOLDER`].
pub fn sanitize_folder(folder: Option<&str>) -> String {
    let Some(folder) = folder else {
        return DEFAULT_FOLDER.to_string();
    };

    let cleaned: String = folder
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '_' | '-' | '/'))
        .collect();

    let segments: Vec<&str> = cleaned.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        DEFAULT_FOLDER.to_string()
    } else {
        segments.join("/")
    }
}

/// Generate a storage key for the given folder and filename.
///
/// All backends must use this so keys stay identical across them.
pub fn generate_storage_key(folder: &str, filename: &str) -> StorageResult<String> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid filename for storage key: {}",
            filename
        )));
    }

    Ok(format!("{}/{}", sanitize_folder(Some(folder)), filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_folder_defaults() {
        assert_eq!(sanitize_folder(None), "uploads");
        assert_eq!(sanitize_folder(Some("")), "uploads");
        assert_eq!(sanitize_folder(Some("///")), "uploads");
    }

    #[test]
    fn test_sanitize_folder_strips_traversal() {
        assert_eq!(sanitize_folder(Some("../../etc")), "etc");
        assert_eq!(sanitize_folder(Some("/plants/ferns/")), "plants/ferns");
        assert_eq!(sanitize_folder(Some("my plants!")), "myplants");
    }

    #[test]
    fn test_generate_storage_key() {
        assert_eq!(
            generate_storage_key("avatars", "a.jpg").unwrap(),
            "avatars/a.jpg"
        );
        assert!(generate_storage_key("avatars", "../a.jpg").is_err());
        assert!(generate_storage_key("avatars", "").is_err());
    }
}
