//! GreenMate Storage Library
//!
//! Storage abstraction for normalized uploads, with S3 and local filesystem
//! backends.
//!
//! # Storage key format
//!
//! Every backend stores objects under `{folder}/{filename}`. Folders are
//! sanitized by the `keys` module (default `uploads`); keys never contain `..`
//! or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use greenmate_core::StorageBackend;
pub use keys::{generate_storage_key, sanitize_folder, DEFAULT_FOLDER};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
