//! Data models for the application
//!
//! Each sub-module holds the types of one feature area. They are plain
//! serde/utoipa types shared between the cores and the HTTP layer.

mod care;
mod image;
mod upload;
mod weather;

pub use care::*;
pub use image::*;
pub use upload::*;
pub use weather::*;
