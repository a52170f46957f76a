pub mod care;
pub mod files;
pub mod upload;
