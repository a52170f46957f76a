//! Magic-number sniffing for the accepted upload types.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::validator::ValidationError;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const RIFF_MAGIC: &[u8; 4] = b"RIFF";
const WEBP_MAGIC: &[u8; 4] = b"WEBP";

/// The image types an upload may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedMime {
    Jpeg,
    Png,
    Webp,
}

impl SupportedMime {
    /// Parse a declared content type against the allow-list.
    ///
    /// Matching ignores case and any `; param=value` suffix. `image/jpg` is
    /// accepted as an alias of `image/jpeg`.
    pub fn parse(declared: &str) -> Result<Self, ValidationError> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Ok(SupportedMime::Jpeg),
            "image/png" => Ok(SupportedMime::Png),
            "image/webp" => Ok(SupportedMime::Webp),
            _ => Err(ValidationError::UnsupportedType {
                content_type: declared.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SupportedMime::Jpeg => "image/jpeg",
            SupportedMime::Png => "image/png",
            SupportedMime::Webp => "image/webp",
        }
    }

    /// Whether the leading bytes carry this type's signature.
    pub fn matches(self, buffer: &[u8]) -> bool {
        match self {
            SupportedMime::Jpeg => buffer.starts_with(&JPEG_MAGIC),
            SupportedMime::Png => buffer.starts_with(&PNG_MAGIC),
            SupportedMime::Webp => {
                buffer.len() >= 12 && &buffer[0..4] == RIFF_MAGIC && &buffer[8..12] == WEBP_MAGIC
            }
        }
    }
}

impl Display for SupportedMime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Identify the true type of a buffer from its signature, if it is one we accept.
pub fn detect_signature(buffer: &[u8]) -> Option<SupportedMime> {
    [SupportedMime::Jpeg, SupportedMime::Png, SupportedMime::Webp]
        .into_iter()
        .find(|mime| mime.matches(buffer))
}

/// True only when the declared type is allowed and the buffer carries its signature.
pub fn validate_type(buffer: &[u8], declared_mime: &str) -> bool {
    SupportedMime::parse(declared_mime)
        .map(|mime| mime.matches(buffer))
        .unwrap_or(false)
}
