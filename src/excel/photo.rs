//! Data-URI photo payloads → embeddable image bytes

use crate::error::PhotoError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use std::sync::LazyLock;

static DATA_URI_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/([A-Za-z0-9.+-]+);base64,").expect("data URI pattern is valid")
});

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Image container the thumbnail is embedded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Png,
    Jpeg,
}

impl PhotoFormat {
    /// `png` → PNG, anything else (`jpeg`, `jpg`, ...) → JPEG
    pub fn from_subtype(subtype: &str) -> Self {
        if subtype.eq_ignore_ascii_case("png") {
            PhotoFormat::Png
        } else {
            PhotoFormat::Jpeg
        }
    }

    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(PhotoFormat::Png)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(PhotoFormat::Jpeg)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PhotoFormat::Png => "png",
            PhotoFormat::Jpeg => "jpeg",
        }
    }
}

/// A decoded photo ready to hand to the workbook
#[derive(Debug, Clone)]
pub struct Photo {
    pub format: PhotoFormat,
    pub bytes: Vec<u8>,
}

/// Decode a photo payload.
///
/// Accepts a full data URI or bare base64. With a data URI the declared
/// subtype picks the format and the payload must carry that format's
/// signature. Bare base64 is sniffed and falls back to JPEG.
pub fn decode_photo(payload: &str) -> Result<Photo, PhotoError> {
    let payload = payload.trim();
    let (declared, data) = match DATA_URI_PREFIX.captures(payload) {
        Some(caps) => {
            let prefix_len = caps.get(0).map_or(0, |m| m.end());
            let subtype = caps.get(1).map_or("", |m| m.as_str());
            (Some(PhotoFormat::from_subtype(subtype)), &payload[prefix_len..])
        }
        None => (None, payload),
    };

    let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(PhotoError::MissingPayload);
    }

    let bytes = STANDARD.decode(cleaned.as_bytes())?;
    if bytes.is_empty() {
        return Err(PhotoError::MissingPayload);
    }

    let format = match declared {
        Some(format) => {
            if PhotoFormat::sniff(&bytes) != Some(format) {
                return Err(PhotoError::FormatMismatch {
                    declared: format.name(),
                });
            }
            format
        }
        None => PhotoFormat::sniff(&bytes).unwrap_or(PhotoFormat::Jpeg),
    };

    Ok(Photo { format, bytes })
}
