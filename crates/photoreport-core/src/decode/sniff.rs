//! Content-based image format detection.
//!
//! Formats are recognised by the magic numbers at the start of the buffer,
//! never by a file name or declared MIME type.

use serde::{Deserialize, Serialize};

mod magic {
    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// WebP: RIFF....WEBP
    pub const RIFF: &[u8] = b"RIFF";
    pub const WEBP: &[u8] = b"WEBP";

    /// ISO-BMFF file type box, at offset 4.
    pub const FTYP: &[u8] = b"ftyp";

    /// Major brands written by HEIC/HEIF encoders.
    pub const HEIF_BRANDS: &[&[u8; 4]] = &[
        b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
    ];
}

/// Image formats accepted at import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
    /// HEIC/HEIF; must be converted to JPEG before decoding.
    Heif,
}

impl ImageKind {
    /// Canonical MIME type.
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::WebP => "image/webp",
            ImageKind::Heif => "image/heic",
        }
    }

    /// Map a declared MIME type to a kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::WebP),
            "image/heic" | "image/heif" | "image/heic-sequence" | "image/heif-sequence" => {
                Some(ImageKind::Heif)
            }
            _ => None,
        }
    }

    /// Map a file name extension to a kind.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "webp" => Some(ImageKind::WebP),
            "heic" | "heif" => Some(ImageKind::Heif),
            _ => None,
        }
    }
}

/// Detect the image format from the leading bytes of a buffer.
pub fn sniff(data: &[u8]) -> Option<ImageKind> {
    if data.starts_with(magic::JPEG) {
        return Some(ImageKind::Jpeg);
    }
    if data.starts_with(magic::PNG) {
        return Some(ImageKind::Png);
    }
    if data.len() >= 12 && data.starts_with(magic::RIFF) && &data[8..12] == magic::WEBP {
        return Some(ImageKind::WebP);
    }
    if data.len() >= 12 && &data[4..8] == magic::FTYP {
        let brand = &data[8..12];
        if magic::HEIF_BRANDS.iter().any(|b| b.as_slice() == brand) {
            return Some(ImageKind::Heif);
        }
    }
    None
}
