//! Upload validation: size, declared type and content sniffing.

use crate::decode::{sniff, ImageKind};
use crate::validation::ValidationError;

use super::ImportOptions;

/// A file offered for import, as received from a picker or camera.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub file_name: String,
    /// MIME type reported by the source, possibly empty.
    pub declared_mime: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(
        file_name: impl Into<String>,
        declared_mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            declared_mime: declared_mime.into(),
            bytes,
        }
    }

    /// The kind the source claims, from its MIME type or else its extension.
    pub fn declared_kind(&self) -> Option<ImageKind> {
        ImageKind::from_mime(&self.declared_mime)
            .or_else(|| ImageKind::from_file_name(&self.file_name))
    }
}

/// Check a candidate and report what it actually contains.
///
/// The declared type only gates entry. When it disagrees with the leading
/// bytes, the bytes win: a JPEG saved as `photo.png` imports as JPEG.
///
/// # Errors
///
/// - `FileTooLarge` when the buffer exceeds `options.max_file_size`
/// - `UnsupportedFileType` when neither MIME type nor extension is accepted
/// - `UnrecognizedContent` when the bytes match no accepted format
pub fn validate_upload(
    candidate: &UploadCandidate,
    options: &ImportOptions,
) -> Result<ImageKind, ValidationError> {
    let size = candidate.bytes.len();
    if size > options.max_file_size {
        return Err(ValidationError::FileTooLarge {
            size,
            max: options.max_file_size,
        });
    }

    if candidate.declared_kind().is_none() {
        let declared = if candidate.declared_mime.is_empty() {
            candidate.file_name.clone()
        } else {
            candidate.declared_mime.clone()
        };
        return Err(ValidationError::UnsupportedFileType(declared));
    }

    sniff(&candidate.bytes).ok_or(ValidationError::UnrecognizedContent)
}
