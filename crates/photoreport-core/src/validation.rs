//! Boundary validation shared by the collection, import and report paths.
//!
//! Validation always happens before any state is touched; a `ValidationError`
//! means nothing changed.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum caption length, in UTF-16 code units.
pub const MAX_CAPTION_LEN: usize = 78;

/// Input rejected at a boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid rotation angle {0}: must be 0, 90, 180 or 270")]
    InvalidAngle(u32),

    #[error("Position {position} out of range 1..={len}")]
    PositionOutOfRange { position: u32, len: u32 },

    #[error("Caption is {len} characters long, maximum is {max}")]
    CaptionTooLong { len: usize, max: usize },

    #[error("Invalid case identifier {0:?}: expected AA0000/00")]
    InvalidCaseId(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large: {size} bytes, maximum is {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("File content is not a recognised image")]
    UnrecognizedContent,
}

/// Photo caption, never longer than [`MAX_CAPTION_LEN`].
///
/// Length is measured in UTF-16 code units, the unit text-entry fields
/// count in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Caption(String);

impl Caption {
    /// Build a caption, truncating anything past the bound.
    ///
    /// Truncation never splits a character.
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if let Some(cut) = truncation_point(&text) {
            text.truncate(cut);
        }
        Caption(text)
    }

    /// Build a caption, rejecting text over the bound.
    pub fn try_new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        let len = utf16_len(&text);
        if len > MAX_CAPTION_LEN {
            return Err(ValidationError::CaptionTooLong {
                len,
                max: MAX_CAPTION_LEN,
            });
        }
        Ok(Caption(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only the empty string counts; whitespace is caption text.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        utf16_len(&self.0)
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Caption {
    fn from(text: String) -> Self {
        Caption::new(text)
    }
}

impl From<&str> for Caption {
    fn from(text: &str) -> Self {
        Caption::new(text)
    }
}

impl From<Caption> for String {
    fn from(caption: Caption) -> Self {
        caption.0
    }
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset where `text` must be cut, or `None` if it already fits.
fn truncation_point(text: &str) -> Option<usize> {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > MAX_CAPTION_LEN {
            return Some(idx);
        }
    }
    None
}

/// Require a non-blank string field.
pub(crate) fn require_non_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any input yields a caption within the bound that is a prefix of the input.
        #[test]
        fn prop_caption_is_bounded_prefix(text in ".{0,200}") {
            let c = Caption::new(text.clone());
            prop_assert!(c.len() <= MAX_CAPTION_LEN);
            prop_assert!(text.starts_with(c.as_str()));
        }
    }
}
