//! The photo entity and its immutable original buffer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::transform::RotationAngle;
use crate::validation::{Caption, ValidationError};

/// Opaque photo identifier, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u64);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Encoded image buffer frozen at import.
///
/// Cloning shares the buffer; there is no way to mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginalImage(Arc<[u8]>);

impl OriginalImage {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        OriginalImage(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// A second handle to the same buffer.
    pub fn share(&self) -> Arc<[u8]> {
        Arc::clone(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A photo in the report: original pixels, display intent, caption and rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoEntity {
    id: PhotoId,
    original: OriginalImage,
    #[serde(default)]
    rotation: RotationAngle,
    #[serde(default)]
    caption: Caption,
    position: u32,
}

impl PhotoEntity {
    pub fn new(id: PhotoId, original: OriginalImage, position: u32) -> Self {
        Self {
            id,
            original,
            rotation: RotationAngle::Deg0,
            caption: Caption::default(),
            position,
        }
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn original(&self) -> &OriginalImage {
        &self.original
    }

    pub fn rotation(&self) -> RotationAngle {
        self.rotation
    }

    pub fn caption(&self) -> &Caption {
        &self.caption
    }

    /// 1-based rank within the collection.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Record a new display angle. Metadata only; no pixels are touched.
    ///
    /// Returns whether the angle changed.
    pub fn set_rotation(&mut self, angle: RotationAngle) -> bool {
        if self.rotation == angle {
            return false;
        }
        self.rotation = angle;
        true
    }

    /// Validate a raw degree value, then record it.
    pub fn set_rotation_degrees(&mut self, degrees: u32) -> Result<bool, ValidationError> {
        let angle = RotationAngle::try_from(degrees)?;
        Ok(self.set_rotation(angle))
    }

    /// Returns whether the caption changed.
    pub fn set_caption(&mut self, caption: Caption) -> bool {
        if self.caption == caption {
            return false;
        }
        self.caption = caption;
        true
    }

    pub(crate) fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> PhotoEntity {
        PhotoEntity::new(PhotoId(1), OriginalImage::from_bytes(vec![1u8, 2, 3]), 1)
    }

    #[test]
    fn test_new_entity_defaults() {
        let e = entity();
        assert_eq!(e.rotation(), RotationAngle::Deg0);
        assert!(e.caption().is_empty());
        assert_eq!(e.position(), 1);
        assert_eq!(e.original().as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_set_rotation_reports_change() {
        let mut e = entity();
        assert!(e.set_rotation(RotationAngle::Deg90));
        assert!(!e.set_rotation(RotationAngle::Deg90));
        assert_eq!(e.rotation(), RotationAngle::Deg90);
    }

    #[test]
    fn test_set_rotation_degrees_rejects_invalid_without_mutation() {
        let mut e = entity();
        e.set_rotation(RotationAngle::Deg180);
        assert_eq!(
            e.set_rotation_degrees(45),
            Err(ValidationError::InvalidAngle(45))
        );
        assert_eq!(e.rotation(), RotationAngle::Deg180);
    }

    #[test]
    fn test_rotation_never_touches_original() {
        let mut e = entity();
        let before = e.original().share();
        for deg in [90, 180, 270, 0, 90] {
            e.set_rotation_degrees(deg).unwrap();
        }
        assert!(Arc::ptr_eq(&before, &e.original().share()));
    }

    #[test]
    fn test_set_caption() {
        let mut e = entity();
        assert!(e.set_caption(Caption::new("Sala")));
        assert!(!e.set_caption(Caption::new("Sala")));
        assert_eq!(e.caption().as_str(), "Sala");
    }

    #[test]
    fn test_photo_id_display() {
        assert_eq!(PhotoId(42).to_string(), "#42");
    }
}
