//! Conversions between core types and their JavaScript representations.

use photoreport_core::collection::{PhotoEntity, PhotoId};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Map any core error to a JavaScript error string.
pub(crate) fn to_js<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Ids cross the boundary as plain numbers.
pub(crate) fn photo_id(id: u32) -> PhotoId {
    PhotoId(u64::from(id))
}

/// A photo id too large to cross the boundary as a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Photo id {0} does not fit in a JavaScript id")]
pub struct IdOverflow(pub PhotoId);

pub(crate) fn js_id(id: PhotoId) -> Result<u32, IdOverflow> {
    u32::try_from(id.0).map_err(|_| IdOverflow(id))
}

/// Lightweight view of a photo, without the image bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoSummary {
    pub id: u32,
    pub position: u32,
    pub rotation: u32,
    pub caption: String,
    pub size: usize,
}

impl TryFrom<&PhotoEntity> for PhotoSummary {
    type Error = IdOverflow;

    fn try_from(photo: &PhotoEntity) -> Result<Self, IdOverflow> {
        Ok(Self {
            id: js_id(photo.id())?,
            position: photo.position(),
            rotation: photo.rotation().degrees(),
            caption: photo.caption().to_string(),
            size: photo.original().len(),
        })
    }
}

/// A full stored record, for mirroring into the shell's storage.
#[wasm_bindgen]
pub struct JsPhotoRecord {
    id: u32,
    original: Vec<u8>,
    rotation: u32,
    caption: String,
    position: u32,
}

#[wasm_bindgen]
impl JsPhotoRecord {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Encoded JPEG bytes as a `Uint8Array` copy.
    pub fn original(&self) -> Vec<u8> {
        self.original.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> u32 {
        self.rotation
    }

    #[wasm_bindgen(getter)]
    pub fn caption(&self) -> String {
        self.caption.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn position(&self) -> u32 {
        self.position
    }
}

impl TryFrom<&PhotoEntity> for JsPhotoRecord {
    type Error = IdOverflow;

    fn try_from(photo: &PhotoEntity) -> Result<Self, IdOverflow> {
        Ok(Self {
            id: js_id(photo.id())?,
            original: photo.original().as_bytes().to_vec(),
            rotation: photo.rotation().degrees(),
            caption: photo.caption().to_string(),
            position: photo.position(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoreport_core::collection::OriginalImage;
    use photoreport_core::Caption;

    fn entity() -> PhotoEntity {
        let mut photo = PhotoEntity::new(PhotoId(7), OriginalImage::from_bytes(vec![1, 2, 3]), 2);
        photo.set_rotation_degrees(90).unwrap();
        photo.set_caption(Caption::new("Sala"));
        photo
    }

    #[test]
    fn test_summary_from_entity() {
        let summary = PhotoSummary::try_from(&entity()).unwrap();
        assert_eq!(
            summary,
            PhotoSummary {
                id: 7,
                position: 2,
                rotation: 90,
                caption: "Sala".into(),
                size: 3,
            }
        );
    }

    #[test]
    fn test_record_from_entity() {
        let record = JsPhotoRecord::try_from(&entity()).unwrap();
        assert_eq!(record.id(), 7);
        assert_eq!(record.original(), vec![1, 2, 3]);
        assert_eq!(record.rotation(), 90);
        assert_eq!(record.caption(), "Sala");
        assert_eq!(record.position(), 2);
    }

    #[test]
    fn test_id_round_trip() {
        assert_eq!(js_id(photo_id(42)), Ok(42));
        assert_eq!(js_id(photo_id(u32::MAX)), Ok(u32::MAX));
    }

    #[test]
    fn test_id_past_u32_is_rejected() {
        let big = PhotoId(u64::from(u32::MAX) + 1);
        assert_eq!(js_id(big), Err(IdOverflow(big)));

        let photo = PhotoEntity::new(big, OriginalImage::from_bytes(vec![1]), 1);
        assert!(PhotoSummary::try_from(&photo).is_err());
        assert!(JsPhotoRecord::try_from(&photo).is_err());
    }
}
