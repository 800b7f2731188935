//! Display-image resolution.
//!
//! A photo's rotation is metadata. Pixels are only turned here, at export
//! time, and always from the frozen original, so the result depends on the
//! final angle alone and never on the sequence of edits that produced it.

use std::sync::Arc;

use thiserror::Error;

use crate::collection::PhotoEntity;
use crate::decode::{decode_image_no_orientation, probe_dimensions, DecodeError};
use crate::encode::{encode_image, EncodeError, Quality};
use crate::transform::{rotate, RotationAngle};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// An encoded JPEG ready for layout, with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl ResolvedImage {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Produce the buffer a photo should be displayed with.
///
/// At 0° the original buffer is shared as-is. Any other angle decodes the
/// original, rotates it once and re-encodes at `quality`.
///
/// # Errors
///
/// Fails when the original cannot be decoded; the original is never handed
/// back in place of a failed rotation.
pub fn resolve_display_image(
    photo: &PhotoEntity,
    quality: Quality,
) -> Result<ResolvedImage, ResolveError> {
    let original = photo.original();
    let angle = photo.rotation();

    if angle == RotationAngle::Deg0 {
        let (width, height) = probe_dimensions(original.as_bytes())?;
        return Ok(ResolvedImage {
            bytes: original.share(),
            width,
            height,
        });
    }

    let decoded = decode_image_no_orientation(original.as_bytes())?;
    let rotated = rotate(&decoded, angle);
    let bytes = encode_image(&rotated, quality)?;

    Ok(ResolvedImage {
        bytes: bytes.into(),
        width: rotated.width,
        height: rotated.height,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::collection::{OriginalImage, PhotoId};
    use crate::test_support::jpeg_bytes;
    use proptest::prelude::*;

    fn angle_strategy() -> impl Strategy<Value = RotationAngle> {
        prop::sample::select(RotationAngle::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Only the final angle matters, whatever edits came before.
        #[test]
        fn prop_resolution_is_history_independent(
            history in prop::collection::vec(angle_strategy(), 0..6),
            last in angle_strategy(),
        ) {
            let original = OriginalImage::from_bytes(jpeg_bytes(12, 8));

            let mut edited = PhotoEntity::new(PhotoId(1), original.clone(), 1);
            for angle in history {
                edited.set_rotation(angle);
            }
            edited.set_rotation(last);

            let mut direct = PhotoEntity::new(PhotoId(2), original, 1);
            direct.set_rotation(last);

            let a = resolve_display_image(&edited, Quality::EXPORT).unwrap();
            let b = resolve_display_image(&direct, Quality::EXPORT).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
