//! Right-angle rotation.
//!
//! Rotation uses inverse mapping: for each pixel in the output canvas we
//! compute the source pixel it comes from. For right angles the mapping is
//! exact, so no interpolation happens and pixel values are carried over
//! unchanged.
//!
//! For a clockwise rotation of a `w` x `h` source:
//! ```text
//!  90°: src = (dst_y,         h - 1 - dst_x)    canvas h x w
//! 180°: src = (w - 1 - dst_x, h - 1 - dst_y)    canvas w x h
//! 270°: src = (w - 1 - dst_y, dst_x)            canvas h x w
//! ```

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::validation::ValidationError;

/// Canvas background painted before any pixels are drawn.
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// One of the four right-angle display orientations, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RotationAngle {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    /// All valid angles in ascending order.
    pub const ALL: [RotationAngle; 4] = [
        RotationAngle::Deg0,
        RotationAngle::Deg90,
        RotationAngle::Deg180,
        RotationAngle::Deg270,
    ];

    /// The angle in degrees.
    pub fn degrees(self) -> u32 {
        match self {
            RotationAngle::Deg0 => 0,
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }

    /// Returns true if rotating by this angle swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, RotationAngle::Deg90 | RotationAngle::Deg270)
    }

    /// Dimensions of a `width` x `height` canvas after rotation.
    pub fn rotated_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Compose two rotations, reduced modulo 360.
    pub fn then(self, other: RotationAngle) -> RotationAngle {
        match (self.degrees() + other.degrees()) % 360 {
            90 => RotationAngle::Deg90,
            180 => RotationAngle::Deg180,
            270 => RotationAngle::Deg270,
            _ => RotationAngle::Deg0,
        }
    }
}

impl TryFrom<u32> for RotationAngle {
    type Error = ValidationError;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(RotationAngle::Deg0),
            90 => Ok(RotationAngle::Deg90),
            180 => Ok(RotationAngle::Deg180),
            270 => Ok(RotationAngle::Deg270),
            other => Err(ValidationError::InvalidAngle(other)),
        }
    }
}

impl From<RotationAngle> for u32 {
    fn from(angle: RotationAngle) -> Self {
        angle.degrees()
    }
}

/// Rotate an image clockwise by a right angle around its center.
///
/// The output canvas swaps width and height for 90° and 270°. The canvas is
/// filled with [`BACKGROUND`] before the source pixels are drawn.
pub fn rotate(image: &DecodedImage, angle: RotationAngle) -> DecodedImage {
    if angle == RotationAngle::Deg0 {
        return image.clone();
    }

    let (src_w, src_h) = (image.width, image.height);
    let (dst_w, dst_h) = angle.rotated_dimensions(src_w, src_h);
    let mut output = DecodedImage::filled(dst_w, dst_h, BACKGROUND);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let (src_x, src_y) = match angle {
                RotationAngle::Deg90 => (dst_y, src_h - 1 - dst_x),
                RotationAngle::Deg180 => (src_w - 1 - dst_x, src_h - 1 - dst_y),
                RotationAngle::Deg270 => (src_w - 1 - dst_y, dst_x),
                RotationAngle::Deg0 => (dst_x, dst_y),
            };

            let src_idx = ((src_y as usize) * (src_w as usize) + src_x as usize) * 3;
            let dst_idx = ((dst_y as usize) * (dst_w as usize) + dst_x as usize) * 3;
            output.pixels[dst_idx..dst_idx + 3]
                .copy_from_slice(&image.pixels[src_idx..src_idx + 3]);
        }
    }

    output
}
