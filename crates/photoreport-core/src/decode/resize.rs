//! Image resizing for the import path.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};
use crate::transform::{rotate, RotationAngle};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for zero target dimensions and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the image size.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Scale an image to fit `max_width` x `max_height` and canonicalise it to landscape.
///
/// Aspect ratio is preserved and the image is never upscaled. The fit is
/// always against `max_width` x `max_height` as given; if the fitted image
/// is portrait (height > width) it is then turned 90° clockwise so the
/// result is always landscape. A 3000x4000 source therefore ends up
/// 1200x900, not 1600x1200.
///
/// This runs exactly once per photo, at import. Its output is what the
/// stored original freezes.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for zero bounds or an empty image.
pub fn resize_to_bounds(
    image: &DecodedImage,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_width == 0 || max_height == 0 || image.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let (width, height) =
        calculate_bounded_dimensions(image.width, image.height, max_width, max_height);
    let scaled = resize(image, width, height, filter)?;

    if scaled.is_portrait() {
        Ok(rotate(&scaled, RotationAngle::Deg90))
    } else {
        Ok(scaled)
    }
}

/// Dimensions that fit within `max_width` x `max_height` preserving aspect ratio.
///
/// Sources already inside the bounds are returned unchanged. Scaled
/// dimensions are floored and never below 1.
pub fn calculate_bounded_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    // Integer cross-multiplication keeps the limiting edge exact.
    let (w, h) = (width as u64, height as u64);
    let (mw, mh) = (max_width as u64, max_height as u64);
    let (new_width, new_height) = if w * mh >= h * mw {
        (mw, h * mw / w)
    } else {
        (w * mh / h, mh)
    };
    (
        (new_width as u32).clamp(1, max_width),
        (new_height as u32).clamp(1, max_height),
    )
}
