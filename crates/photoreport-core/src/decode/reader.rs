//! Image decoding with EXIF orientation handling and alpha flattening.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Decode a JPEG, PNG or WebP image from bytes.
///
/// EXIF orientation is applied so the result is upright, and any alpha
/// channel is composited onto white.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` when the bytes cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = read_dynamic(bytes)?;
    let oriented = apply_orientation(img, orientation);
    Ok(flatten_onto_white(oriented))
}

/// Decode without applying EXIF orientation.
///
/// Used on buffers this crate encoded itself, which never carry EXIF data.
pub fn decode_image_no_orientation(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = read_dynamic(bytes)?;
    Ok(flatten_onto_white(img))
}

/// Read the pixel dimensions of an encoded image without decoding pixels.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Extract EXIF orientation value from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is present.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn read_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::CorruptedFile("empty buffer".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Composite any alpha channel over a white background.
fn flatten_onto_white(img: DynamicImage) -> DecodedImage {
    if !img.color().has_alpha() {
        return DecodedImage::from_rgb_image(img.into_rgb8());
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u32;
        for c in [r, g, b] {
            pixels.push(((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8);
        }
    }
    DecodedImage::new(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg_bytes, png_rgba_bytes};

    #[test]
    fn test_decode_jpeg() {
        let bytes = jpeg_bytes(40, 20);
        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (40, 20));
        assert_eq!(img.pixels.len(), 40 * 20 * 3);
    }

    #[test]
    fn test_decode_png_flattens_transparency_to_white() {
        let bytes = png_rgba_bytes(3, 2, [0, 0, 0, 0]);
        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert!(img.pixels.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_decode_png_opaque_keeps_color() {
        let bytes = png_rgba_bytes(1, 1, [10, 20, 30, 255]);
        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.pixel(0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_decode_garbage_is_an_error() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(
            decode_image(&[]),
            Err(DecodeError::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let bytes = jpeg_bytes(32, 32);
        let truncated = &bytes[..bytes.len() / 3];
        assert!(decode_image(truncated).is_err());
    }

    #[test]
    fn test_probe_dimensions() {
        let bytes = jpeg_bytes(64, 48);
        assert_eq!(probe_dimensions(&bytes).unwrap(), (64, 48));
        assert!(probe_dimensions(b"not an image").is_err());
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(get_orientation(&jpeg_bytes(4, 4)), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let rgb = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(rgb), Orientation::Rotate90CW);
        assert_eq!(result.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let rgb = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(rgb), Orientation::FlipHorizontal)
            .into_rgb8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
