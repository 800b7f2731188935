//! Photoreport Core - photo collection and report engine
//!
//! This crate provides the core of the photo report: an ordered photo
//! collection with dense positions, metadata-only rotation resolved at export
//! time, the one-time import compression pass, and pagination of the ordered
//! photos into a PDF document.

pub mod collection;
pub mod decode;
pub mod display;
pub mod encode;
pub mod export;
pub mod import;
pub mod report;
pub mod transform;
pub mod validation;

pub use collection::{
    CollectionError, MemoryStore, OriginalImage, PhotoCollection, PhotoEntity, PhotoId,
    PhotoStore, StoreError,
};
pub use display::{resolve_display_image, ResolveError, ResolvedImage};
pub use encode::Quality;
pub use export::{
    assemble_document, export_to_sink, DirectorySink, DocumentSink, ExportError, ExportOptions,
    ExportedDocument,
};
pub use import::{
    import_batch, import_photo, prepare_original, validate_upload, HeicConverter, ImportError,
    ImportOptions, ImportOutcome, UploadCandidate,
};
pub use report::{
    format_case_id_input, pdf_filename, AssetProvider, CaseId, PageLayout, ReportHeader,
    StaticAssets,
};
pub use transform::RotationAngle;
pub use validation::{Caption, ValidationError, MAX_CAPTION_LEN};

/// Image fixtures shared by unit tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use crate::decode::DecodedImage;
    use crate::encode::{encode_image, Quality};

    /// An image whose pixels all differ, so transforms are observable.
    pub fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width.max(1)) as u8);
                pixels.push((y * 255 / height.max(1)) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        encode_image(&gradient(width, height), Quality::IMPORT).unwrap()
    }

    pub fn png_rgba_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }
}
