//! The import path: the single compression pass every original receives.
//!
//! A candidate is validated, converted from HEIC/HEIF if needed, decoded
//! upright, fitted to the import bounds (portrait sources are turned to
//! landscape) and encoded once at [`Quality::IMPORT`]. The result is frozen
//! as the photo's [`OriginalImage`].

mod validate;

pub use validate::{validate_upload, UploadCandidate};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection::{CollectionError, OriginalImage, PhotoCollection, PhotoId, PhotoStore};
use crate::decode::{decode_image, resize_to_bounds, DecodeError, FilterType, ImageKind};
use crate::encode::{encode_image, EncodeError, Quality};
use crate::validation::ValidationError;

/// Largest accepted upload, in bytes.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Import tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    pub max_file_size: usize,
    pub filter: FilterType,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_width: 1600,
            max_height: 1200,
            quality: Quality::IMPORT,
            max_file_size: MAX_FILE_SIZE,
            filter: FilterType::Lanczos3,
        }
    }
}

/// Converts HEIC/HEIF containers to JPEG before they enter the pipeline.
pub trait HeicConverter: Send + Sync {
    fn convert_to_jpeg(&self, bytes: &[u8]) -> Result<Vec<u8>, String>;
}

/// Per-item result of a batch import, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub file_name: String,
    pub result: Result<PhotoId, ImportError>,
}

impl ImportOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run one candidate through validation, decode, fit and encode.
pub fn prepare_original(
    candidate: &UploadCandidate,
    options: &ImportOptions,
    converter: Option<&dyn HeicConverter>,
) -> Result<OriginalImage, ImportError> {
    let kind = validate_upload(candidate, options)?;

    let converted;
    let bytes: &[u8] = if kind == ImageKind::Heif {
        let converter = converter.ok_or(DecodeError::HeifUnavailable)?;
        converted = converter
            .convert_to_jpeg(&candidate.bytes)
            .map_err(DecodeError::HeifConversion)?;
        debug!("converted {} from HEIC/HEIF", candidate.file_name);
        &converted
    } else {
        &candidate.bytes
    };

    let decoded = decode_image(bytes)?;
    let fitted = resize_to_bounds(&decoded, options.max_width, options.max_height, options.filter)?;
    let encoded = encode_image(&fitted, options.quality)?;

    debug!(
        "prepared {}: {}x{} -> {}x{}, {} bytes",
        candidate.file_name,
        decoded.width,
        decoded.height,
        fitted.width,
        fitted.height,
        encoded.len()
    );
    Ok(OriginalImage::from_bytes(encoded))
}

/// Import one candidate and append it to the collection.
pub fn import_photo<S: PhotoStore>(
    collection: &mut PhotoCollection<S>,
    candidate: &UploadCandidate,
    options: &ImportOptions,
    converter: Option<&dyn HeicConverter>,
) -> Result<PhotoId, ImportError> {
    let original = prepare_original(candidate, options, converter)?;
    let id = collection.insert(original)?;
    info!("imported {} as photo {id}", candidate.file_name);
    Ok(id)
}

/// Import many candidates.
///
/// Candidates are prepared concurrently. Successful ones are appended in
/// input order with a single store batch. A failing item never aborts its
/// siblings; only a store failure fails the whole call.
pub fn import_batch<S: PhotoStore>(
    collection: &mut PhotoCollection<S>,
    candidates: &[UploadCandidate],
    options: &ImportOptions,
    converter: Option<&dyn HeicConverter>,
) -> Result<Vec<ImportOutcome>, ImportError> {
    let prepared: Vec<Result<OriginalImage, ImportError>> = candidates
        .par_iter()
        .map(|candidate| prepare_original(candidate, options, converter))
        .collect();

    let mut ready = Vec::new();
    let mut failed = Vec::new();
    for (idx, result) in prepared.into_iter().enumerate() {
        match result {
            Ok(original) => ready.push((idx, original)),
            Err(e) => {
                warn!("skipping {}: {e}", candidates[idx].file_name);
                failed.push((idx, e));
            }
        }
    }

    let (slots, originals): (Vec<usize>, Vec<OriginalImage>) = ready.into_iter().unzip();
    let ids = collection.insert_many(originals)?;

    let mut results: Vec<Option<Result<PhotoId, ImportError>>> = vec![None; candidates.len()];
    for (idx, id) in slots.into_iter().zip(ids) {
        results[idx] = Some(Ok(id));
    }
    for (idx, e) in failed {
        results[idx] = Some(Err(e));
    }

    let outcomes: Vec<ImportOutcome> = candidates
        .iter()
        .zip(results)
        .filter_map(|(candidate, result)| {
            result.map(|result| ImportOutcome {
                file_name: candidate.file_name.clone(),
                result,
            })
        })
        .collect();

    let imported = outcomes.iter().filter(|o| o.is_ok()).count();
    info!("imported {imported} of {} photos", candidates.len());
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::MemoryStore;
    use crate::decode::{decode_image_no_orientation, probe_dimensions};
    use crate::test_support::{jpeg_bytes, png_rgba_bytes};

    struct EchoConverter(Vec<u8>);

    impl HeicConverter for EchoConverter {
        fn convert_to_jpeg(&self, _bytes: &[u8]) -> Result<Vec<u8>, String> {
            Ok(self.0.clone())
        }
    }

    struct BrokenConverter;

    impl HeicConverter for BrokenConverter {
        fn convert_to_jpeg(&self, _bytes: &[u8]) -> Result<Vec<u8>, String> {
            Err("unsupported codec".into())
        }
    }

    fn heic_bytes() -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 24];
        bytes.extend_from_slice(b"ftypheic");
        bytes.extend_from_slice(&[0; 12]);
        bytes
    }

    fn empty_collection() -> PhotoCollection<MemoryStore> {
        PhotoCollection::open(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_prepare_downscales_landscape() {
        let c = UploadCandidate::new("a.jpg", "image/jpeg", jpeg_bytes(3200, 1800));
        let original = prepare_original(&c, &ImportOptions::default(), None).unwrap();
        assert_eq!(probe_dimensions(original.as_bytes()).unwrap(), (1600, 900));
    }

    #[test]
    fn test_prepare_turns_portrait_to_landscape() {
        let c = UploadCandidate::new("p.jpg", "image/jpeg", jpeg_bytes(60, 90));
        let original = prepare_original(&c, &ImportOptions::default(), None).unwrap();
        assert_eq!(probe_dimensions(original.as_bytes()).unwrap(), (90, 60));
    }

    #[test]
    fn test_prepare_never_upscales() {
        let c = UploadCandidate::new("s.jpg", "image/jpeg", jpeg_bytes(64, 48));
        let original = prepare_original(&c, &ImportOptions::default(), None).unwrap();
        assert_eq!(probe_dimensions(original.as_bytes()).unwrap(), (64, 48));
    }

    #[test]
    fn test_prepare_flattens_png_to_jpeg() {
        let c = UploadCandidate::new("t.png", "image/png", png_rgba_bytes(4, 2, [0, 0, 0, 0]));
        let original = prepare_original(&c, &ImportOptions::default(), None).unwrap();
        assert_eq!(&original.as_bytes()[..3], &[0xFF, 0xD8, 0xFF]);
        let decoded = decode_image_no_orientation(original.as_bytes()).unwrap();
        assert!(decoded.pixels.iter().all(|&b| b > 240));
    }

    #[test]
    fn test_heic_without_converter() {
        let c = UploadCandidate::new("h.heic", "image/heic", heic_bytes());
        assert_eq!(
            prepare_original(&c, &ImportOptions::default(), None),
            Err(ImportError::Decode(DecodeError::HeifUnavailable))
        );
    }

    #[test]
    fn test_heic_with_converter() {
        let c = UploadCandidate::new("h.heic", "image/heic", heic_bytes());
        let converter = EchoConverter(jpeg_bytes(20, 10));
        let original = prepare_original(&c, &ImportOptions::default(), Some(&converter)).unwrap();
        assert_eq!(probe_dimensions(original.as_bytes()).unwrap(), (20, 10));
    }

    #[test]
    fn test_heic_conversion_failure() {
        let c = UploadCandidate::new("h.heic", "image/heic", heic_bytes());
        assert_eq!(
            prepare_original(&c, &ImportOptions::default(), Some(&BrokenConverter)),
            Err(ImportError::Decode(DecodeError::HeifConversion(
                "unsupported codec".into()
            )))
        );
    }

    #[test]
    fn test_import_photo_appends() {
        let mut collection = empty_collection();
        let c = UploadCandidate::new("a.jpg", "image/jpeg", jpeg_bytes(16, 16));
        let first = import_photo(&mut collection, &c, &ImportOptions::default(), None).unwrap();
        let second = import_photo(&mut collection, &c, &ImportOptions::default(), None).unwrap();
        assert_eq!(collection.get(first).unwrap().position(), 1);
        assert_eq!(collection.get(second).unwrap().position(), 2);
    }

    #[test]
    fn test_import_photo_rejection_leaves_collection_untouched() {
        let mut collection = empty_collection();
        let c = UploadCandidate::new("a.txt", "text/plain", jpeg_bytes(16, 16));
        assert!(matches!(
            import_photo(&mut collection, &c, &ImportOptions::default(), None),
            Err(ImportError::Validation(_))
        ));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_batch_reports_per_item_and_keeps_order() {
        let mut collection = empty_collection();
        let candidates = vec![
            UploadCandidate::new("1.jpg", "image/jpeg", jpeg_bytes(16, 16)),
            UploadCandidate::new("2.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0x00]),
            UploadCandidate::new("3.png", "image/png", jpeg_bytes(24, 12)),
            UploadCandidate::new("4.heic", "image/heic", heic_bytes()),
        ];

        let outcomes =
            import_batch(&mut collection, &candidates, &ImportOptions::default(), None).unwrap();

        let names: Vec<&str> = outcomes.iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(names, ["1.jpg", "2.jpg", "3.png", "4.heic"]);
        assert!(outcomes[0].is_ok());
        assert!(matches!(outcomes[1].result, Err(ImportError::Decode(_))));
        assert!(outcomes[2].is_ok());
        assert_eq!(
            outcomes[3].result,
            Err(ImportError::Decode(DecodeError::HeifUnavailable))
        );

        assert_eq!(collection.len(), 2);
        let first = outcomes[0].result.clone().unwrap();
        let third = outcomes[2].result.clone().unwrap();
        assert_eq!(collection.get(first).unwrap().position(), 1);
        assert_eq!(collection.get(third).unwrap().position(), 2);
    }

    #[test]
    fn test_batch_of_nothing() {
        let mut collection = empty_collection();
        let outcomes = import_batch(&mut collection, &[], &ImportOptions::default(), None).unwrap();
        assert!(outcomes.is_empty());
        assert!(collection.is_empty());
    }
}
