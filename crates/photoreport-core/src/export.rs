//! End-to-end export: resolve, paginate, render, name, deliver.
//!
//! An export either produces a complete document or fails; nothing partial
//! ever reaches a sink.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection::{PhotoEntity, PhotoId};
use crate::display::{resolve_display_image, ResolveError, ResolvedImage};
use crate::encode::Quality;
use crate::report::{
    paginate, render_pdf, AssetProvider, LayoutError, PageLayout, PhotoSlot, RenderError,
    ReportHeader,
};
use crate::validation::ValidationError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportError {
    #[error("Cannot export an empty report")]
    EmptyReport,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to prepare photo {id} at position {position}: {source}")]
    Resolve {
        id: PhotoId,
        position: u32,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Document sink failed: {0}")]
    Sink(String),
}

/// Export tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Encoder quality for rotated photos.
    pub quality: Quality,
    pub layout: PageLayout,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: Quality::EXPORT,
            layout: PageLayout::default(),
        }
    }
}

/// A finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Receives finished documents: a download, a share sheet, an upload.
pub trait DocumentSink {
    type Error: std::error::Error;

    fn deliver(&mut self, bytes: &[u8], filename: &str) -> Result<(), Self::Error>;
}

/// Writes documents into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentSink for DirectorySink {
    type Error = io::Error;

    fn deliver(&mut self, bytes: &[u8], filename: &str) -> Result<(), io::Error> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Build the report document for `photos`.
///
/// Display images are resolved concurrently and re-joined in input order.
/// The first failure aborts the export.
pub fn assemble_document(
    photos: &[PhotoEntity],
    header: &ReportHeader,
    assets: &dyn AssetProvider,
    options: &ExportOptions,
) -> Result<ExportedDocument, ExportError> {
    if photos.is_empty() {
        return Err(ExportError::EmptyReport);
    }
    options.layout.validate()?;

    let resolved: Vec<ResolvedImage> = photos
        .par_iter()
        .map(|photo| {
            resolve_display_image(photo, options.quality).map_err(|source| ExportError::Resolve {
                id: photo.id(),
                position: photo.position(),
                source,
            })
        })
        .collect::<Result<_, _>>()?;

    let slots: Vec<PhotoSlot> = photos
        .iter()
        .zip(&resolved)
        .map(|(photo, image)| PhotoSlot {
            id: photo.id(),
            position: photo.position(),
            width: image.width,
            height: image.height,
            caption: photo.caption().to_string(),
        })
        .collect();

    let pages = paginate(&slots, header, assets, &options.layout)?;
    let bytes = render_pdf(&pages, &resolved, assets, &options.layout, options.quality)?;
    let filename = header.case_id.pdf_filename();

    info!(
        "assembled {filename}: {} photos on {} pages, {} bytes",
        photos.len(),
        pages.len(),
        bytes.len()
    );

    Ok(ExportedDocument {
        filename,
        bytes,
        page_count: pages.len(),
    })
}

/// Assemble a document and hand it to `sink`.
///
/// The sink is only called once the whole document exists.
pub fn export_to_sink<K: DocumentSink>(
    photos: &[PhotoEntity],
    header: &ReportHeader,
    assets: &dyn AssetProvider,
    options: &ExportOptions,
    sink: &mut K,
) -> Result<ExportedDocument, ExportError> {
    let document = assemble_document(photos, header, assets, options)?;
    sink.deliver(&document.bytes, &document.filename)
        .map_err(|e| ExportError::Sink(e.to_string()))?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{MemoryStore, OriginalImage, PhotoCollection};
    use crate::report::StaticAssets;
    use crate::test_support::jpeg_bytes;

    #[derive(Default)]
    struct RecordingSink {
        delivered: Vec<(String, usize)>,
    }

    impl DocumentSink for RecordingSink {
        type Error = io::Error;

        fn deliver(&mut self, bytes: &[u8], filename: &str) -> Result<(), io::Error> {
            self.delivered.push((filename.to_string(), bytes.len()));
            Ok(())
        }
    }

    struct FailingSink;

    impl DocumentSink for FailingSink {
        type Error = io::Error;

        fn deliver(&mut self, _bytes: &[u8], _filename: &str) -> Result<(), io::Error> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "share cancelled"))
        }
    }

    fn header() -> ReportHeader {
        ReportHeader::new("AB1234/25", "1", "3").unwrap()
    }

    fn collection(n: usize) -> PhotoCollection<MemoryStore> {
        let mut c = PhotoCollection::open(MemoryStore::new()).unwrap();
        c.insert_many(
            (0..n)
                .map(|_| OriginalImage::from_bytes(jpeg_bytes(40, 30)))
                .collect(),
        )
        .unwrap();
        c
    }

    #[test]
    fn test_assemble_five_photos() {
        let mut c = collection(5);
        let ids: Vec<PhotoId> = c.list().map(PhotoEntity::id).collect();
        c.set_rotation(ids[1], 90).unwrap();
        c.set_caption(ids[0], "Fachada").unwrap();

        let doc = assemble_document(
            c.as_slice(),
            &header(),
            &StaticAssets::default(),
            &ExportOptions::default(),
        )
        .unwrap();

        assert_eq!(doc.filename, "AB1234-25_relatorio-fotografico.pdf");
        assert_eq!(doc.page_count, 3);
        assert!(doc.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_empty_export_is_rejected() {
        let c = collection(0);
        assert_eq!(
            assemble_document(
                c.as_slice(),
                &header(),
                &StaticAssets::default(),
                &ExportOptions::default()
            ),
            Err(ExportError::EmptyReport)
        );
    }

    #[test]
    fn test_one_bad_photo_aborts_everything() {
        let mut c = collection(2);
        let bad = c.insert(OriginalImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0x00])).unwrap();
        c.set_rotation(bad, 180).unwrap();

        let mut sink = RecordingSink::default();
        let result = export_to_sink(
            c.as_slice(),
            &header(),
            &StaticAssets::default(),
            &ExportOptions::default(),
            &mut sink,
        );

        match result {
            Err(ExportError::Resolve { id, position, .. }) => {
                assert_eq!(id, bad);
                assert_eq!(position, 3);
            }
            other => panic!("expected a resolve failure, got {other:?}"),
        }
        assert!(sink.delivered.is_empty());
    }

    #[test]
    fn test_sink_receives_finished_document() {
        let c = collection(1);
        let mut sink = RecordingSink::default();
        let doc = export_to_sink(
            c.as_slice(),
            &header(),
            &StaticAssets::default(),
            &ExportOptions::default(),
            &mut sink,
        )
        .unwrap();
        assert_eq!(sink.delivered, vec![(doc.filename.clone(), doc.bytes.len())]);
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let c = collection(1);
        let result = export_to_sink(
            c.as_slice(),
            &header(),
            &StaticAssets::default(),
            &ExportOptions::default(),
            &mut FailingSink,
        );
        assert_eq!(result, Err(ExportError::Sink("share cancelled".to_string())));
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));
        let c = collection(2);
        let doc = export_to_sink(
            c.as_slice(),
            &header(),
            &StaticAssets::default(),
            &ExportOptions::default(),
            &mut sink,
        )
        .unwrap();

        let written = fs::read(sink.dir().join(&doc.filename)).unwrap();
        assert_eq!(written, doc.bytes);
    }

    #[test]
    fn test_invalid_layout_is_rejected_before_resolving() {
        let c = collection(1);
        let options = ExportOptions {
            layout: PageLayout {
                photos_per_page: 0,
                ..PageLayout::default()
            },
            ..ExportOptions::default()
        };
        assert!(matches!(
            assemble_document(c.as_slice(), &header(), &StaticAssets::default(), &options),
            Err(ExportError::Layout(LayoutError::InvalidTemplate(_)))
        ));
    }
}
