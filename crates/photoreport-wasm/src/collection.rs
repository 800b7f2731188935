//! Photo collection bindings.
//!
//! The shell loads its stored records through [`JsCollectionLoader`], then
//! works against the returned [`JsPhotoCollection`]. Every write is journaled;
//! the shell drains the journal with `take_changes()` and mirrors each entry
//! into its own key-value storage, reading full records with `record(id)`.
//!
//! # Example
//!
//! ```typescript
//! const loader = new JsCollectionLoader();
//! for (const r of await db.getAll()) {
//!   loader.add_record(r.id, r.original, r.rotation, r.caption, r.position);
//! }
//! const photos = loader.open();
//!
//! const id = photos.import_photo(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! photos.set_rotation(id, 90);
//! await mirror(photos.take_changes());
//! ```

use photoreport_core::collection::{
    JournalEntry, JournalStore, OriginalImage, PhotoCollection, PhotoEntity, PhotoId,
};
use photoreport_core::{
    assemble_document, import_batch, import_photo, Caption, ExportOptions, ImportOptions,
    ReportHeader, StaticAssets, UploadCandidate,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::report::JsExportedDocument;
use crate::types::{js_id, photo_id, to_js, IdOverflow, JsPhotoRecord, PhotoSummary};

/// Collects stored records before the collection is opened.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsCollectionLoader {
    records: Vec<PhotoEntity>,
}

#[wasm_bindgen]
impl JsCollectionLoader {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one stored record. The rotation must be a right angle.
    pub fn add_record(
        &mut self,
        id: u32,
        original: Vec<u8>,
        rotation: u32,
        caption: String,
        position: u32,
    ) -> Result<(), JsValue> {
        let original = OriginalImage::from_bytes(original);
        let mut photo = PhotoEntity::new(photo_id(id), original, position);
        photo.set_rotation_degrees(rotation).map_err(to_js)?;
        photo.set_caption(Caption::new(caption));
        self.records.push(photo);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Open the collection. Non-dense stored positions are repaired and the
    /// repairs show up in the first `take_changes()`.
    pub fn open(self) -> Result<JsPhotoCollection, JsValue> {
        let mut store = JournalStore::new();
        store.preload(self.records);
        PhotoCollection::open(store)
            .map(|inner| JsPhotoCollection {
                inner,
                import_options: ImportOptions::default(),
                export_options: ExportOptions::default(),
            })
            .map_err(to_js)
    }
}

/// One file offered to `import_batch`.
#[derive(Deserialize)]
struct JsUpload {
    file_name: String,
    #[serde(default)]
    mime: String,
    bytes: Vec<u8>,
}

#[derive(Serialize)]
struct JsImportOutcome {
    file_name: String,
    id: Option<u32>,
    error: Option<String>,
}

#[derive(Serialize)]
struct JsChange {
    kind: &'static str,
    id: Option<u32>,
}

impl TryFrom<JournalEntry> for JsChange {
    type Error = IdOverflow;

    fn try_from(entry: JournalEntry) -> Result<Self, IdOverflow> {
        Ok(match entry {
            JournalEntry::Put(id) => JsChange {
                kind: "put",
                id: Some(js_id(id)?),
            },
            JournalEntry::Delete(id) => JsChange {
                kind: "delete",
                id: Some(js_id(id)?),
            },
            JournalEntry::Clear => JsChange {
                kind: "clear",
                id: None,
            },
        })
    }
}

/// An ordered photo collection.
#[wasm_bindgen]
pub struct JsPhotoCollection {
    inner: PhotoCollection<JournalStore>,
    import_options: ImportOptions,
    export_options: ExportOptions,
}

#[wasm_bindgen]
impl JsPhotoCollection {
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Replace import tunables with a partial options object.
    pub fn configure_import(&mut self, options: JsValue) -> Result<(), JsValue> {
        self.import_options = serde_wasm_bindgen::from_value(options).map_err(to_js)?;
        Ok(())
    }

    /// Replace export tunables with a partial options object.
    pub fn configure_export(&mut self, options: JsValue) -> Result<(), JsValue> {
        self.export_options = serde_wasm_bindgen::from_value(options).map_err(to_js)?;
        Ok(())
    }

    /// Import one file and append it. HEIC/HEIF must be converted by the
    /// shell first; it is rejected here.
    pub fn import_photo(
        &mut self,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    ) -> Result<u32, JsValue> {
        self.reserve_ids(1).map_err(to_js)?;
        let candidate = UploadCandidate::new(file_name, mime, bytes);
        let id = import_photo(&mut self.inner, &candidate, &self.import_options, None)
            .map_err(to_js)?;
        js_id(id).map_err(to_js)
    }

    /// Import an array of `{ file_name, mime, bytes }` objects.
    ///
    /// Returns `{ file_name, id, error }` per input, in input order.
    pub fn import_batch(&mut self, uploads: JsValue) -> Result<JsValue, JsValue> {
        let uploads: Vec<JsUpload> = serde_wasm_bindgen::from_value(uploads).map_err(to_js)?;
        let candidates: Vec<UploadCandidate> = uploads
            .into_iter()
            .map(|u| UploadCandidate::new(u.file_name, u.mime, u.bytes))
            .collect();
        self.reserve_ids(candidates.len()).map_err(to_js)?;

        let outcomes = import_batch(&mut self.inner, &candidates, &self.import_options, None)
            .map_err(to_js)?;
        let outcomes = outcomes
            .into_iter()
            .map(|o| {
                let (id, error) = match o.result {
                    Ok(id) => (Some(js_id(id)?), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                Ok(JsImportOutcome {
                    file_name: o.file_name,
                    id,
                    error,
                })
            })
            .collect::<Result<Vec<_>, IdOverflow>>()
            .map_err(to_js)?;
        serde_wasm_bindgen::to_value(&outcomes).map_err(to_js)
    }

    /// Move a photo to a 1-based position.
    pub fn move_photo(&mut self, id: u32, position: u32) -> Result<(), JsValue> {
        self.inner.move_to(photo_id(id), position).map_err(to_js)
    }

    /// Remove a photo. Returns `false` if it was not present.
    pub fn remove(&mut self, id: u32) -> Result<bool, JsValue> {
        self.inner.remove(photo_id(id)).map_err(to_js)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.inner.clear().map_err(to_js)
    }

    /// Set a caption; text past the bound is cut off.
    pub fn set_caption(&mut self, id: u32, caption: &str) -> Result<(), JsValue> {
        self.inner.set_caption(photo_id(id), caption).map_err(to_js)
    }

    /// Set the display rotation (0, 90, 180 or 270).
    pub fn set_rotation(&mut self, id: u32, degrees: u32) -> Result<(), JsValue> {
        self.inner.set_rotation(photo_id(id), degrees).map_err(to_js)
    }

    /// Photo summaries in position order.
    pub fn photos(&self) -> Result<JsValue, JsValue> {
        let summaries = self
            .inner
            .list()
            .map(PhotoSummary::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js)?;
        serde_wasm_bindgen::to_value(&summaries).map_err(to_js)
    }

    /// The stored original, for thumbnails. Rotation is applied by the
    /// shell with a CSS transform.
    pub fn original_image(&self, id: u32) -> Option<Vec<u8>> {
        self.inner
            .get(photo_id(id))
            .map(|photo| photo.original().as_bytes().to_vec())
    }

    /// The full record for a photo.
    pub fn record(&self, id: u32) -> Result<Option<JsPhotoRecord>, JsValue> {
        self.inner
            .get(photo_id(id))
            .map(JsPhotoRecord::try_from)
            .transpose()
            .map_err(to_js)
    }

    /// Drain the write journal as `{ kind, id }` entries, oldest first.
    pub fn take_changes(&mut self) -> Result<JsValue, JsValue> {
        let changes = self
            .inner
            .store_mut()
            .drain()
            .into_iter()
            .map(JsChange::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js)?;
        serde_wasm_bindgen::to_value(&changes).map_err(to_js)
    }

    /// Build the report PDF.
    pub fn export_report(
        &self,
        case_id: &str,
        version: &str,
        group: &str,
        logo: Option<Vec<u8>>,
    ) -> Result<JsExportedDocument, JsValue> {
        let header = ReportHeader::new(case_id, version, group).map_err(to_js)?;
        let mut assets = StaticAssets::default();
        assets.logo = logo;
        assemble_document(self.inner.as_slice(), &header, &assets, &self.export_options)
            .map(JsExportedDocument::from)
            .map_err(to_js)
    }
}

impl JsPhotoCollection {
    /// Check that `count` more photos can be given ids that fit in a `u32`.
    fn reserve_ids(&self, count: usize) -> Result<(), IdOverflow> {
        let Some(extra) = count.checked_sub(1) else {
            return Ok(());
        };
        let next = self.inner.next_id().0;
        let last = next.saturating_add(extra as u64);
        js_id(PhotoId(last)).map(|_| ())
    }

    #[cfg(test)]
    fn inner(&self) -> &PhotoCollection<JournalStore> {
        &self.inner
    }
}
