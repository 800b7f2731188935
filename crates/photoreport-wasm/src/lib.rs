//! Photoreport WASM - WebAssembly bindings for Photoreport
//!
//! This crate exposes the photoreport-core collection and report engine to
//! the browser shell.
//!
//! # Module Structure
//!
//! - `collection` - Loading, importing, editing and exporting photos
//! - `report` - Finished documents and case-id helpers
//! - `types` - WASM-compatible views of stored photos
//! - `logger` - Browser console backend for `log`
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCollectionLoader } from '@photoreport/wasm';
//!
//! await init();
//!
//! const photos = new JsCollectionLoader().open();
//! photos.import_photo(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! const doc = photos.export_report('AB1234/25', '1', '3', logoBytes);
//! download(doc.bytes(), doc.filename);
//! ```

use wasm_bindgen::prelude::*;

mod collection;
mod logger;
mod report;
mod types;

pub use collection::{JsCollectionLoader, JsPhotoCollection};
pub use report::{format_case_id_input, pdf_filename, JsExportedDocument};
pub use types::{IdOverflow, JsPhotoRecord, PhotoSummary};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install();
    log::debug!("photoreport-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
