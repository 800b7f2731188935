//! Report document bindings.

use photoreport_core::ExportedDocument;
use wasm_bindgen::prelude::*;

use crate::types::to_js;

/// A finished PDF, ready to hand to a download link or share sheet.
#[wasm_bindgen]
pub struct JsExportedDocument {
    filename: String,
    bytes: Vec<u8>,
    page_count: usize,
}

#[wasm_bindgen]
impl JsExportedDocument {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// PDF bytes as a `Uint8Array` copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

impl From<ExportedDocument> for JsExportedDocument {
    fn from(doc: ExportedDocument) -> Self {
        Self {
            filename: doc.filename,
            bytes: doc.bytes,
            page_count: doc.page_count,
        }
    }
}

/// Filename for a case id, e.g. `AB1234/25` → `AB1234-25_relatorio-fotografico.pdf`.
#[wasm_bindgen]
pub fn pdf_filename(case_id: &str) -> Result<String, JsValue> {
    photoreport_core::pdf_filename(case_id).map_err(to_js)
}

/// Normalise case-id text as the user types it.
#[wasm_bindgen]
pub fn format_case_id_input(raw: &str) -> String {
    photoreport_core::format_case_id_input(raw)
}
