//! Report pagination and PDF rendering.
//!
//! - [`paginate`] turns position-ordered photo slots into pages
//! - [`render_pdf`] writes those pages as a PDF document
//! - [`CaseId`] and [`pdf_filename`] name the result

mod assets;
mod case_id;
mod fonts;
mod layout;
mod paginate;
mod pdf;

pub use assets::{AssetProvider, HeaderLine, ReportHeader, StaticAssets};
pub use case_id::{format_case_id_input, pdf_filename, CaseId, FILENAME_SUFFIX};
pub use fonts::{encode_win_ansi, text_width, FontFace};
pub use layout::{PageLayout, A4_HEIGHT, A4_WIDTH};
pub use paginate::{paginate, HeaderRegion, Page, PhotoBlock, PhotoSlot, Rect, TextRun};
pub use pdf::render_pdf;

use thiserror::Error;

use crate::decode::DecodeError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("A report needs at least one photo")]
    EmptyReport,

    #[error("Invalid page template: {0}")]
    InvalidTemplate(String),

    #[error("Page template leaves no room for photos: {available:.1}pt available, {required:.1}pt required")]
    Overflow { available: f32, required: f32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("No resolved image for slot {0}")]
    MissingImage(usize),

    #[error("Cannot embed image for slot {index}: {reason}")]
    Image { index: usize, reason: String },

    #[error("Cannot embed logo: {0}")]
    Logo(DecodeError),
}
