//! Image decoding pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP images (EXIF orientation applied, alpha flattened)
//! - Recognising image content by its leading magic bytes
//! - Resizing to bounds, including the one-time landscape canonicalisation
//!   that every imported original goes through
//!
//! # Examples
//!
//! ```ignore
//! use photoreport_core::decode::{decode_image, resize_to_bounds, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let stored = resize_to_bounds(&image, 1600, 1200, FilterType::Lanczos3).unwrap();
//! println!("Stored {}x{} original", stored.width, stored.height);
//! ```

mod reader;
mod resize;
mod sniff;
mod types;

pub use reader::{decode_image, decode_image_no_orientation, get_orientation, probe_dimensions};
pub use resize::{calculate_bounded_dimensions, resize, resize_to_bounds};
pub use sniff::{sniff, ImageKind};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
