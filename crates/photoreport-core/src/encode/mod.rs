//! Image encoding.
//!
//! Every buffer this crate produces is a baseline RGB JPEG. Two quality
//! presets exist: [`Quality::IMPORT`] for the single compression pass an
//! original receives, and [`Quality::EXPORT`] for the per-export rotation
//! pass.
//!
//! # Examples
//!
//! ```ignore
//! use photoreport_core::encode::{encode_image, Quality};
//!
//! let jpeg_bytes = encode_image(&image, Quality::IMPORT).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, EncodeError, Quality};
