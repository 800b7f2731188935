//! Stateless pixel transforms.
//!
//! Only right-angle rotations exist here. They are applied once at import
//! (landscape canonicalisation) and once per export (display orientation),
//! never in response to an interactive rotation change.
//!
//! # Coordinate System
//!
//! - Angles are in degrees, positive = clockwise
//! - Origin is top-left corner

mod rotation;

pub use rotation::{rotate, RotationAngle, BACKGROUND};
