//! Geometric transforms: rotate and scale within a region.
//!
//! # Coordinate System
//!
//! - Pixel `(x, y)` sits at integer coordinates, origin top-left
//! - Rotation angles are in degrees for filters, radians for [`AffineTransform::rotate`]
//! - Rotate and scale pivot on the region center, not the image center
//!
//! Transforms map destination positions back into source space, so the
//! matrix handed to [`transform`] is the inverse of the visual motion.

mod affine;
mod resample;

pub use affine::AffineTransform;
pub use resample::{rotate, scale, transform, Interpolation};
