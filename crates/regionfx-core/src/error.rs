//! Error types for filter operations.
//!
//! Every error here is raised before the first pixel is written, so a failed
//! call always leaves the caller's image untouched.

use thiserror::Error;

use crate::buffer::Region;

/// Error types for filter and transform operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The region is not fully contained within the image bounds.
    #[error("Region {region} does not fit inside a {width}x{height} image")]
    InvalidRegion {
        region: Region,
        width: u32,
        height: u32,
    },

    /// A numeric parameter is outside its declared range.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The pixel buffer length does not match the image dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },
}

impl FilterError {
    /// Build an `InvalidParameter` error for a value outside `[min, max]`.
    pub(crate) fn out_of_range<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        FilterError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: format!("expected a value in [{}, {}]", min, max),
        }
    }
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
