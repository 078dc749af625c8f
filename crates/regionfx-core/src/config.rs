//! Engine-wide settings shared by every filter call.
//!
//! Settings are plain serde data so a host can hand them over as JSON (or a
//! JS object through the WASM bindings). Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};
use crate::histogram::DEFAULT_BUCKETS;

pub use crate::kernel::KernelSizing;
pub use crate::transform::Interpolation;

/// Largest half size accepted for `KernelSizing::Fixed` (a 129x129 kernel).
pub const MAX_FIXED_HALF_SIZE: usize = 64;

/// Bucket count range accepted for stretch histograms.
pub const MIN_HISTOGRAM_BUCKETS: usize = 2;
pub const MAX_HISTOGRAM_BUCKETS: usize = 65536;

/// Tunables that are not part of any single filter's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// How blur and unsharp radii map to kernel sizes.
    pub kernel_sizing: KernelSizing,
    /// Resampling used by rotate and scale.
    pub interpolation: Interpolation,
    /// Bucket count for stretch histograms.
    pub histogram_buckets: usize,
    /// Seed for the glass filter. `None` draws from the thread RNG.
    pub glass_seed: Option<u64>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            kernel_sizing: KernelSizing::default(),
            interpolation: Interpolation::default(),
            histogram_buckets: DEFAULT_BUCKETS,
            glass_seed: None,
        }
    }
}

impl FilterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the settings before any pixel is touched.
    pub fn validate(&self) -> FilterResult<()> {
        if let KernelSizing::Fixed { half_size } = self.kernel_sizing {
            if half_size > MAX_FIXED_HALF_SIZE {
                return Err(FilterError::out_of_range(
                    "kernel_sizing.half_size",
                    half_size,
                    0,
                    MAX_FIXED_HALF_SIZE,
                ));
            }
        }
        if !(MIN_HISTOGRAM_BUCKETS..=MAX_HISTOGRAM_BUCKETS).contains(&self.histogram_buckets) {
            return Err(FilterError::out_of_range(
                "histogram_buckets",
                self.histogram_buckets,
                MIN_HISTOGRAM_BUCKETS,
                MAX_HISTOGRAM_BUCKETS,
            ));
        }
        Ok(())
    }
}
