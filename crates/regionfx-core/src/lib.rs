//! RegionFX Core - Region-aware image filter engine
//!
//! This crate applies filters and geometric transforms to a rectangular
//! region of an RGBA8 image, leaving every pixel outside the region as it was.
//!
//! # Module Structure
//!
//! - `buffer` - Image buffer and region rectangle
//! - `color` - Floating-point RGB accumulator and luma weights
//! - `kernel` - Gaussian and unsharp kernel builders
//! - `convolve` - Region convolution with a frozen source snapshot
//! - `transform` - Affine matrices and region-clipped resampling
//! - `median` - Median filter
//! - `glass` - Stochastic "matte glass" displacement
//! - `histogram` - Bucketed channel histograms and their bounds
//! - `correction` - White balance, luma stretch and RGB stretch
//! - `filter` - Filter parameters and the `apply` entry point
//! - `config` - Engine settings

pub mod buffer;
pub mod color;
pub mod config;
pub mod convolve;
pub mod correction;
pub mod error;
pub mod filter;
pub mod glass;
pub mod histogram;
pub mod kernel;
pub mod median;
pub mod transform;

pub use buffer::{Image, Region, Rgba};
pub use config::FilterSettings;
pub use error::{FilterError, FilterResult};
pub use filter::{apply, apply_with, FilterKind, FilterParams, KernelSize, MatrixCell, Unreadable};
pub use histogram::{compute_histogram, histogram_bounds, ColorProp, HistogramBounds};
pub use kernel::{Kernel, KernelSizing};
pub use transform::{AffineTransform, Interpolation};
