//! Histogram WASM bindings.
//!
//! Channel selectors are passed as a u8: 0 = red, 1 = green, 2 = blue,
//! 3 = luma. Unknown selectors and regions that do not fit the image yield
//! `undefined`.

use crate::types::{color_prop_from_u8, JsImage, JsRegion};
use regionfx_core::histogram::{compute_histogram, histogram_bounds as core_bounds, DEFAULT_BUCKETS};
use wasm_bindgen::prelude::*;

/// Lowest and highest occupied bucket of a channel over a region.
///
/// # Arguments
/// * `image` - Source image
/// * `region` - Rectangle to measure
/// * `channel` - 0 = red, 1 = green, 2 = blue, 3 = luma
///
/// # Returns
/// `[min, max]` bucket indices in `0..=255`, or `undefined` for an empty
/// region, an unknown channel or a region outside the image.
///
/// # Example (TypeScript)
/// ```typescript
/// const [lo, hi] = histogram_bounds(image, region, 3) ?? [0, 255];
/// ```
#[wasm_bindgen]
pub fn histogram_bounds(image: &JsImage, region: &JsRegion, channel: u8) -> Option<Vec<u32>> {
    let prop = color_prop_from_u8(channel)?;
    let region = region.to_region();
    region.validate(image.image()).ok()?;
    let bounds = core_bounds(image.image(), region, prop, DEFAULT_BUCKETS)?;
    Some(vec![bounds.min as u32, bounds.max as u32])
}

/// Full 256-bucket histogram of a channel over a region.
///
/// Returns `undefined` under the same conditions as `histogram_bounds`,
/// except that an empty region gives all-zero buckets.
#[wasm_bindgen]
pub fn region_histogram(image: &JsImage, region: &JsRegion, channel: u8) -> Option<Vec<u32>> {
    let prop = color_prop_from_u8(channel)?;
    let region = region.to_region();
    region.validate(image.image()).ok()?;
    Some(compute_histogram(image.image(), region, prop, DEFAULT_BUCKETS).buckets)
}
