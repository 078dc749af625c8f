//! RegionFX WASM - WebAssembly bindings for RegionFX
//!
//! This crate provides WASM bindings to expose the regionfx-core filter engine
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images and regions
//! - `filter` - Filter application and kernel previews
//! - `histogram` - Region histograms and their bounds
//!
//! # Usage
//!
//! ```typescript
//! import init, { apply_filter, JsImage, JsRegion } from '@regionfx/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const data = ctx.getImageData(0, 0, w, h);
//! const image = new JsImage(w, h, new Uint8Array(data.data.buffer));
//! const region = new JsRegion(40, 40, 120, 80);
//! const out = apply_filter(image, region, { kind: 'median', size: 5 });
//! ctx.putImageData(new ImageData(out.clamped_pixels(), out.width), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod filter;
mod histogram;
mod types;

// Re-export public types
pub use filter::{apply_filter, apply_filter_with, filter_names, kernel_preview};
pub use histogram::{histogram_bounds, region_histogram};
pub use types::{JsImage, JsRegion};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
