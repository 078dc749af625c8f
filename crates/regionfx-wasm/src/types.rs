//! WASM-compatible wrapper types for images and regions.
//!
//! This module provides JavaScript-friendly types that wrap the core RegionFX types,
//! handling the conversion between Rust and JavaScript data representations.

use regionfx_core::{ColorProp, FilterError, Image, Region};
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// Pixels are stored as 4 bytes per pixel (R, G, B, A), row-major, which is
/// the layout of a canvas `ImageData` buffer.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` and `clamped_pixels()`
/// copy it out to JavaScript memory.
#[wasm_bindgen]
pub struct JsImage {
    inner: Image,
}

#[wasm_bindgen]
impl JsImage {
    /// Create a new JsImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    ///
    /// # Errors
    /// Returns an error if `pixels` is not `width * height * 4` bytes long.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsImage, JsValue> {
        Image::new(width, height, pixels)
            .map(JsImage::from_image)
            .map_err(to_js_error)
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Returns RGBA pixel data as Uint8ClampedArray, ready for `new ImageData(...)`.
    pub fn clamped_pixels(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.inner.pixels.as_slice())
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsImage {
    pub(crate) fn from_image(inner: Image) -> Self {
        Self { inner }
    }

    pub(crate) fn image(&self) -> &Image {
        &self.inner
    }
}

/// A region rectangle in image pixel coordinates.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsRegion {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsRegion {
    /// Create a region from its top-left corner and size.
    ///
    /// The region is checked against the image when a filter runs, not here.
    #[wasm_bindgen(constructor)]
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> JsRegion {
        JsRegion {
            left,
            top,
            width,
            height,
        }
    }

    /// The whole of `image`.
    pub fn full(image: &JsImage) -> JsRegion {
        JsRegion::from_region(Region::full(image.image()))
    }

    #[wasm_bindgen(getter)]
    pub fn left(&self) -> u32 {
        self.left
    }

    #[wasm_bindgen(getter)]
    pub fn top(&self) -> u32 {
        self.top
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl JsRegion {
    pub(crate) fn from_region(r: Region) -> Self {
        Self::new(r.left, r.top, r.width, r.height)
    }

    pub(crate) fn to_region(self) -> Region {
        Region::new(self.left, self.top, self.width, self.height)
    }
}

/// Convert a u8 channel selector to the core ColorProp enum.
///
/// Values:
/// - 0 = Red
/// - 1 = Green
/// - 2 = Blue
/// - 3 = Luma
///
/// Any other value is rejected.
pub(crate) fn color_prop_from_u8(value: u8) -> Option<ColorProp> {
    match value {
        0 => Some(ColorProp::Red),
        1 => Some(ColorProp::Green),
        2 => Some(ColorProp::Blue),
        3 => Some(ColorProp::Luma),
        _ => None,
    }
}

pub(crate) fn to_js_error(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_rejects_short_buffer() {
        let result = JsImage::new(2, 2, vec![0u8; 15]);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_clamped_pixels_copy() {
        let img = JsImage::from_image(Image::filled(2, 1, [9, 8, 7, 255]));
        let clamped = img.clamped_pixels();
        assert_eq!(clamped.length(), 8);
        assert_eq!(clamped.to_vec(), vec![9, 8, 7, 255, 9, 8, 7, 255]);
    }
}
