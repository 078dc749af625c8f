//! Filter WASM bindings.
//!
//! Parameters and settings are passed from TypeScript as plain objects and
//! deserialized via serde_wasm_bindgen. The input image is never modified;
//! every call returns a new image.

use crate::types::{to_js_error, JsImage, JsRegion};
use regionfx_core::{apply_with, FilterKind, FilterParams, FilterResult, FilterSettings};
use wasm_bindgen::prelude::*;

/// Apply one filter to a region of an image with default settings.
///
/// # Arguments
/// * `image` - Source image
/// * `region` - Rectangle to edit; pixels outside it are copied unchanged
/// * `params` - Filter parameters, tagged by `kind`
///
/// # Returns
/// A new image of the same size, or an error string if the region does not
/// fit the image or a parameter is out of range.
///
/// # Example (TypeScript)
/// ```typescript
/// const region = new JsRegion(10, 10, 200, 120);
/// const blurred = apply_filter(image, region, { kind: 'gaussian_blur', radius: 2.5 });
/// ctx.putImageData(new ImageData(blurred.clamped_pixels(), blurred.width), 0, 0);
/// ```
#[wasm_bindgen]
pub fn apply_filter(image: &JsImage, region: &JsRegion, params: JsValue) -> Result<JsImage, JsValue> {
    let params = parse_params(params)?;
    let settings = seed_from_js(FilterSettings::default());
    run_filter(image, region, &params, &settings).map_err(to_js_error)
}

/// Apply one filter with explicit engine settings.
///
/// `settings` may omit any field; missing fields take their defaults.
///
/// # Example (TypeScript)
/// ```typescript
/// const out = apply_filter_with(image, region,
///   { kind: 'matte_glass', radius: 8, samples: 6 },
///   { glass_seed: 42, interpolation: 'nearest' });
/// ```
#[wasm_bindgen]
pub fn apply_filter_with(
    image: &JsImage,
    region: &JsRegion,
    params: JsValue,
    settings: JsValue,
) -> Result<JsImage, JsValue> {
    let params = parse_params(params)?;
    let settings: FilterSettings = serde_wasm_bindgen::from_value(settings)
        .map_err(|e| JsValue::from_str(&format!("Invalid filter settings: {}", e)))?;
    let settings = seed_from_js(settings);
    run_filter(image, region, &params, &settings).map_err(to_js_error)
}

/// Render the kernel a convolution filter would use as a grayscale swatch.
///
/// Returns `undefined` for filters that do not convolve and for parameters
/// that would be rejected.
///
/// # Arguments
/// * `params` - Filter parameters, tagged by `kind`
/// * `cell_px` - Size of each kernel cell in pixels
#[wasm_bindgen]
pub fn kernel_preview(params: JsValue, cell_px: u32) -> Result<Option<JsImage>, JsValue> {
    let params = parse_params(params)?;
    Ok(preview(&params, &FilterSettings::default(), cell_px))
}

/// Display names of every available filter, in menu order.
#[wasm_bindgen]
pub fn filter_names() -> Vec<String> {
    FilterKind::ALL.iter().map(|k| k.name().to_string()).collect()
}

fn parse_params(params: JsValue) -> Result<FilterParams, JsValue> {
    serde_wasm_bindgen::from_value(params)
        .map_err(|e| JsValue::from_str(&format!("Invalid filter parameters: {}", e)))
}

/// Fill in a glass seed from `Math.random` when none was given.
fn seed_from_js(mut settings: FilterSettings) -> FilterSettings {
    if settings.glass_seed.is_none() {
        // 2^53: every integer below it is exact in an f64
        settings.glass_seed = Some((js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);
    }
    settings
}

pub(crate) fn run_filter(
    image: &JsImage,
    region: &JsRegion,
    params: &FilterParams,
    settings: &FilterSettings,
) -> FilterResult<JsImage> {
    let mut out = image.image().clone();
    apply_with(&mut out, region.to_region(), params, settings)?;
    Ok(JsImage::from_image(out))
}

pub(crate) fn preview(
    params: &FilterParams,
    settings: &FilterSettings,
    cell_px: u32,
) -> Option<JsImage> {
    params
        .kernel(settings)
        .map(|k| JsImage::from_image(k.preview(cell_px)))
}


/// WASM-specific tests that require JsValue.
///
/// These tests pass parameters as JS objects and can only run on wasm32
/// targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use regionfx_core::Image;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn js(params: &FilterParams) -> JsValue {
        serde_wasm_bindgen::to_value(params).unwrap()
    }

    fn two_tone() -> JsImage {
        let mut img = Image::filled(4, 4, [10, 10, 10, 255]);
        for y in 0..4 {
            img.set_pixel(2, y, [200, 200, 200, 255]);
            img.set_pixel(3, y, [200, 200, 200, 255]);
        }
        JsImage::from_image(img)
    }

    #[wasm_bindgen_test]
    fn test_apply_filter_from_object() {
        let image = two_tone();
        let region = JsRegion::full(&image);
        let out = apply_filter(&image, &region, js(&FilterParams::RgbStretch)).unwrap();
        let pixels = out.pixels();
        assert_eq!(&pixels[..4], &[0, 0, 0, 255]);
        assert_eq!(&pixels[12..16], &[255, 255, 255, 255]);
    }

    #[wasm_bindgen_test]
    fn test_apply_filter_rejects_unknown_kind() {
        let image = two_tone();
        let region = JsRegion::full(&image);
        let params = js_sys::Object::new();
        js_sys::Reflect::set(&params, &"kind".into(), &"sepia".into()).unwrap();
        assert!(apply_filter(&image, &region, params.into()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_apply_filter_rejects_out_of_range() {
        let image = two_tone();
        let region = JsRegion::full(&image);
        let params = js(&FilterParams::Scale { factor: 50.0 });
        assert!(apply_filter(&image, &region, params).is_err());
    }

    #[wasm_bindgen_test]
    fn test_apply_filter_with_partial_settings() {
        let image = two_tone();
        let region = JsRegion::new(1, 1, 2, 2);
        let settings = js_sys::Object::new();
        js_sys::Reflect::set(&settings, &"glass_seed".into(), &JsValue::from_f64(9.0)).unwrap();
        let params = js(&FilterParams::MatteGlass {
            radius: 2.0,
            samples: 4,
        });

        let a = apply_filter_with(&image, &region, params.clone(), settings.clone().into()).unwrap();
        let b = apply_filter_with(&image, &region, params, settings.into()).unwrap();
        assert_eq!(a.pixels(), b.pixels());
    }

    #[wasm_bindgen_test]
    fn test_kernel_preview_from_object() {
        let params = js(&FilterParams::UnsharpMask {
            radius: 1.0,
            strength: 1.0,
        });
        let swatch = kernel_preview(params, 2).unwrap().unwrap();
        assert_eq!(swatch.width(), 6);

        let none = kernel_preview(js(&FilterParams::WhiteBalance), 2).unwrap();
        assert!(none.is_none());
    }
}
