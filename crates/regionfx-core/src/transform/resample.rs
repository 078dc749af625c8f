//! Region-clipped resampling through an affine transform.
//!
//! The transform uses inverse mapping: for each destination pixel inside the
//! region we compute the source coordinate it comes from and interpolate
//! there. Source pixels outside the region are treated as fully transparent,
//! so content from outside the editable area never smears in; partially
//! covered samples fade out through alpha instead.
//!
//! The result is built in three layers:
//! 1. the original image,
//! 2. the region cleared to opaque black,
//! 3. the resampled overlay alpha-blended on top.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::AffineTransform;
use crate::buffer::{Image, Region, Rgba};
use crate::color::Rgbv;

/// Interpolation method for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Truncate the source coordinate to an integer pixel.
    Nearest,
    /// Blend the four surrounding pixels by fractional distance.
    #[default]
    Bilinear,
}

const CLEAR: Rgba = [0, 0, 0, 255];

/// Premultiplied color sample with coverage.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    color: Rgbv,
    alpha: f64,
}

impl Sample {
    const TRANSPARENT: Sample = Sample {
        color: Rgbv::ZERO,
        alpha: 0.0,
    };

    #[inline]
    fn add(&mut self, p: Rgba, weight: f64) {
        let a = p[3] as f64 / 255.0 * weight;
        self.color.add(Rgbv::from_pixel(p), a);
        self.alpha += a;
    }
}

/// Resample `region` of `image` through `affine`, returning a new image.
///
/// `affine` maps destination coordinates into source space. Pixels outside
/// `region` are copied unchanged. `region` must already be validated.
pub fn transform(
    image: &Image,
    region: Region,
    affine: &AffineTransform,
    interpolation: Interpolation,
) -> Image {
    let mut result = image.clone();
    if region.is_empty() {
        return result;
    }
    trace!(
        width = image.width,
        height = image.height,
        %region,
        ?interpolation,
        "transform"
    );

    for (x, y) in region.coords() {
        result.set_pixel(x, y, CLEAR);
    }

    for (x, y) in region.coords() {
        let (sx, sy) = affine.apply(x as f64, y as f64);
        let sample = match interpolation {
            Interpolation::Nearest => sample_nearest(image, region, sx, sy),
            Interpolation::Bilinear => sample_bilinear(image, region, sx, sy),
        };
        let base = result.pixel(x, y);
        result.set_pixel(x, y, blend_over(sample, base));
    }

    result
}

/// Scale the content of `region` about its center by `factor`.
pub fn scale(image: &Image, region: Region, factor: f64, interpolation: Interpolation) -> Image {
    let (cx, cy) = region.center();
    let affine = AffineTransform::scale(1.0 / factor, 1.0 / factor).about(cx, cy);
    transform(image, region, &affine, interpolation)
}

/// Rotate the content of `region` about its center by `degrees`.
pub fn rotate(image: &Image, region: Region, degrees: f64, interpolation: Interpolation) -> Image {
    let (cx, cy) = region.center();
    let affine = AffineTransform::rotate(degrees.to_radians()).about(cx, cy);
    transform(image, region, &affine, interpolation)
}

/// Source pixel at integer coordinates, or nothing outside the clip rect.
#[inline]
fn clipped(image: &Image, clip: Region, x: i64, y: i64) -> Option<Rgba> {
    if clip.contains(x, y) {
        Some(image.pixel(x as u32, y as u32))
    } else {
        None
    }
}

fn sample_nearest(image: &Image, clip: Region, x: f64, y: f64) -> Sample {
    let mut s = Sample::TRANSPARENT;
    if let Some(p) = clipped(image, clip, x.trunc() as i64, y.trunc() as i64) {
        s.add(p, 1.0);
    }
    s
}

/// Bilinear sample from the four pixels around `(x, y)`:
///
/// ```text
/// C1 | C2
/// -------
/// C3 | C4
/// ```
fn sample_bilinear(image: &Image, clip: Region, x: f64, y: f64) -> Sample {
    let (x0, x1) = (x.floor(), x.ceil());
    let (y0, y1) = (y.floor(), y.ceil());
    let h = x - x0;
    let v = y - y0;

    let corners = [
        (x0, y0, (1.0 - h) * (1.0 - v)),
        (x1, y0, h * (1.0 - v)),
        (x0, y1, (1.0 - h) * v),
        (x1, y1, h * v),
    ];

    let mut s = Sample::TRANSPARENT;
    for (cx, cy, weight) in corners {
        if let Some(p) = clipped(image, clip, cx as i64, cy as i64) {
            s.add(p, weight);
        }
    }
    s
}

/// Standard "over" compositing of a premultiplied sample onto `base`.
#[inline]
fn blend_over(top: Sample, base: Rgba) -> Rgba {
    let alpha = top.alpha.clamp(0.0, 1.0);
    let keep = 1.0 - alpha;
    let mut color = top.color;
    color.add(Rgbv::from_pixel(base), keep);
    let out_alpha = alpha + base[3] as f64 / 255.0 * keep;
    color.to_pixel((out_alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Opaque image whose gray level is a linear function of position.
    fn gradient(width: u32, height: u32) -> Image {
        let mut img = Image::filled(width, height, [0, 0, 0, 255]);
        for (x, y) in Region::full(&img).coords() {
            let v = (3 * x + 2 * y + 20) as u8;
            img.set_pixel(x, y, [v, v, 255 - v, 255]);
        }
        img
    }

    fn max_channel_diff(a: Rgba, b: Rgba) -> i32 {
        (0..3)
            .map(|i| (a[i] as i32 - b[i] as i32).abs())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_identity_transform_is_exact() {
        let img = gradient(9, 7);
        for interp in [Interpolation::Nearest, Interpolation::Bilinear] {
            let out = transform(&img, Region::full(&img), &AffineTransform::IDENTITY, interp);
            assert_eq!(out, img);
        }
    }

    #[test]
    fn test_outside_region_is_identical() {
        let img = gradient(12, 10);
        let region = Region::new(3, 2, 6, 5);
        let out = rotate(&img, region, 30.0, Interpolation::Bilinear);
        for (x, y) in Region::full(&img).coords() {
            if !region.contains(x as i64, y as i64) {
                assert_eq!(out.pixel(x, y), img.pixel(x, y), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_no_smear_from_outside_region() {
        let mut img = Image::filled(10, 3, [255, 0, 0, 255]);
        let region = Region::new(2, 0, 4, 3);
        for (x, y) in region.coords() {
            img.set_pixel(x, y, [90, 90, 90, 255]);
        }
        let out = transform(
            &img,
            region,
            &AffineTransform::shift(3.0, 0.0),
            Interpolation::Bilinear,
        );
        // x = 2 pulls from x = 5 (inside), x = 3..5 pull from 6..8 (outside)
        assert_eq!(out.pixel(2, 1), [90, 90, 90, 255]);
        for x in 3..6 {
            assert_eq!(out.pixel(x, 1), [0, 0, 0, 255]);
        }
        assert_eq!(out.pixel(6, 1), [255, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_feathering_at_region_edge() {
        let img = Image::filled(6, 1, [200, 200, 200, 255]);
        let region = Region::new(0, 0, 4, 1);
        let out = transform(
            &img,
            region,
            &AffineTransform::shift(0.5, 0.0),
            Interpolation::Bilinear,
        );
        assert_eq!(out.pixel(2, 0), [200, 200, 200, 255]);
        // Half of the last column's sample falls outside the region
        assert_eq!(out.pixel(3, 0), [100, 100, 100, 255]);
    }

    #[test]
    fn test_bilinear_weights_are_reproducible() {
        let mut img = Image::filled(2, 1, [0, 0, 0, 255]);
        img.set_pixel(1, 0, [255, 255, 255, 255]);
        let out = transform(
            &img,
            Region::full(&img),
            &AffineTransform::shift(0.25, 0.0),
            Interpolation::Bilinear,
        );
        assert_eq!(out.pixel(0, 0), [64, 64, 64, 255]);
        assert_eq!(out.pixel(1, 0), [191, 191, 191, 255]);
    }

    #[test]
    fn test_nearest_truncates() {
        let img = gradient(5, 5);
        let out = transform(
            &img,
            Region::full(&img),
            &AffineTransform::shift(0.7, 0.7),
            Interpolation::Nearest,
        );
        assert_eq!(out, img);
    }

    #[test]
    fn test_rotate_round_trip() {
        let img = gradient(32, 32);
        let region = Region::full(&img);
        let there = rotate(&img, region, 10.0, Interpolation::Bilinear);
        let back = rotate(&there, region, -10.0, Interpolation::Bilinear);

        let (cx, cy) = region.center();
        for (x, y) in region.coords() {
            let (dx, dy) = (x as f64 - cx, y as f64 - cy);
            if dx * dx + dy * dy <= 100.0 {
                let diff = max_channel_diff(back.pixel(x, y), img.pixel(x, y));
                assert!(diff <= 2, "pixel ({}, {}) differs by {}", x, y, diff);
            }
        }
    }

    #[test]
    fn test_scale_round_trip() {
        let img = gradient(32, 32);
        let region = Region::full(&img);
        let up = scale(&img, region, 2.0, Interpolation::Bilinear);
        let down = scale(&up, region, 0.5, Interpolation::Bilinear);

        assert_eq!((down.width, down.height), (img.width, img.height));
        for y in 8..24 {
            for x in 8..24 {
                let diff = max_channel_diff(down.pixel(x, y), img.pixel(x, y));
                assert!(diff <= 1, "pixel ({}, {}) differs by {}", x, y, diff);
            }
        }
    }

    #[test]
    fn test_scale_down_blacks_out_uncovered_area() {
        let img = Image::filled(8, 8, [120, 120, 120, 255]);
        let out = scale(&img, Region::full(&img), 0.5, Interpolation::Bilinear);
        // The corner pulls from (-4, -4), well outside the region
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(4, 4), [120, 120, 120, 255]);
    }

    #[test]
    fn test_rotation_uses_region_center() {
        // A quarter turn about the region center keeps the center pixel
        let mut img = Image::filled(9, 9, [0, 0, 0, 255]);
        img.set_pixel(6, 4, [255, 255, 255, 255]);
        let region = Region::new(4, 2, 4, 4);
        let out = rotate(&img, region, 90.0, Interpolation::Nearest);
        assert_eq!(region.center(), (6.0, 4.0));
        assert_eq!(out.pixel(6, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn test_empty_region_returns_copy() {
        let img = gradient(4, 4);
        let out = rotate(&img, Region::new(2, 2, 0, 0), 45.0, Interpolation::Bilinear);
        assert_eq!(out, img);
    }

    #[test]
    fn test_transparent_source_shows_black_base() {
        let img = Image::filled(3, 3, [250, 10, 10, 0]);
        let out = transform(
            &img,
            Region::full(&img),
            &AffineTransform::IDENTITY,
            Interpolation::Bilinear,
        );
        assert_eq!(out.pixel(1, 1), [0, 0, 0, 255]);
    }
}
