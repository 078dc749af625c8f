//! Automatic color correction over a region.
//!
//! - **White balance**: scale channels so their region means are equal
//! - **Luma stretch**: remap luma to the full range, preserving hue
//! - **RGB stretch**: remap each channel to the full range independently
//!
//! Stretch bounds come from histogram buckets, so they are quantized to
//! `1 / (buckets - 1)`. A channel whose bounds coincide is left alone.

use tracing::{debug, trace};

use crate::buffer::{Image, Region};
use crate::color::{Rgbv, LUMA};
use crate::histogram::{histogram_bounds, ColorProp};

/// Per-channel seed added to the region mean to avoid division by zero.
const WHITE_BALANCE_EPSILON: f64 = 1e-3;

/// Equalize the mean red, green and blue of `region`.
///
/// Each channel is multiplied by `avg(mean) / mean_c` and clamped.
pub fn white_balance(image: &mut Image, region: Region) {
    if region.is_empty() {
        return;
    }

    let mut mean = Rgbv::ZERO;
    let k = 1.0 / region.area() as f64;
    for (x, y) in region.coords() {
        mean.add(Rgbv::from_pixel(image.pixel(x, y)), k);
    }
    mean.add(Rgbv::splat(WHITE_BALANCE_EPSILON), 1.0);

    let avg = mean.average();
    let gain = Rgbv::new(avg / mean.r, avg / mean.g, avg / mean.b);
    trace!(%region, r = gain.r, g = gain.g, b = gain.b, "white balance gains");

    for (x, y) in region.coords() {
        let p = image.pixel(x, y);
        let mut c = Rgbv::from_pixel(p);
        c.mul_v(gain);
        c.clamp();
        image.set_pixel(x, y, c.to_pixel(p[3]));
    }
}

/// Stretch luma of `region` from its histogram bounds onto `[0, 1]`.
///
/// Each pixel is scaled by `target / current` luma, so hue and saturation
/// are kept. Black pixels stay black.
pub fn luma_stretch(image: &mut Image, region: Region, bucket_count: usize) {
    let Some(bounds) = histogram_bounds(image, region, ColorProp::Luma, bucket_count) else {
        return;
    };
    if bounds.is_degenerate() {
        debug!(%region, bucket = bounds.min, "luma range is flat, stretch skipped");
        return;
    }

    let lo = bounds.min_value();
    let range = bounds.max_value() - lo;
    trace!(%region, lo, range, "luma stretch");

    for (x, y) in region.coords() {
        let p = image.pixel(x, y);
        let mut c = Rgbv::from_pixel(p);
        let current = LUMA.dot(c);
        if current <= 0.0 {
            continue;
        }
        let target = ((current - lo) / range).max(0.0);
        c.mul(target / current);
        c.clamp();
        image.set_pixel(x, y, c.to_pixel(p[3]));
    }
}

/// Stretch each channel of `region` from its own histogram bounds onto `[0, 1]`.
pub fn rgb_stretch(image: &mut Image, region: Region, bucket_count: usize) {
    let props = [ColorProp::Red, ColorProp::Green, ColorProp::Blue];
    let mut lo = [0.0f64; 3];
    let mut stretch = [1.0f64; 3];
    let mut active = [false; 3];

    for (i, prop) in props.into_iter().enumerate() {
        let Some(bounds) = histogram_bounds(image, region, prop, bucket_count) else {
            return;
        };
        if bounds.is_degenerate() {
            debug!(%region, channel = ?prop, "channel range is flat, stretch factor kept at 1");
            continue;
        }
        lo[i] = bounds.min_value();
        stretch[i] = 1.0 / (bounds.max_value() - lo[i]);
        active[i] = true;
    }
    if !active.iter().any(|&a| a) {
        return;
    }
    trace!(%region, ?lo, ?stretch, "rgb stretch");

    for (x, y) in region.coords() {
        let p = image.pixel(x, y);
        let mut out = p;
        for c in 0..3 {
            if active[c] {
                let v = (p[c] as f64 / 255.0 - lo[c]) * stretch[c];
                out[c] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }
        image.set_pixel(x, y, out);
    }
}
