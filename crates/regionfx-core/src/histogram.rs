//! Per-channel histogram extraction over a region.
//!
//! Histograms here drive contrast stretching: a scalar pixel property
//! (red, green, blue or luma) is bucketed and the lowest and highest
//! occupied buckets become the stretch bounds.

use serde::{Deserialize, Serialize};

use crate::buffer::{Image, Region, Rgba};
use crate::color::{Rgbv, LUMA};

/// Default number of histogram buckets.
pub const DEFAULT_BUCKETS: usize = 256;

/// Scalar pixel property a histogram is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorProp {
    Red,
    Green,
    Blue,
    Luma,
}

impl ColorProp {
    /// Project a color onto this property, in `[0, 1]`.
    #[inline]
    pub fn value(self, c: Rgbv) -> f64 {
        match self {
            ColorProp::Red => c.r,
            ColorProp::Green => c.g,
            ColorProp::Blue => c.b,
            ColorProp::Luma => LUMA.dot(c),
        }
    }

    #[inline]
    pub fn of_pixel(self, p: Rgba) -> f64 {
        self.value(Rgbv::from_pixel(p))
    }
}

/// Bucket index for a value in `[0, 1]`.
#[inline]
pub fn bucket_of(value: f64, bucket_count: usize) -> usize {
    let last = bucket_count.saturating_sub(1);
    let pos = (value.clamp(0.0, 1.0) * last as f64).round() as usize;
    pos.min(last)
}

/// Lowest and highest occupied bucket of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramBounds {
    pub min: usize,
    pub max: usize,
    pub bucket_count: usize,
}

impl HistogramBounds {
    /// Lower bound mapped back to `[0, 1]`.
    pub fn min_value(&self) -> f64 {
        self.min as f64 / (self.bucket_count - 1) as f64
    }

    /// Upper bound mapped back to `[0, 1]`.
    pub fn max_value(&self) -> f64 {
        self.max as f64 / (self.bucket_count - 1) as f64
    }

    /// True when every sample fell into a single bucket.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Histogram of one scalar property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistogram {
    pub buckets: Vec<u32>,
}

impl ChannelHistogram {
    /// Lowest and highest non-empty bucket, or `None` if nothing was counted.
    pub fn bounds(&self) -> Option<HistogramBounds> {
        let min = self.buckets.iter().position(|&n| n > 0)?;
        let max = self.buckets.iter().rposition(|&n| n > 0)?;
        Some(HistogramBounds {
            min,
            max,
            bucket_count: self.buckets.len(),
        })
    }

    /// Largest bucket count, for normalizing a display.
    pub fn max_value(&self) -> u32 {
        self.buckets.iter().copied().max().unwrap_or(0)
    }

    /// Number of samples counted.
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|&n| n as u64).sum()
    }
}

/// Compute a histogram of `prop` over every pixel in `region`.
///
/// `region` must already be validated against `image`. A `bucket_count`
/// below 2 is raised to 2.
pub fn compute_histogram(
    image: &Image,
    region: Region,
    prop: ColorProp,
    bucket_count: usize,
) -> ChannelHistogram {
    let bucket_count = bucket_count.max(2);
    let mut buckets = vec![0u32; bucket_count];
    for (x, y) in region.coords() {
        let v = prop.of_pixel(image.pixel(x, y));
        buckets[bucket_of(v, bucket_count)] += 1;
    }
    ChannelHistogram { buckets }
}

/// Convenience: histogram bounds of `prop` over `region`.
pub fn histogram_bounds(
    image: &Image,
    region: Region,
    prop: ColorProp,
    bucket_count: usize,
) -> Option<HistogramBounds> {
    compute_histogram(image, region, prop, bucket_count).bounds()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands() -> Image {
        let mut img = Image::filled(4, 4, [10, 10, 10, 255]);
        for y in 0..4 {
            for x in 2..4 {
                img.set_pixel(x, y, [200, 200, 200, 255]);
            }
        }
        img
    }

    #[test]
    fn test_empty_region() {
        let img = bands();
        let hist = compute_histogram(&img, Region::new(0, 0, 0, 0), ColorProp::Red, 256);
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.max_value(), 0);
        assert!(hist.bounds().is_none());
    }

    #[test]
    fn test_band_bounds() {
        let img = bands();
        let bounds = histogram_bounds(&img, Region::full(&img), ColorProp::Red, 256).unwrap();
        assert_eq!(bounds.min, 10);
        assert_eq!(bounds.max, 200);
        assert!(!bounds.is_degenerate());
        assert!((bounds.min_value() - 10.0 / 255.0).abs() < 1e-12);
        assert!((bounds.max_value() - 200.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_region_restricts_samples() {
        let img = bands();
        let left = Region::new(0, 0, 2, 4);
        let hist = compute_histogram(&img, left, ColorProp::Green, 256);
        assert_eq!(hist.total(), 8);
        assert_eq!(hist.buckets[10], 8);
        assert!(hist.bounds().unwrap().is_degenerate());
    }

    #[test]
    fn test_luma_histogram_of_primaries() {
        let mut img = Image::filled(3, 1, [255, 0, 0, 255]);
        img.set_pixel(1, 0, [0, 255, 0, 255]);
        img.set_pixel(2, 0, [0, 0, 255, 255]);
        let hist = compute_histogram(&img, Region::full(&img), ColorProp::Luma, 256);
        // 0.2125 * 255 = 54.19, 0.7154 * 255 = 182.43, 0.0721 * 255 = 18.39
        assert_eq!(hist.buckets[54], 1);
        assert_eq!(hist.buckets[182], 1);
        assert_eq!(hist.buckets[18], 1);
    }

    #[test]
    fn test_bucket_count_rescales() {
        let mut img = Image::filled(2, 1, [0, 0, 0, 255]);
        img.set_pixel(1, 0, [255, 255, 255, 255]);
        let bounds = histogram_bounds(&img, Region::full(&img), ColorProp::Blue, 16).unwrap();
        assert_eq!(bounds.min, 0);
        assert_eq!(bounds.max, 15);
        assert_eq!(bounds.bucket_count, 16);
    }

    #[test]
    fn test_bucket_of_rounds() {
        assert_eq!(bucket_of(0.0, 256), 0);
        assert_eq!(bucket_of(1.0, 256), 255);
        assert_eq!(bucket_of(0.5, 3), 1);
        assert_eq!(bucket_of(1.5, 256), 255);
        assert_eq!(bucket_of(-0.2, 256), 0);
    }

    #[test]
    fn test_gradient_fills_every_bucket() {
        let mut img = Image::filled(256, 1, [0, 0, 0, 255]);
        for x in 0..256u32 {
            img.set_pixel(x, 0, [x as u8, x as u8, x as u8, 255]);
        }
        let hist = compute_histogram(&img, Region::full(&img), ColorProp::Red, 256);
        assert!(hist.buckets.iter().all(|&n| n == 1));
        assert_eq!(hist.max_value(), 1);
    }
}
