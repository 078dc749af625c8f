//! "Matte glass" stochastic displacement filter.
//!
//! Every region pixel becomes the equal-weight average of `samples` pixels
//! drawn around it. Offsets come from an [`OffsetSampler`], so tests can
//! inject a seeded or fixed strategy.

#[cfg(feature = "thread-rng")]
use rand::rngs::ThreadRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::buffer::{Image, Region};
use crate::color::Rgbv;

/// Number of uniform draws summed per normal approximation.
const IRWIN_HALL_TERMS: u32 = 12;

/// Strategy for drawing a neighbor offset along one axis.
pub trait OffsetSampler {
    /// Draw an integer offset for the given radius.
    fn offset(&mut self, radius: f64) -> i64;
}

/// Approximately normal offsets from a sum of uniform draws.
///
/// The sum of 12 uniforms is shifted and scaled onto `[-1, 1]`, multiplied
/// by the radius and truncated toward zero. The distribution is bounded by
/// the radius, symmetric, and bell-shaped.
#[derive(Debug, Clone)]
pub struct IrwinHallSampler<R> {
    rng: R,
}

impl<R: Rng> IrwinHallSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One draw in `[-1, 1]`.
    pub fn unit(&mut self) -> f64 {
        let n = IRWIN_HALL_TERMS as f64;
        let sum: f64 = (0..IRWIN_HALL_TERMS).map(|_| self.rng.random::<f64>()).sum();
        (sum - n / 2.0) / (n / 2.0)
    }
}

impl IrwinHallSampler<StdRng> {
    /// Reproducible sampler.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

#[cfg(feature = "thread-rng")]
impl IrwinHallSampler<ThreadRng> {
    /// Sampler seeded from the OS.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> OffsetSampler for IrwinHallSampler<R> {
    fn offset(&mut self, radius: f64) -> i64 {
        (self.unit() * radius).trunc() as i64
    }
}

/// Apply the glass effect to `region` in place.
///
/// Sampled coordinates are clamped into the image, not the region. Reads
/// come from a frozen copy of the source. Alpha is left unchanged.
pub fn glass<S: OffsetSampler>(
    image: &mut Image,
    region: Region,
    radius: f64,
    samples: u32,
    sampler: &mut S,
) {
    if region.is_empty() || samples == 0 {
        return;
    }
    trace!(
        width = image.width,
        height = image.height,
        %region,
        radius,
        samples,
        "glass"
    );

    let src = image.clone();
    let k = 1.0 / samples as f64;

    for (x, y) in region.coords() {
        let mut acc = Rgbv::ZERO;
        for _ in 0..samples {
            let px = x as i64 + sampler.offset(radius);
            let py = y as i64 + sampler.offset(radius);
            acc.add(Rgbv::from_pixel(src.pixel_clamped(px, py)), k);
        }
        let alpha = src.pixel(x, y)[3];
        image.set_pixel(x, y, acc.to_pixel(alpha));
    }
}
