//! Normalized color accumulator used for all intermediate pixel math.
//!
//! Filters convert 8-bit pixels into [`Rgbv`] (three `f64` channels in
//! `[0, 1]`), do weighted sums without rounding, and only convert back to
//! 8-bit when a result is written.

use crate::buffer::Rgba;

/// BT.709 coefficient for red channel in luma calculation.
pub const LUMA_R: f64 = 0.2125;

/// BT.709 coefficient for green channel in luma calculation.
pub const LUMA_G: f64 = 0.7154;

/// BT.709 coefficient for blue channel in luma calculation.
pub const LUMA_B: f64 = 0.0721;

/// Luma weights as a vector, for use with [`Rgbv::dot`].
pub const LUMA: Rgbv = Rgbv::new(LUMA_R, LUMA_G, LUMA_B);

/// RGB color vector with normalized `f64` channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgbv {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgbv {
    pub const ZERO: Rgbv = Rgbv::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Convert an 8-bit pixel, ignoring alpha.
    #[inline]
    pub fn from_pixel(p: Rgba) -> Self {
        Self::new(
            p[0] as f64 / 255.0,
            p[1] as f64 / 255.0,
            p[2] as f64 / 255.0,
        )
    }

    /// Weighted accumulation: `self += color * weight`.
    #[inline]
    pub fn add(&mut self, color: Rgbv, weight: f64) {
        self.r += color.r * weight;
        self.g += color.g * weight;
        self.b += color.b * weight;
    }

    /// Element-wise multiply.
    #[inline]
    pub fn mul_v(&mut self, k: Rgbv) {
        self.r *= k.r;
        self.g *= k.g;
        self.b *= k.b;
    }

    /// Scalar multiply.
    #[inline]
    pub fn mul(&mut self, k: f64) {
        self.r *= k;
        self.g *= k;
        self.b *= k;
    }

    #[inline]
    pub fn dot(&self, other: Rgbv) -> f64 {
        self.r * other.r + self.g * other.g + self.b * other.b
    }

    /// Clamp each channel to `[0, 1]`.
    #[inline]
    pub fn clamp(&mut self) {
        self.r = self.r.clamp(0.0, 1.0);
        self.g = self.g.clamp(0.0, 1.0);
        self.b = self.b.clamp(0.0, 1.0);
    }

    /// Mean of the three channels.
    #[inline]
    pub fn average(&self) -> f64 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Convert back to an 8-bit pixel with the given alpha.
    ///
    /// Channels are clamped first, so callers never see wrap-around.
    #[inline]
    pub fn to_pixel(self, alpha: u8) -> Rgba {
        [
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b),
            alpha,
        ]
    }
}

#[inline]
fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Calculate luma of an 8-bit pixel in `[0, 1]`.
#[inline]
pub fn luma(p: Rgba) -> f64 {
    LUMA.dot(Rgbv::from_pixel(p))
}
