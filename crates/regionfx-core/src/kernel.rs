//! Convolution kernels.
//!
//! A [`Kernel`] is an immutable odd-sized square matrix of weights. The
//! builders here produce normalized Gaussian blurs and the unsharp-mask
//! sharpening kernel derived from them.

use serde::{Deserialize, Serialize};

use crate::buffer::Image;
use crate::error::{FilterError, FilterResult};

/// Longest side, in pixels, of a [`Kernel::preview`] swatch.
pub const MAX_PREVIEW_SIDE: u32 = 1024;

/// Immutable square matrix of `f64` weights with odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    data: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from row-major data.
    ///
    /// Fails when `size` is even or zero, or when `data` is not `size * size` long.
    pub fn new(size: usize, data: Vec<f64>) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidParameter {
                name: "kernel size",
                value: size.to_string(),
                reason: "kernel size must be odd and at least 1".to_string(),
            });
        }
        if data.len() != size * size {
            return Err(FilterError::InvalidParameter {
                name: "kernel data",
                value: data.len().to_string(),
                reason: format!("expected {} cells for a {}x{} kernel", size * size, size, size),
            });
        }
        Ok(Self { size, data })
    }

    /// The `(2 * half_size + 1)`-wide impulse: 1 at the center, 0 elsewhere.
    pub fn identity(half_size: usize) -> Self {
        let size = 2 * half_size + 1;
        let mut data = vec![0.0; size * size];
        data[half_size * size + half_size] = 1.0;
        Self { size, data }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center cell to the edge.
    #[inline]
    pub fn half_size(&self) -> usize {
        self.size / 2
    }

    /// Weight at column `x`, row `y`, both in `[0, size)`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.size + x]
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn weights(&self) -> &[f64] {
        &self.data
    }

    /// Render the kernel as a grayscale swatch, `cell_px` pixels per cell.
    ///
    /// Weights are mapped linearly from `[min, max]` onto `[0, 255]`; a flat
    /// kernel renders mid-gray. `cell_px` is clamped so the swatch side stays
    /// within [`MAX_PREVIEW_SIDE`] (one pixel per cell at minimum).
    pub fn preview(&self, cell_px: u32) -> Image {
        let cells = u32::try_from(self.size).unwrap_or(u32::MAX);
        let cell_px = cell_px.clamp(1, (MAX_PREVIEW_SIDE / cells).max(1));
        let side = cells.saturating_mul(cell_px);
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        let mut swatch = Image::filled(side, side, [0, 0, 0, 255]);
        for cy in 0..self.size {
            for cx in 0..self.size {
                let level = if range > f64::EPSILON {
                    ((self.at(cx, cy) - min) / range * 255.0).round() as u8
                } else {
                    128
                };
                let (x0, y0) = (cx as u32 * cell_px, cy as u32 * cell_px);
                for y in y0..y0 + cell_px {
                    for x in x0..x0 + cell_px {
                        swatch.set_pixel(x, y, [level, level, level, 255]);
                    }
                }
            }
        }
        swatch
    }
}

/// Normalized 2D Gaussian kernel of side `2 * half_size + 1`.
///
/// Cell `(x, y)` holds the Gaussian density at offset
/// `(x - half_size, y - half_size)`; all cells sum to 1.
pub fn gaussian(half_size: usize, sigma: f64) -> Kernel {
    let size = 2 * half_size + 1;
    let two_sigma2 = 2.0 * sigma * sigma;
    let norm = 1.0 / (std::f64::consts::PI * two_sigma2);
    let h = half_size as i64;

    let mut data = Vec::with_capacity(size * size);
    for dy in -h..=h {
        for dx in -h..=h {
            let d2 = (dx * dx + dy * dy) as f64;
            data.push(norm * (-d2 / two_sigma2).exp());
        }
    }

    let sum: f64 = data.iter().sum();
    for w in &mut data {
        *w /= sum;
    }

    Kernel { size, data }
}

/// Sharpening kernel: `identity + amount * (identity - gaussian)`.
///
/// The center cell is `1 + amount * (1 - g_center)`, every other cell is
/// `-amount * g`.
pub fn unsharp(half_size: usize, sigma: f64, amount: f64) -> Kernel {
    let blur = gaussian(half_size, sigma);
    let center = half_size * blur.size + half_size;
    let data = blur
        .data
        .iter()
        .enumerate()
        .map(|(i, &g)| {
            if i == center {
                1.0 + amount * (1.0 - g)
            } else {
                -amount * g
            }
        })
        .collect();
    Kernel {
        size: blur.size,
        data,
    }
}

/// How a blur radius (sigma) is turned into a kernel half size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum KernelSizing {
    /// `max(1, floor(2 * sigma) - 1)`: stronger blur gets a larger kernel.
    #[default]
    Heuristic,
    /// Always use this half size regardless of sigma.
    Fixed { half_size: usize },
}

impl KernelSizing {
    pub fn half_size(self, sigma: f64) -> usize {
        match self {
            KernelSizing::Heuristic => heuristic_half_size(sigma),
            KernelSizing::Fixed { half_size } => half_size,
        }
    }
}

/// Default kernel radius policy: `max(1, floor(2 * sigma) - 1)`.
pub fn heuristic_half_size(sigma: f64) -> usize {
    let h = (2.0 * sigma).floor() as i64 - 1;
    h.max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_even_size() {
        assert!(Kernel::new(2, vec![0.0; 4]).is_err());
        assert!(Kernel::new(0, vec![]).is_err());
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(Kernel::new(3, vec![0.0; 8]).is_err());
        assert!(Kernel::new(3, vec![0.0; 9]).is_ok());
    }

    #[test]
    fn test_identity() {
        let k = Kernel::identity(1);
        assert_eq!(k.size(), 3);
        assert_eq!(k.at(1, 1), 1.0);
        assert_eq!(k.sum(), 1.0);
    }

    #[test]
    fn test_gaussian_normalized() {
        for half in 0..6 {
            for sigma in [0.1, 0.5, 1.0, 2.5, 10.0] {
                let k = gaussian(half, sigma);
                assert_eq!(k.size(), 2 * half + 1);
                assert!(
                    (k.sum() - 1.0).abs() < 1e-9,
                    "sum was {} for half={} sigma={}",
                    k.sum(),
                    half,
                    sigma
                );
            }
        }
    }

    #[test]
    fn test_gaussian_symmetric_and_peaked() {
        let k = gaussian(2, 1.0);
        let c = k.at(2, 2);
        for y in 0..5 {
            for x in 0..5 {
                assert!(k.at(x, y) <= c);
                assert!((k.at(x, y) - k.at(4 - x, y)).abs() < 1e-15);
                assert!((k.at(x, y) - k.at(y, x)).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_unsharp_zero_amount_is_identity() {
        let k = unsharp(2, 1.5, 0.0);
        let id = Kernel::identity(2);
        for (a, b) in k.weights().iter().zip(id.weights()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unsharp_cells() {
        let g = gaussian(1, 1.0);
        let k = unsharp(1, 1.0, 2.0);
        assert!((k.at(1, 1) - (1.0 + 2.0 * (1.0 - g.at(1, 1)))).abs() < 1e-12);
        assert!((k.at(0, 0) + 2.0 * g.at(0, 0)).abs() < 1e-12);
        // identity + amount * (identity - blur) still sums to 1
        assert!((k.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_half_size() {
        assert_eq!(heuristic_half_size(0.1), 1);
        assert_eq!(heuristic_half_size(1.0), 1);
        assert_eq!(heuristic_half_size(1.5), 2);
        assert_eq!(heuristic_half_size(3.0), 5);
        assert_eq!(heuristic_half_size(10.0), 19);
    }

    #[test]
    fn test_fixed_sizing() {
        let sizing = KernelSizing::Fixed { half_size: 3 };
        assert_eq!(sizing.half_size(0.1), 3);
        assert_eq!(sizing.half_size(9.0), 3);
        assert_eq!(KernelSizing::default(), KernelSizing::Heuristic);
    }

    #[test]
    fn test_preview_dimensions_and_levels() {
        let k = Kernel::identity(1);
        let swatch = k.preview(4);
        assert_eq!(swatch.width, 12);
        assert_eq!(swatch.height, 12);
        assert_eq!(swatch.pixel(5, 5), [255, 255, 255, 255]);
        assert_eq!(swatch.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_preview_flat_kernel_is_gray() {
        let k = Kernel::new(1, vec![1.0]).unwrap();
        let swatch = k.preview(2);
        assert_eq!(swatch.pixel(1, 1), [128, 128, 128, 255]);
    }

    #[test]
    fn test_preview_cell_size_is_clamped() {
        let k = Kernel::identity(3);
        for cell_px in [u32::MAX, u32::MAX / 7 + 1, 4096] {
            let swatch = k.preview(cell_px);
            // 1024 / 7 = 146 px per cell
            assert_eq!((swatch.width, swatch.height), (7 * 146, 7 * 146));
            assert!(swatch.validate().is_ok());
        }
        assert_eq!(k.preview(0).width, 7);
        assert_eq!(Kernel::identity(64).preview(u32::MAX).width, 129 * 7);
    }
}
