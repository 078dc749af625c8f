//! Pixel buffer and region types.
//!
//! An [`Image`] is a plain RGBA8 buffer handed over by the caller for the
//! duration of one filter call. A [`Region`] is the rectangle a filter is
//! allowed to modify; everything outside it must come back byte-identical.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// A single RGBA pixel.
pub type Rgba = [u8; 4];

/// An RGBA image with 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is always width * height * 4.
    pub pixels: Vec<u8>,
}

impl Image {
    /// Create a new Image, checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> FilterResult<Self> {
        let img = Self {
            width,
            height,
            pixels,
        };
        img.validate()?;
        Ok(img)
    }

    /// Check that `pixels` holds exactly `width * height` RGBA pixels.
    ///
    /// The fields are public, so an image built by hand can disagree with
    /// its own dimensions.
    pub fn validate(&self) -> FilterResult<()> {
        // usize::MAX stands in for a size no buffer can have
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .unwrap_or(usize::MAX);
        if self.pixels.len() != expected {
            return Err(FilterError::InvalidBuffer {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Create an image where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an Image from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an Image from whatever the external codec produced.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        Self::from_rgba_image(img.into_rgba8())
    }

    /// Convert to an image::RgbaImage for handing back to the codec.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read the pixel at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.offset(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + CHANNELS].copy_from_slice(&color);
    }

    /// Pixel at `(x, y)` clamped to the nearest in-bounds row and column.
    #[inline]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Rgba {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.pixel(cx, cy)
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn pixel_checked(&self, x: i64, y: i64) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            None
        } else {
            Some(self.pixel(x as u32, y as u32))
        }
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned rectangle in image pixel coordinates.
///
/// A zero-area region is legal and means "nothing selected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The region covering the whole image.
    pub fn full(image: &Image) -> Self {
        Self::new(0, 0, image.width, image.height)
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check whether the integer pixel `(x, y)` lies inside the region.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.left as i64
            && y >= self.top as i64
            && x < self.right() as i64
            && y < self.bottom() as i64
    }

    /// Geometric center, used as the pivot for rotate and scale.
    pub fn center(&self) -> (f64, f64) {
        (
            self.left as f64 + self.width as f64 / 2.0,
            self.top as f64 + self.height as f64 / 2.0,
        )
    }

    /// Reject regions that are not fully contained in `image`.
    pub fn validate(&self, image: &Image) -> FilterResult<()> {
        let fits_x = self
            .left
            .checked_add(self.width)
            .is_some_and(|r| r <= image.width);
        let fits_y = self
            .top
            .checked_add(self.height)
            .is_some_and(|b| b <= image.height);
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(FilterError::InvalidRegion {
                region: *self,
                width: image.width,
                height: image.height,
            })
        }
    }

    /// Iterate over every pixel coordinate inside the region, row by row.
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> {
        let (left, right) = (self.left, self.right());
        (self.top..self.bottom()).flat_map(move |y| (left..right).map(move |x| (x, y)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.left, self.top)
    }
}
