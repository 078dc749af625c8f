//! Spatial convolution over a region.
//!
//! Every pixel inside the region is replaced by the kernel-weighted sum of
//! its neighborhood. Neighbors are read from a frozen copy of the source, so
//! a pass never sees its own output. Neighbors outside the image count as
//! transparent black.

use tracing::trace;

use crate::buffer::{Image, Region};
use crate::color::Rgbv;
use crate::kernel::Kernel;

/// Convolve `region` of `image` with `kernel` in place.
///
/// `region` must already be validated against `image`. Alpha of each
/// destination pixel is preserved.
pub fn convolve(image: &mut Image, region: Region, kernel: &Kernel) {
    if region.is_empty() {
        return;
    }
    trace!(
        width = image.width,
        height = image.height,
        %region,
        kernel_size = kernel.size(),
        "convolve"
    );

    let src = image.clone();
    convolve_from(&src, image, region, kernel);
}

/// Convolve reading from `src` and writing into `dst`.
///
/// `src` and `dst` must have the same dimensions.
pub fn convolve_from(src: &Image, dst: &mut Image, region: Region, kernel: &Kernel) {
    let half = kernel.half_size() as i64;
    let size = kernel.size();

    for (x, y) in region.coords() {
        let mut acc = Rgbv::ZERO;
        for ky in 0..size {
            let sy = y as i64 + ky as i64 - half;
            for kx in 0..size {
                let sx = x as i64 + kx as i64 - half;
                if let Some(p) = src.pixel_checked(sx, sy) {
                    acc.add(Rgbv::from_pixel(p), kernel.at(kx, ky));
                }
            }
        }
        acc.clamp();
        let alpha = src.pixel(x, y)[3];
        dst.set_pixel(x, y, acc.to_pixel(alpha));
    }
}
