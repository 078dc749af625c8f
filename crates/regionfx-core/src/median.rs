//! Median (order-statistic) filter.
//!
//! Each channel of each region pixel becomes the median of that channel over
//! a square window. Unlike convolution, neighbors past the image edge repeat
//! the nearest in-bounds row or column.

use tracing::trace;

use crate::buffer::{Image, Region};

/// Apply a `window_size` x `window_size` median filter to `region` in place.
///
/// `window_size` must be odd. Alpha is left unchanged.
pub fn median(image: &mut Image, region: Region, window_size: usize) {
    if region.is_empty() {
        return;
    }
    debug_assert!(window_size % 2 == 1, "median window must be odd");
    trace!(
        width = image.width,
        height = image.height,
        %region,
        window_size,
        "median"
    );

    let src = image.clone();
    let half = (window_size / 2) as i64;
    let count = window_size * window_size;
    let mid = count / 2;
    let mut window: [Vec<u8>; 3] = [
        Vec::with_capacity(count),
        Vec::with_capacity(count),
        Vec::with_capacity(count),
    ];

    for (x, y) in region.coords() {
        for channel in &mut window {
            channel.clear();
        }
        for dy in -half..=half {
            for dx in -half..=half {
                let p = src.pixel_clamped(x as i64 + dx, y as i64 + dy);
                for (c, channel) in window.iter_mut().enumerate() {
                    channel.push(p[c]);
                }
            }
        }

        let mut out = src.pixel(x, y);
        for (c, channel) in window.iter_mut().enumerate() {
            let (_, m, _) = channel.select_nth_unstable(mid);
            out[c] = *m;
        }
        image.set_pixel(x, y, out);
    }
}
