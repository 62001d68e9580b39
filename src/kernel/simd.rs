//! SIMD window sums using the `wide` crate.
//!
//! The inner template loop processes four pixels at a time as `f64x4`, so the
//! accumulation keeps the precision of the scalar reference; only the
//! summation order differs.

use crate::image::ImageView;
use crate::kernel::scalar::{TemplateStats, WindowSums};
use wide::f64x4;

const LANES: usize = 4;

#[inline]
fn load_u8x4(slice: &[u8]) -> f64x4 {
    f64x4::from([
        f64::from(slice[0]),
        f64::from(slice[1]),
        f64::from(slice[2]),
        f64::from(slice[3]),
    ])
}

#[inline]
fn load_f64x4(slice: &[f64]) -> f64x4 {
    f64x4::from([slice[0], slice[1], slice[2], slice[3]])
}

#[inline]
fn hsum(v: f64x4) -> f64 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3]
}

/// SIMD counterpart of `window_sums_scalar`.
pub(crate) fn window_sums_simd(
    image: ImageView<'_, u8>,
    tpl: &TemplateStats,
    x: usize,
    y: usize,
) -> WindowSums {
    let data = image.as_slice();
    let stride = image.stride();
    let tpl_width = tpl.width();
    let simd_end = tpl_width / LANES * LANES;

    let mut dot_vec = f64x4::ZERO;
    let mut sum_vec = f64x4::ZERO;
    let mut sum_sq_vec = f64x4::ZERO;
    let mut tail = WindowSums::default();

    for ty in 0..tpl.height() {
        let start = (y + ty) * stride + x;
        let img_row = &data[start..start + tpl_width];
        let tpl_row = tpl.row(ty);

        let mut tx = 0;
        while tx < simd_end {
            let values = load_u8x4(&img_row[tx..]);
            let weights = load_f64x4(&tpl_row[tx..]);
            dot_vec += weights * values;
            sum_vec += values;
            sum_sq_vec += values * values;
            tx += LANES;
        }

        while tx < tpl_width {
            let v = f64::from(img_row[tx]);
            tail.dot += tpl_row[tx] * v;
            tail.sum += v;
            tail.sum_sq += v * v;
            tx += 1;
        }
    }

    WindowSums {
        dot: hsum(dot_vec) + tail.dot,
        sum: hsum(sum_vec) + tail.sum,
        sum_sq: hsum(sum_sq_vec) + tail.sum_sq,
    }
}
