//! Single-pass bilinear resampling.
//!
//! Sample centers follow the half-pixel convention
//! `src = (dst + 0.5) * scale - 0.5`, clamped to the image, which makes an
//! exact 2x reduction average each 2x2 block. Results are rounded half-up.

use crate::image::{ImageView, OwnedImage};
use crate::util::math::round_to_u8;
use crate::util::{PyrMatchError, PyrMatchResult};

/// Source taps for one destination coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f32,
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    (0..dst_len)
        .map(|d| {
            let s = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let i0 = s.floor() as usize;
            if i0 + 1 >= src_len {
                Tap {
                    i0: src_len - 1,
                    i1: src_len - 1,
                    frac: 0.0,
                }
            } else {
                Tap {
                    i0,
                    i1: i0 + 1,
                    frac: s - i0 as f32,
                }
            }
        })
        .collect()
}

/// Resamples `src` to exactly `dst_width x dst_height` pixels.
pub(crate) fn resize_bilinear(
    src: ImageView<'_, u8>,
    dst_width: usize,
    dst_height: usize,
) -> PyrMatchResult<OwnedImage> {
    if dst_width == 0 || dst_height == 0 {
        return Err(PyrMatchError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        });
    }
    if dst_width == src.width() && dst_height == src.height() {
        return OwnedImage::from_view(src);
    }

    let x_taps = taps(src.width(), dst_width);
    let y_taps = taps(src.height(), dst_height);
    let len = dst_width
        .checked_mul(dst_height)
        .ok_or(PyrMatchError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        })?;
    let mut dst = Vec::with_capacity(len);

    for ty in &y_taps {
        let row0 = source_row(src, ty.i0)?;
        let row1 = source_row(src, ty.i1)?;
        for tx in &x_taps {
            let top = lerp(row0[tx.i0], row0[tx.i1], tx.frac);
            let bottom = lerp(row1[tx.i0], row1[tx.i1], tx.frac);
            dst.push(round_to_u8(top + (bottom - top) * ty.frac));
        }
    }

    OwnedImage::new(dst, dst_width, dst_height)
}

#[inline]
fn lerp(a: u8, b: u8, t: f32) -> f32 {
    let a = f32::from(a);
    a + (f32::from(b) - a) * t
}

fn source_row(src: ImageView<'_, u8>, y: usize) -> PyrMatchResult<&[u8]> {
    src.row(y).ok_or(PyrMatchError::BufferTooSmall {
        needed: (y + 1).saturating_mul(src.stride()),
        got: src.as_slice().len(),
    })
}
