//! Pyramid level access for the search path, plus a chained Gaussian pyramid.
//!
//! The search path never materializes a full pyramid: [`image_at_level`]
//! resamples the original image once, directly to the size of the requested
//! level. This is faster than repeated blur-and-decimate but aliases fine
//! detail more. [`ImagePyramid`] builds the true chained Gaussian pyramid for
//! callers that want it; the matcher does not use it.

use crate::image::{ImageView, OwnedImage};
use crate::kernel::Kernel;
use crate::util::math::{halve_ceil, halve_ceil_n};
use crate::util::{PyrMatchError, PyrMatchResult};

/// Returns the size of pyramid `level` for a `width x height` image.
///
/// Each level halves both dimensions, rounding up.
pub fn level_size(width: usize, height: usize, level: usize) -> (usize, usize) {
    (halve_ceil_n(width, level), halve_ceil_n(height, level))
}

/// An image at some pyramid level: borrowed at level 0, resampled otherwise.
#[derive(Clone, Debug)]
pub enum LevelImage<'a> {
    Base(ImageView<'a, u8>),
    Resampled(OwnedImage),
}

impl LevelImage<'_> {
    /// Returns a borrowed view of the level image.
    pub fn view(&self) -> ImageView<'_, u8> {
        match self {
            LevelImage::Base(view) => *view,
            LevelImage::Resampled(img) => img.view(),
        }
    }

    pub fn width(&self) -> usize {
        self.view().width()
    }

    pub fn height(&self) -> usize {
        self.view().height()
    }
}

/// Produces `image` at pyramid `level` with a single resampling pass.
pub fn image_at_level<'a, K>(
    kernel: &K,
    image: ImageView<'a, u8>,
    level: usize,
) -> PyrMatchResult<LevelImage<'a>>
where
    K: Kernel + ?Sized,
{
    if level == 0 {
        return Ok(LevelImage::Base(image));
    }
    let (width, height) = level_size(image.width(), image.height(), level);
    Ok(LevelImage::Resampled(kernel.resample(image, width, height)?))
}

/// 5-tap binomial weights; the 2D kernel sums to 256.
const GAUSS_5: [u32; 5] = [1, 4, 6, 4, 1];

/// Owned Gaussian image pyramid (level 0 is the base resolution).
pub struct ImagePyramid {
    levels: Vec<OwnedImage>,
}

impl ImagePyramid {
    /// Builds `max_level + 1` levels by repeated Gaussian blur and decimation.
    ///
    /// Each level is `ceil(dim / 2)` of the previous one and is derived from the
    /// previous level, not from the base.
    pub fn build_u8(base: ImageView<'_, u8>, max_level: usize) -> PyrMatchResult<Self> {
        let mut levels = Vec::with_capacity(max_level + 1);
        levels.push(OwnedImage::from_view(base)?);
        for _ in 0..max_level {
            let prev = match levels.last() {
                Some(prev) => prev,
                None => break,
            };
            let next = pyr_down(prev.view())?;
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Returns all pyramid levels.
    pub fn levels(&self) -> &[OwnedImage] {
        &self.levels
    }

    /// Consumes the pyramid and returns the owned levels.
    pub fn into_levels(self) -> Vec<OwnedImage> {
        self.levels
    }

    /// Returns the number of levels including the base.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|level| level.view())
    }
}

/// Mirrors an out-of-range index without repeating the edge sample.
fn reflect101(idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = idx;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

fn pyr_down(src: ImageView<'_, u8>) -> PyrMatchResult<OwnedImage> {
    let src_width = src.width();
    let src_height = src.height();
    let dst_width = halve_ceil(src_width);
    let dst_height = halve_ceil(src_height);

    // Horizontal pass over every source row, decimated in x.
    let mut tmp = vec![0u32; dst_width * src_height];
    for y in 0..src_height {
        let row = src.row(y).ok_or(PyrMatchError::BufferTooSmall {
            needed: (y + 1).saturating_mul(src.stride()),
            got: src.as_slice().len(),
        })?;
        for dx in 0..dst_width {
            let center = (2 * dx) as isize;
            let mut acc = 0u32;
            for (k, &w) in GAUSS_5.iter().enumerate() {
                let sx = reflect101(center + k as isize - 2, src_width);
                acc += w * u32::from(row[sx]);
            }
            tmp[y * dst_width + dx] = acc;
        }
    }

    // Vertical pass, decimated in y, with rounding.
    let mut dst = Vec::with_capacity(dst_width * dst_height);
    for dy in 0..dst_height {
        let center = (2 * dy) as isize;
        for dx in 0..dst_width {
            let mut acc = 0u32;
            for (k, &w) in GAUSS_5.iter().enumerate() {
                let sy = reflect101(center + k as isize - 2, src_height);
                acc += w * tmp[sy * dst_width + dx];
            }
            dst.push(((acc + 128) >> 8) as u8);
        }
    }

    OwnedImage::new(dst, dst_width, dst_height)
}
