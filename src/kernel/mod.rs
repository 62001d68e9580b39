//! Image-processing primitives the search is built on.
//!
//! The matcher only talks to these through the [`Kernel`] trait: resampling,
//! dense correlation and extremum location. [`CpuKernel`] is the bundled
//! implementation; other backends can be plugged into
//! [`Matcher::with_kernel`](crate::Matcher::with_kernel).

use crate::geom::Point;
use crate::image::{ImageView, OwnedImage};
use crate::search::MatchMethod;
use crate::util::{PyrMatchError, PyrMatchResult};

pub(crate) mod scalar;

#[cfg(feature = "simd")]
pub(crate) mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Dense response surface of a template slid over an image.
///
/// One sample per valid top-left placement: `(W - w + 1) x (H - h + 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseMap {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl ResponseMap {
    /// Wraps a row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> PyrMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(PyrMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(PyrMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(PyrMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the response at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }
}

/// Global minimum and maximum of a response surface with their locations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremes {
    pub min_value: f32,
    pub min_loc: Point,
    pub max_value: f32,
    pub max_loc: Point,
}

/// Backend for the primitives used by the coarse-to-fine search.
///
/// Implementations must be deterministic for identical inputs; the search is
/// otherwise free of shared state, so a `Sync` kernel can serve concurrent
/// searches.
pub trait Kernel {
    /// Resamples `image` to exactly `width x height`.
    fn resample(
        &self,
        image: ImageView<'_, u8>,
        width: usize,
        height: usize,
    ) -> PyrMatchResult<OwnedImage> {
        crate::image::resize::resize_bilinear(image, width, height)
    }

    /// Computes the raw response of `tpl` over every placement in `image`.
    ///
    /// Fails with [`PyrMatchError::TemplateLargerThanRegion`] if the template
    /// does not fit.
    fn correlate(
        &self,
        image: ImageView<'_, u8>,
        tpl: ImageView<'_, u8>,
        method: MatchMethod,
    ) -> PyrMatchResult<ResponseMap>;

    /// Locates the global extremes; the first occurrence in row-major order
    /// wins ties.
    fn locate_extremes(&self, response: &ResponseMap) -> PyrMatchResult<Extremes> {
        scalar::locate_extremes(response)
    }
}

/// CPU implementation of [`Kernel`].
///
/// With the `rayon` feature and `parallel` set, response rows are computed on
/// the rayon pool; the result is identical to the sequential path.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuKernel {
    pub parallel: bool,
}

impl CpuKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a kernel that parallelizes correlation when `rayon` is enabled.
    pub fn parallel() -> Self {
        Self { parallel: true }
    }
}

impl Kernel for CpuKernel {
    fn correlate(
        &self,
        image: ImageView<'_, u8>,
        tpl: ImageView<'_, u8>,
        method: MatchMethod,
    ) -> PyrMatchResult<ResponseMap> {
        if self.parallel {
            correlate_parallel(image, tpl, method)
        } else {
            scalar::correlate(image, tpl, method)
        }
    }
}

#[cfg(feature = "rayon")]
fn correlate_parallel(
    image: ImageView<'_, u8>,
    tpl: ImageView<'_, u8>,
    method: MatchMethod,
) -> PyrMatchResult<ResponseMap> {
    self::rayon::correlate_par(image, tpl, method)
}

#[cfg(not(feature = "rayon"))]
fn correlate_parallel(
    image: ImageView<'_, u8>,
    tpl: ImageView<'_, u8>,
    method: MatchMethod,
) -> PyrMatchResult<ResponseMap> {
    scalar::correlate(image, tpl, method)
}

/// Checks that `tpl` fits in `image` and returns the response size.
pub(crate) fn response_size(
    image: ImageView<'_, u8>,
    tpl: ImageView<'_, u8>,
) -> PyrMatchResult<(usize, usize)> {
    if tpl.width() > image.width() || tpl.height() > image.height() {
        return Err(PyrMatchError::TemplateLargerThanRegion {
            tpl_width: tpl.width(),
            tpl_height: tpl.height(),
            region_width: image.width(),
            region_height: image.height(),
        });
    }
    Ok((
        image.width() - tpl.width() + 1,
        image.height() - tpl.height() + 1,
    ))
}
