//! Scalar reference kernels for correlation and extremum location.
//!
//! Window statistics are accumulated in `f64` and the response is stored as
//! `f32`. Normalized methods follow the usual guard for flat windows: if the
//! numerator is within 12.5% above the denominator it snaps to +-1, and
//! anything beyond (including a zero denominator) becomes 0, or 1 for the
//! normalized squared difference.

use crate::geom::Point;
use crate::image::ImageView;
use crate::kernel::{response_size, Extremes, ResponseMap};
use crate::search::MatchMethod;
use crate::util::{PyrMatchError, PyrMatchResult};

#[cfg(feature = "simd")]
use crate::kernel::simd::window_sums_simd as window_sums;
#[cfg(not(feature = "simd"))]
use self::window_sums_scalar as window_sums;

/// Template samples and their global sums, computed once per correlation.
pub(crate) struct TemplateStats {
    values: Vec<f64>,
    width: usize,
    height: usize,
    sum: f64,
    sum_sq: f64,
}

impl TemplateStats {
    pub(crate) fn from_view(tpl: ImageView<'_, u8>) -> PyrMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let mut values = Vec::with_capacity(width * height);
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or(PyrMatchError::BufferTooSmall {
                needed: (y + 1).saturating_mul(tpl.stride()),
                got: tpl.as_slice().len(),
            })?;
            for &value in row {
                let v = f64::from(value);
                values.push(v);
                sum += v;
                sum_sq += v * v;
            }
        }
        Ok(Self {
            values,
            width,
            height,
            sum,
            sum_sq,
        })
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Row `ty` of the template samples.
    pub(crate) fn row(&self, ty: usize) -> &[f64] {
        &self.values[ty * self.width..(ty + 1) * self.width]
    }

    fn count(&self) -> f64 {
        (self.width * self.height) as f64
    }

    fn mean(&self) -> f64 {
        self.sum / self.count()
    }

    fn centered_sum_sq(&self) -> f64 {
        (self.sum_sq - self.sum * self.sum / self.count()).max(0.0)
    }
}

/// Sums over one template-sized window of the image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct WindowSums {
    /// `sum T * I`
    pub(crate) dot: f64,
    /// `sum I`
    pub(crate) sum: f64,
    /// `sum I^2`
    pub(crate) sum_sq: f64,
}

/// Accumulates [`WindowSums`] for the placement with top-left `(x, y)`.
///
/// The caller guarantees that the placement is valid for `image`.
#[cfg_attr(feature = "simd", allow(dead_code))]
pub(crate) fn window_sums_scalar(
    image: ImageView<'_, u8>,
    tpl: &TemplateStats,
    x: usize,
    y: usize,
) -> WindowSums {
    let data = image.as_slice();
    let stride = image.stride();
    let tpl_width = tpl.width();
    let mut acc = WindowSums::default();
    for ty in 0..tpl.height() {
        let start = (y + ty) * stride + x;
        let img_row = &data[start..start + tpl_width];
        for (&t, &value) in tpl.row(ty).iter().zip(img_row) {
            let v = f64::from(value);
            acc.dot += t * v;
            acc.sum += v;
            acc.sum_sq += v * v;
        }
    }
    acc
}

fn normalize(num: f64, denom: f64, lower_is_better: bool) -> f64 {
    if num.abs() < denom {
        num / denom
    } else if num.abs() < denom * 1.125 {
        if num > 0.0 {
            1.0
        } else {
            -1.0
        }
    } else if lower_is_better {
        1.0
    } else {
        0.0
    }
}

/// Converts window sums into the raw response value for `method`.
pub(crate) fn score_window(method: MatchMethod, tpl: &TemplateStats, w: WindowSums) -> f32 {
    let (num, denom) = if method.is_mean_centered() {
        let var_i = (w.sum_sq - w.sum * w.sum / tpl.count()).max(0.0);
        (
            w.dot - tpl.mean() * w.sum,
            (tpl.centered_sum_sq() * var_i).sqrt(),
        )
    } else if method.is_lower_better() {
        (
            (tpl.sum_sq - 2.0 * w.dot + w.sum_sq).max(0.0),
            (tpl.sum_sq * w.sum_sq).sqrt(),
        )
    } else {
        (w.dot, (tpl.sum_sq * w.sum_sq).sqrt())
    };
    if method.is_normalized() {
        normalize(num, denom, method.is_lower_better()) as f32
    } else {
        num as f32
    }
}

/// Fills one response row (placements `(0..row.len(), y)`).
pub(crate) fn fill_row(
    image: ImageView<'_, u8>,
    tpl: &TemplateStats,
    method: MatchMethod,
    y: usize,
    row: &mut [f32],
) {
    for (x, out) in row.iter_mut().enumerate() {
        *out = score_window(method, tpl, window_sums(image, tpl, x, y));
    }
}

/// Computes the dense response of `tpl` over `image`.
pub(crate) fn correlate(
    image: ImageView<'_, u8>,
    tpl: ImageView<'_, u8>,
    method: MatchMethod,
) -> PyrMatchResult<ResponseMap> {
    let (resp_width, resp_height) = response_size(image, tpl)?;
    let stats = TemplateStats::from_view(tpl)?;
    let mut data = vec![0.0f32; resp_width * resp_height];
    for (y, row) in data.chunks_mut(resp_width).enumerate() {
        fill_row(image, &stats, method, y, row);
    }
    ResponseMap::new(data, resp_width, resp_height)
}

/// Row-major scan for the global minimum and maximum; NaN samples are skipped.
pub(crate) fn locate_extremes(response: &ResponseMap) -> PyrMatchResult<Extremes> {
    let width = response.width();
    let mut min: Option<(f32, usize)> = None;
    let mut max: Option<(f32, usize)> = None;
    for (idx, &value) in response.as_slice().iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if min.map_or(true, |(best, _)| value < best) {
            min = Some((value, idx));
        }
        if max.map_or(true, |(best, _)| value > best) {
            max = Some((value, idx));
        }
    }
    match (min, max) {
        (Some((min_value, min_idx)), Some((max_value, max_idx))) => Ok(Extremes {
            min_value,
            min_loc: Point::new(min_idx % width, min_idx / width),
            max_value,
            max_loc: Point::new(max_idx % width, max_idx / width),
        }),
        _ => Err(PyrMatchError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::{correlate, locate_extremes};
    use crate::geom::Point;
    use crate::image::ImageView;
    use crate::kernel::ResponseMap;
    use crate::search::MatchMethod;

    fn make_image(width: usize, height: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 37 + y * 91 + x * y * 7) % 251) as u8);
            }
        }
        data
    }

    fn patch(data: &[u8], stride: usize, x0: usize, y0: usize, w: usize, h: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            let start = (y0 + y) * stride + x0;
            out.extend_from_slice(&data[start..start + w]);
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn brute_force(
        image: &[u8],
        stride: usize,
        tpl: &[u8],
        tw: usize,
        th: usize,
        x: usize,
        y: usize,
        method: MatchMethod,
    ) -> f64 {
        let n = (tw * th) as f64;
        let mut t = Vec::new();
        let mut i = Vec::new();
        for ty in 0..th {
            for tx in 0..tw {
                t.push(tpl[ty * tw + tx] as f64);
                i.push(image[(y + ty) * stride + x + tx] as f64);
            }
        }
        let mt = t.iter().sum::<f64>() / n;
        let mi = i.iter().sum::<f64>() / n;
        let dot = |a: &[f64], b: &[f64]| a.iter().zip(b).map(|(p, q)| p * q).sum::<f64>();
        match method {
            MatchMethod::SumSquaredDifference => {
                t.iter().zip(&i).map(|(p, q)| (p - q).powi(2)).sum()
            }
            MatchMethod::SumSquaredDifferenceNormalized => {
                // Ratios at or above 1 saturate to 1.
                let ssd: f64 = t.iter().zip(&i).map(|(p, q)| (p - q).powi(2)).sum();
                (ssd / (dot(&t, &t) * dot(&i, &i)).sqrt()).min(1.0)
            }
            MatchMethod::CrossCorrelation => dot(&t, &i),
            MatchMethod::CrossCorrelationNormalized => {
                dot(&t, &i) / (dot(&t, &t) * dot(&i, &i)).sqrt()
            }
            MatchMethod::CorrelationCoefficient | MatchMethod::CorrelationCoefficientNormalized => {
                let tc: Vec<f64> = t.iter().map(|v| v - mt).collect();
                let ic: Vec<f64> = i.iter().map(|v| v - mi).collect();
                let num = dot(&tc, &ic);
                if method == MatchMethod::CorrelationCoefficient {
                    num
                } else {
                    num / (dot(&tc, &tc) * dot(&ic, &ic)).sqrt()
                }
            }
        }
    }

    #[test]
    fn every_method_matches_bruteforce() {
        let (iw, ih) = (13, 11);
        let image = make_image(iw, ih);
        let (tw, th) = (4, 3);
        let tpl: Vec<u8> = (0..tw * th).map(|v| ((v * 53 + 11) % 200) as u8).collect();
        let image_view = ImageView::from_slice(&image, iw, ih).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, tw, th).unwrap();

        for method in MatchMethod::ALL {
            let response = correlate(image_view, tpl_view, method).unwrap();
            assert_eq!((response.width(), response.height()), (10, 9));
            for (x, y) in [(0, 0), (3, 5), (9, 8), (6, 2)] {
                let expected = brute_force(&image, iw, &tpl, tw, th, x, y, method);
                let got = response.get(x, y).unwrap() as f64;
                let tol = 1e-4 * expected.abs().max(1.0);
                assert!(
                    (got - expected).abs() <= tol,
                    "{method:?} at ({x},{y}): got {got}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn exact_patch_is_the_best_location_for_every_method() {
        let (iw, ih) = (24, 20);
        let image = make_image(iw, ih);
        let tpl = patch(&image, iw, 9, 7, 6, 5);
        let image_view = ImageView::from_slice(&image, iw, ih).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, 6, 5).unwrap();

        for method in [
            MatchMethod::SumSquaredDifference,
            MatchMethod::SumSquaredDifferenceNormalized,
            MatchMethod::CrossCorrelationNormalized,
            MatchMethod::CorrelationCoefficientNormalized,
        ] {
            let response = correlate(image_view, tpl_view, method).unwrap();
            let extremes = locate_extremes(&response).unwrap();
            let (loc, _) = method.score_from_extremes(&extremes);
            assert_eq!(loc, Point::new(9, 7), "{method:?}");
        }
    }

    #[test]
    fn strided_views_correlate_like_contiguous_ones() {
        let (iw, ih) = (10, 8);
        let image = make_image(iw, ih);
        let tpl = patch(&image, iw, 2, 3, 3, 3);
        let full = ImageView::from_slice(&image, iw, ih).unwrap();
        let roi = full.roi(1, 1, 7, 6).unwrap();
        let copied = patch(&image, iw, 1, 1, 7, 6);
        let contiguous = ImageView::from_slice(&copied, 7, 6).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, 3, 3).unwrap();

        let a = correlate(roi, tpl_view, MatchMethod::CorrelationCoefficientNormalized).unwrap();
        let b = correlate(contiguous, tpl_view, MatchMethod::CorrelationCoefficientNormalized)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn flat_windows_follow_the_zero_denominator_rule() {
        let image = vec![0u8; 16];
        let tpl = vec![0u8; 4];
        let image_view = ImageView::from_slice(&image, 4, 4).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, 2, 2).unwrap();

        let ccoeff =
            correlate(image_view, tpl_view, MatchMethod::CorrelationCoefficientNormalized).unwrap();
        assert!(ccoeff.as_slice().iter().all(|&v| v == 0.0));
        let sqdiff =
            correlate(image_view, tpl_view, MatchMethod::SumSquaredDifferenceNormalized).unwrap();
        assert!(sqdiff.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn extremes_prefer_first_occurrence() {
        let map = ResponseMap::new(vec![0.5, 0.9, 0.1, 0.9, f32::NAN, 0.1], 3, 2).unwrap();
        let extremes = locate_extremes(&map).unwrap();
        assert_eq!(extremes.max_loc, Point::new(1, 0));
        assert_eq!(extremes.min_loc, Point::new(2, 0));
        assert_eq!(extremes.max_value, 0.9);
        assert_eq!(extremes.min_value, 0.1);
    }

    #[test]
    fn extremes_of_all_nan_surface_is_an_error() {
        let map = ResponseMap::new(vec![f32::NAN; 2], 2, 1).unwrap();
        assert!(locate_extremes(&map).is_err());
    }
}
