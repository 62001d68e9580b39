//! Single-level best match: correlation, extremum and sign normalization.

use crate::geom::Point;
use crate::image::ImageView;
use crate::kernel::Kernel;
use crate::search::MatchMethod;
use crate::util::PyrMatchResult;

/// Best placement found at one pyramid level.
///
/// `point` is the top-left placement in the coordinates of the image that was
/// searched; `score` is always "higher is better".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCandidate {
    pub point: Point,
    pub score: f32,
    pub level: usize,
}

/// Correlates `tpl` over all of `scene` and returns the best placement.
///
/// Fails with `TemplateLargerThanRegion` if `scene` is smaller than the
/// template in either dimension.
pub fn best_match<K>(
    kernel: &K,
    scene: ImageView<'_, u8>,
    tpl: ImageView<'_, u8>,
    method: MatchMethod,
    level: usize,
) -> PyrMatchResult<MatchCandidate>
where
    K: Kernel + ?Sized,
{
    let response = kernel.correlate(scene, tpl, method)?;
    let extremes = kernel.locate_extremes(&response)?;
    let (point, score) = method.score_from_extremes(&extremes);
    Ok(MatchCandidate {
        point,
        score,
        level,
    })
}
