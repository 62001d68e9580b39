//! Search-window planning for the refinement levels.
//!
//! A coarse match at level `L + 1` is doubled to level `L`, pulled back by a
//! quarter template on the leading edge and given one and a half template
//! spans of extent. The window is clipped so that it ends at least one pixel
//! before the scene border.

use crate::geom::{Point, SearchRegion};
use crate::search::coords::to_finer_level;
use crate::util::{PyrMatchError, PyrMatchResult};

/// Plans the search window at the finer level from the coarser match `prev`.
///
/// `scene_*` and `tpl_*` are the sizes at the finer level. Fails with
/// [`PyrMatchError::RoiOutOfBounds`] if clipping leaves an empty window, which
/// only happens for points that did not come from a valid coarser placement.
pub fn plan_search_region(
    prev: Point,
    scene_width: usize,
    scene_height: usize,
    tpl_width: usize,
    tpl_height: usize,
) -> PyrMatchResult<SearchRegion> {
    let center = to_finer_level(prev);
    let x = center.x.saturating_sub(tpl_width / 4);
    let y = center.y.saturating_sub(tpl_height / 4);
    let width = clip_extent(x, tpl_width * 3 / 2, scene_width);
    let height = clip_extent(y, tpl_height * 3 / 2, scene_height);

    let region = SearchRegion::new(x, y, width, height);
    if !region.fits_within(scene_width, scene_height) {
        return Err(PyrMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: scene_width,
            img_height: scene_height,
        });
    }
    Ok(region)
}

/// Shrinks `extent` so that `start + extent <= limit - 1` whenever it would
/// reach the border.
fn clip_extent(start: usize, extent: usize, limit: usize) -> usize {
    if start.saturating_add(extent) >= limit {
        limit.saturating_sub(start.saturating_add(1))
    } else {
        extent
    }
}
