//! Starting pyramid level selection.

use crate::util::math::floor_log2;

/// Highest pyramid level the search will start from.
pub const MAX_PYRAMID_LEVEL: usize = 6;

/// Smallest side, in pixels, that the coarsest level should keep.
const MIN_LEVEL_SIDE: usize = 7;

/// Picks the coarsest level for a scene/template pair.
///
/// With `min_dim` the smallest of the four dimensions, the level is
/// `floor(log2(min_dim / 7))` capped at [`MAX_PYRAMID_LEVEL`], or 0 when the
/// quotient is below one.
pub fn select_start_level(
    scene_width: usize,
    scene_height: usize,
    tpl_width: usize,
    tpl_height: usize,
) -> usize {
    let min_dim = scene_width
        .min(scene_height)
        .min(tpl_width)
        .min(tpl_height);
    match floor_log2(min_dim / MIN_LEVEL_SIDE) {
        Some(level) => (level as usize).min(MAX_PYRAMID_LEVEL),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{select_start_level, MAX_PYRAMID_LEVEL};

    #[test]
    fn twenty_pixel_template_starts_at_level_one() {
        assert_eq!(select_start_level(100, 100, 20, 20), 1);
    }

    #[test]
    fn small_inputs_start_at_full_resolution() {
        assert_eq!(select_start_level(100, 100, 13, 13), 0);
        assert_eq!(select_start_level(100, 100, 6, 40), 0);
        assert_eq!(select_start_level(10, 10, 10, 10), 0);
        assert_eq!(select_start_level(100, 100, 14, 14), 1);
    }

    #[test]
    fn uses_the_smallest_of_all_four_dimensions() {
        assert_eq!(select_start_level(1000, 30, 200, 200), 2);
        assert_eq!(select_start_level(1000, 1000, 200, 56), 3);
    }

    #[test]
    fn level_is_capped() {
        assert_eq!(select_start_level(4000, 4000, 2000, 2000), MAX_PYRAMID_LEVEL);
        assert_eq!(select_start_level(448, 448, 448, 448), 6);
        assert_eq!(select_start_level(447, 447, 447, 447), 5);
    }

    #[test]
    fn level_is_bounded_for_all_small_dimensions() {
        for a in 1..200 {
            for b in [1usize, 7, 13, 14, 63, 500, 10_000] {
                let level = select_start_level(b.max(a), b.max(a), a, b);
                assert!(level <= MAX_PYRAMID_LEVEL);
            }
        }
    }
}
