//! Mapping points between pyramid levels.

use crate::geom::Point;

/// Rescales a point found at `level` to full-resolution coordinates.
///
/// Both coordinates are multiplied by `2^level`; the mapping is exact for
/// integer points and saturates instead of overflowing.
pub fn to_full_resolution(point: Point, level: usize) -> Point {
    Point::new(scale_up(point.x, level), scale_up(point.y, level))
}

/// Maps a point at some level to the next finer level (`x2`).
pub(crate) fn to_finer_level(point: Point) -> Point {
    to_full_resolution(point, 1)
}

fn scale_up(value: usize, level: usize) -> usize {
    u32::try_from(level)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .and_then(|factor| value.checked_mul(factor))
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::{to_finer_level, to_full_resolution};
    use crate::geom::Point;

    #[test]
    fn full_resolution_multiplies_by_power_of_two() {
        for level in 0..=6 {
            for (x, y) in [(0usize, 0usize), (1, 2), (15, 20), (123, 7)] {
                let mapped = to_full_resolution(Point::new(x, y), level);
                assert_eq!(mapped, Point::new(x << level, y << level));
            }
        }
    }

    #[test]
    fn level_zero_is_identity() {
        let p = Point::new(31, 47);
        assert_eq!(to_full_resolution(p, 0), p);
    }

    #[test]
    fn finer_level_doubles() {
        assert_eq!(to_finer_level(Point::new(15, 20)), Point::new(30, 40));
    }

    #[test]
    fn overflow_saturates() {
        let mapped = to_full_resolution(Point::new(usize::MAX / 2 + 1, 1), 1);
        assert_eq!(mapped.x, usize::MAX);
        assert_eq!(mapped.y, 2);
    }
}
