//! Integer geometry shared by the search stages.

/// Integer pixel coordinate (column `x`, row `y`).
///
/// A point is always expressed relative to one pyramid level; level 0 is the
/// full-resolution scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Translates the point by a region origin.
    pub fn offset_by(self, origin: Point) -> Self {
        Self {
            x: self.x + origin.x,
            y: self.y + origin.y,
        }
    }
}

/// Axis-aligned search window inside a scene image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchRegion {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl SearchRegion {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner of the region.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns true if the region has positive area and fits in `width x height`.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|end| end <= width)
            && self.y.checked_add(self.height).is_some_and(|end| end <= height)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, SearchRegion};

    #[test]
    fn offset_adds_origin() {
        let p = Point::new(3, 4).offset_by(Point::new(10, 20));
        assert_eq!(p, Point::new(13, 24));
    }

    #[test]
    fn fits_within_checks_every_edge() {
        assert!(SearchRegion::new(0, 0, 4, 4).fits_within(4, 4));
        assert!(!SearchRegion::new(1, 0, 4, 4).fits_within(4, 4));
        assert!(!SearchRegion::new(0, 1, 4, 4).fits_within(4, 4));
        assert!(!SearchRegion::new(0, 0, 0, 4).fits_within(4, 4));
        assert!(!SearchRegion::new(usize::MAX, 0, 2, 1).fits_within(4, 4));
    }
}
