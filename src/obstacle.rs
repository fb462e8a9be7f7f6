use grid_util::point::Point;
use itertools::iproduct;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle of blocked cells, expressed in grid-cell units with its origin at the
/// top-left corner. Conversion from any pixel space has to happen before an [Obstacle] is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Obstacle {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Obstacle {
        Obstacle { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Axis-aligned intersection test. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Obstacle) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Checks that the extent is at least one cell on both axes and that the whole rectangle
    /// lies inside a `width` by `height` grid.
    pub fn is_within(&self, width: i32, height: i32) -> bool {
        self.w >= 1
            && self.h >= 1
            && self.x >= 0
            && self.y >= 0
            && self.right() <= width
            && self.bottom() <= height
    }

    /// Every cell covered by the rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        iproduct!(self.y..self.bottom(), self.x..self.right()).map(|(y, x)| Point::new(x, y))
    }
}

/// Returns the index of the first obstacle in `existing` that overlaps `candidate`. The entry at
/// `ignore` is skipped, which lets a store validate a move or resize of an obstacle it already
/// holds against all the others.
pub fn find_overlap(
    candidate: &Obstacle,
    existing: &[Obstacle],
    ignore: Option<usize>,
) -> Option<usize> {
    existing
        .iter()
        .enumerate()
        .filter(|(ix, _)| Some(*ix) != ignore)
        .find(|(_, other)| candidate.overlaps(other))
        .map(|(ix, _)| ix)
}
