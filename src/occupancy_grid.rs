use crate::error::{GridError, Result};
use crate::obstacle::Obstacle;
use crate::CARDINAL_OFFSETS;
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use itertools::iproduct;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Immutable traversability snapshot of the map. Blocked cells are stored as [true] in the
/// underlying [BoolGrid]. Connected components of traversable cells are computed once when the
/// snapshot is built and kept alongside it in a [UnionFind] so that unreachable goals can be
/// rejected without flood-filling.
///
/// A new snapshot is built whenever the obstacle set changes; nothing mutates one after
/// construction, so a single snapshot can be shared between concurrent searches.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    blocked: BoolGrid,
    components: UnionFind<usize>,
    width: usize,
    height: usize,
}

impl OccupancyGrid {
    /// Builds a snapshot of a `width` by `height` grid in which every cell covered by one of the
    /// `obstacles` is blocked. Rectangles are clipped to the grid and may overlap each other.
    pub fn build(width: i32, height: i32, obstacles: &[Obstacle]) -> Result<OccupancyGrid> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidGrid { width, height });
        }
        let (w, h) = (width as usize, height as usize);
        let mut grid = OccupancyGrid {
            blocked: BoolGrid::new(w, h, false),
            components: UnionFind::new(w * h),
            width: w,
            height: h,
        };
        for obstacle in obstacles {
            let xs = obstacle.x.max(0)..obstacle.right().min(width);
            let ys = obstacle.y.max(0)..obstacle.bottom().min(height);
            for (y, x) in iproduct!(ys, xs) {
                grid.blocked.set(x as usize, y as usize, true);
            }
        }
        grid.generate_components();
        info!(
            "Built {}x{} occupancy grid from {} obstacles, {} cells blocked",
            w,
            h,
            obstacles.len(),
            grid.cell_count() - grid.traversable_count()
        );
        Ok(grid)
    }

    /// A grid without obstacles.
    pub fn open(width: i32, height: i32) -> Result<OccupancyGrid> {
        OccupancyGrid::build(width, height, &[])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn traversable_count(&self) -> usize {
        iproduct!(0..self.height as i32, 0..self.width as i32)
            .filter(|&(y, x)| !self.blocked.get(x as usize, y as usize))
            .count()
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    pub fn is_traversable(&self, point: Point) -> bool {
        self.in_bounds(point) && !self.blocked.get(point.x as usize, point.y as usize)
    }

    /// Out-of-bounds points count as blocked.
    pub fn is_blocked(&self, point: Point) -> bool {
        !self.is_traversable(point)
    }

    /// Traversable cardinal neighbours of `point` in the fixed order up, down, left, right.
    pub fn neighborhood(&self, point: &Point) -> SmallVec<[Point; 4]> {
        CARDINAL_OFFSETS
            .iter()
            .map(|&(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.is_traversable(*p))
            .collect()
    }

    fn ix(&self, point: &Point) -> usize {
        point.y as usize * self.width + point.x as usize
    }

    /// Retrieves the component id of a traversable [Point].
    pub fn component(&self, point: &Point) -> Option<usize> {
        self.is_traversable(*point)
            .then(|| self.components.find(self.ix(point)))
    }

    /// Checks if start and goal are traversable and on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        self.is_traversable(*start)
            && self.is_traversable(*goal)
            && self.components.equiv(self.ix(start), self.ix(goal))
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }

    /// Links every traversable cell to its traversable right and lower neighbours, which covers
    /// each 4-connected edge exactly once.
    fn generate_components(&mut self) {
        let mut components = UnionFind::new(self.cell_count());
        for (y, x) in iproduct!(0..self.height as i32, 0..self.width as i32) {
            let point = Point::new(x, y);
            if !self.is_traversable(point) {
                continue;
            }
            let parent_ix = self.ix(&point);
            for p in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                if self.is_traversable(p) {
                    components.union(parent_ix, self.ix(&p));
                }
            }
        }
        self.components = components;
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height as i32 {
            let row = (0..self.width as i32)
                .map(|x| if self.blocked.get(x as usize, y as usize) { '#' } else { '.' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        for (w, h) in [(0, 5), (5, 0), (-1, 3), (0, 0)] {
            assert_eq!(
                OccupancyGrid::build(w, h, &[]).unwrap_err(),
                GridError::InvalidGrid {
                    width: w,
                    height: h
                }
            );
        }
    }

    #[test]
    fn marks_obstacle_cells_blocked() {
        let grid = OccupancyGrid::build(4, 3, &[Obstacle::new(1, 1, 2, 1)]).unwrap();
        assert_eq!(grid.to_string(), "....\n.##.\n....\n");
        assert_eq!(grid.traversable_count(), 10);
        assert!(grid.is_blocked(Point::new(2, 1)));
        assert!(grid.is_traversable(Point::new(3, 1)));
    }

    #[test]
    fn clips_obstacles_to_bounds() {
        let grid = OccupancyGrid::build(3, 3, &[Obstacle::new(2, -1, 5, 2)]).unwrap();
        assert_eq!(grid.to_string(), "..#\n...\n...\n");
        let grid = OccupancyGrid::build(3, 3, &[Obstacle::new(10, 10, 2, 2)]).unwrap();
        assert_eq!(grid.traversable_count(), 9);
    }

    #[test]
    fn overlapping_obstacles_stay_blocked() {
        let single = OccupancyGrid::build(5, 5, &[Obstacle::new(0, 0, 3, 3)]).unwrap();
        let layered = OccupancyGrid::build(
            5,
            5,
            &[Obstacle::new(0, 0, 3, 3), Obstacle::new(1, 1, 2, 2)],
        )
        .unwrap();
        assert_eq!(single.to_string(), layered.to_string());
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let grid = OccupancyGrid::open(2, 2).unwrap();
        for p in [
            Point::new(-1, 0),
            Point::new(0, -1),
            Point::new(2, 0),
            Point::new(0, 2),
        ] {
            assert!(!grid.in_bounds(p));
            assert!(grid.is_blocked(p));
        }
    }

    #[test]
    fn neighborhood_order() {
        let grid = OccupancyGrid::open(3, 3).unwrap();
        let center = Point::new(1, 1);
        assert_eq!(
            grid.neighborhood(&center).to_vec(),
            vec![
                Point::new(1, 0),
                Point::new(1, 2),
                Point::new(0, 1),
                Point::new(2, 1)
            ]
        );
        // Corner cells only see in-bounds neighbours
        assert_eq!(
            grid.neighborhood(&Point::new(0, 0)).to_vec(),
            vec![Point::new(0, 1), Point::new(1, 0)]
        );
    }

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // Corresponds to the following 3x2 grid:
        //  ___
        // | # |
        // | # |
        //  ___
        let grid = OccupancyGrid::build(3, 2, &[Obstacle::new(1, 0, 1, 2)]).unwrap();
        let p1 = Point::new(0, 0);
        let p2 = Point::new(1, 1);
        let p3 = Point::new(0, 1);
        let p4 = Point::new(2, 0);
        assert!(grid.component(&p2).is_none());
        assert!(grid.unreachable(&p1, &p2));
        assert!(grid.reachable(&p1, &p3));
        assert!(grid.unreachable(&p1, &p4));
        assert_eq!(grid.component(&p1), grid.component(&p3));
        assert_ne!(grid.component(&p1), grid.component(&p4));
    }

    /// Diagonally touching cells are not connected on a 4-grid.
    #[test]
    fn diagonal_cells_are_separate_components() {
        //  __
        // | #|
        // |# |
        //  __
        let grid = OccupancyGrid::build(
            2,
            2,
            &[Obstacle::new(1, 0, 1, 1), Obstacle::new(0, 1, 1, 1)],
        )
        .unwrap();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(1, 1)));
    }

    /// Asserts that the two corners are connected around a blocked centre.
    #[test]
    fn reachable_around_center() {
        let grid = OccupancyGrid::build(3, 3, &[Obstacle::new(1, 1, 1, 1)]).unwrap();
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(2, 2)));
    }
}
