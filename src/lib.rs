//! # shelf_pathfinding
//!
//! Shortest walkable routes on a map of rectangular obstacles. A list of [Obstacle]s is turned
//! into an immutable [OccupancyGrid] snapshot, requested endpoints are snapped onto traversable
//! cells with [resolve], and [find_path] runs
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over the 4-connected grid with unit
//! move costs and the Manhattan distance as heuristic. Connected components are computed when a
//! snapshot is built so that searches between disconnected cells return immediately.
//!
//! Snapshots are never mutated after [build] returns, so any number of searches may run against
//! the same snapshot from different threads.
//!
//! ```
//! use shelf_pathfinding::{build, find_path, path_length, Obstacle, Point};
//!
//! // |S  |
//! // | # |
//! // |  E|
//! let grid = build(3, 3, &[Obstacle::new(1, 1, 1, 1)]).unwrap();
//! let path = find_path(Point::new(0, 0), Point::new(2, 2), &grid);
//! assert_eq!(path_length(&path), Some(4));
//! ```
pub mod astar;
pub mod error;
pub mod obstacle;
pub mod occupancy_grid;
pub mod resolve;
pub mod solver;

pub use error::{GridError, Result};
pub use grid_util::point::Point;
pub use obstacle::{find_overlap, Obstacle};
pub use occupancy_grid::OccupancyGrid;
pub use solver::{PathFinder, PathRequest};

use itertools::Itertools;

/// Neighbour offsets in expansion and probing order: up, down, left, right.
pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Builds an [OccupancyGrid] of `width` by `height` cells with every obstacle cell blocked.
pub fn build(width: i32, height: i32, obstacles: &[Obstacle]) -> Result<OccupancyGrid> {
    OccupancyGrid::build(width, height, obstacles)
}

/// Snaps `point` onto a traversable cell, see [resolve::resolve].
pub fn resolve(point: Point, grid: &OccupancyGrid) -> Result<Point> {
    resolve::resolve(point, grid)
}

/// Shortest 4-connected path with the default [PathFinder] settings. Empty if there is none.
pub fn find_path(start: Point, end: Point, grid: &OccupancyGrid) -> Vec<Point> {
    PathFinder::default().find_path(start, end, grid)
}

pub fn overlaps(a: &Obstacle, b: &Obstacle) -> bool {
    a.overlaps(b)
}

/// Number of steps along a path, or [None] for the empty path that signals no route.
pub fn path_length(path: &[Point]) -> Option<usize> {
    path.len().checked_sub(1)
}

/// Checks that every step of the path moves exactly one cell along exactly one axis.
pub fn is_contiguous(path: &[Point]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| a.manhattan_distance(b) == 1)
}
