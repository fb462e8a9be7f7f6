use crate::astar::astar;
use crate::error::Result;
use crate::occupancy_grid::OccupancyGrid;
use crate::resolve::resolve;
use grid_util::point::Point;
use log::{debug, info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Settings for 4-connected A* searches over an [OccupancyGrid]. Moves cost 1 and the heuristic
/// is the [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), so the first
/// time the goal is popped its path is optimal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathFinder {
    /// Maximum number of node expansions per search. [None] uses the cell count of the grid.
    #[cfg_attr(feature = "serde", serde(default))]
    pub expansion_limit: Option<usize>,
    /// Rejects endpoints on different connected components before searching.
    #[cfg_attr(feature = "serde", serde(default = "default_check_components"))]
    pub check_components: bool,
}

#[cfg(feature = "serde")]
fn default_check_components() -> bool {
    true
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder {
            expansion_limit: None,
            check_components: true,
        }
    }
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder::default()
    }

    pub fn with_expansion_limit(mut self, limit: usize) -> PathFinder {
        self.expansion_limit = Some(limit);
        self
    }

    pub fn with_component_check(mut self, enabled: bool) -> PathFinder {
        self.check_components = enabled;
        self
    }

    fn successors(grid: &OccupancyGrid, node: &Point) -> SmallVec<[(Point, i32); 4]> {
        grid.neighborhood(node).into_iter().map(|p| (p, 1)).collect()
    }

    /// Computes the shortest path from `start` to `end`, both included. Returns an empty path
    /// if no route exists, if either endpoint is blocked or out of bounds, or if the expansion
    /// limit is hit. Endpoints are not resolved here, see [route](Self::route) for that.
    pub fn find_path(&self, start: Point, end: Point, grid: &OccupancyGrid) -> Vec<Point> {
        if !grid.is_traversable(start) || !grid.is_traversable(end) {
            debug!("Endpoint {} or {} is not traversable", start, end);
            return Vec::new();
        }
        if self.check_components && grid.unreachable(&start, &end) {
            info!("{} is not reachable from {}", end, start);
            return Vec::new();
        }
        let limit = self.expansion_limit.unwrap_or_else(|| grid.cell_count());
        let path = astar(
            &start,
            |node| Self::successors(grid, node),
            |point| point.manhattan_distance(&end),
            |point| *point == end,
            limit,
        )
        .map(|(path, _cost)| path)
        .unwrap_or_default();
        debug_assert!(crate::is_contiguous(&path));
        path
    }

    /// Resolves both endpoints against the grid and then searches between the resolved cells.
    pub fn route(&self, start: Point, end: Point, grid: &OccupancyGrid) -> Result<Vec<Point>> {
        let start = resolve(start, grid)?;
        let end = resolve(end, grid)?;
        Ok(self.find_path(start, end, grid))
    }
}

/// A search bundled with the snapshot it runs against, so that it can be handed to another
/// thread while the caller keeps editing obstacles and building new snapshots.
#[derive(Clone, Debug)]
pub struct PathRequest {
    pub start: Point,
    pub end: Point,
    pub grid: Arc<OccupancyGrid>,
}

impl PathRequest {
    pub fn new(start: Point, end: Point, grid: Arc<OccupancyGrid>) -> PathRequest {
        PathRequest { start, end, grid }
    }

    pub fn solve(&self, finder: &PathFinder) -> Vec<Point> {
        finder.find_path(self.start, self.end, &self.grid)
    }
}
