use crate::error::{GridError, Result};
use crate::occupancy_grid::OccupancyGrid;
use grid_util::point::Point;
use log::debug;

/// Snaps a requested endpoint onto a traversable cell. A traversable point is returned as is;
/// a blocked one is replaced by its first traversable cardinal neighbour, probing up, down,
/// left and right in that order. Only distance-one neighbours are probed.
pub fn resolve(point: Point, grid: &OccupancyGrid) -> Result<Point> {
    if !grid.in_bounds(point) {
        return Err(GridError::OutOfBounds {
            point,
            width: grid.width(),
            height: grid.height(),
        });
    }
    if grid.is_traversable(point) {
        return Ok(point);
    }
    match grid.neighborhood(&point).first() {
        Some(&neighbour) => {
            debug!("Endpoint {} is blocked, snapped to {}", point, neighbour);
            Ok(neighbour)
        }
        None => Err(GridError::NonTraversableEndpoint { point }),
    }
}
