//! Error values returned by grid construction and endpoint resolution.

use grid_util::point::Point;
use thiserror::Error;

/// Failures surfaced by [build](crate::build) and [resolve](crate::resolve). A search that
/// finds no route is not an error and yields an empty path instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid { width: i32, height: i32 },

    #[error("{point} lies outside the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    #[error("{point} and all of its cardinal neighbours are blocked")]
    NonTraversableEndpoint { point: Point },
}

pub type Result<T> = std::result::Result<T, GridError>;
