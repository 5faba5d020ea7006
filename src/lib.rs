//! **mazegrid** is a rectangular maze grid: a wall map shared between neighbouring cells, queries
//! for the walled and open sides of each cell, and a recursive backtracker that carves perfect
//! mazes into it.

pub mod cells;
pub mod directions;
pub mod generators;
pub mod grid;
pub mod pathing;
pub mod units;
mod walls;

pub use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
pub use crate::directions::Directions;
pub use crate::grid::{InitialLayout, MazeError, MazeGrid};
