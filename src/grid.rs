use std::error::Error;
use std::fmt;

use petgraph::{Graph, Undirected};
use petgraph::graph::NodeIndex;
use rand::{self, Rng};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::directions::Directions;
use crate::generators;
use crate::units::{EdgesCount, Height, NodesCount, Width};
use crate::walls::{WallFlags, WallMap};


pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

/// The state of the walls when a grid is first built.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum InitialLayout {
    /// No walls at all, the outer boundary is left open as well.
    Empty,
    /// Every cell fully enclosed.
    ClosedWalls,
    /// Closed walls carved into a perfect maze.
    RandomMaze,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeError {
    CoordinateOutOfRange {
        coord: Cartesian2DCoordinate,
        width: Width,
        height: Height,
    },
    /// A single direction was required.
    InvalidDirection(Directions),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeError::CoordinateOutOfRange { coord, width, height } => {
                write!(f,
                       "coordinate {} is outside the {}x{} grid",
                       coord,
                       width.0,
                       height.0)
            }
            MazeError::InvalidDirection(dirs) => {
                write!(f, "expected exactly one direction, got: {}", dirs)
            }
        }
    }
}

impl Error for MazeError {}


/// A rectangular grid of square cells and the walls between them.
///
/// Walls live on the corners of the grid rather than in the cells, so the wall between two
/// adjacent cells is a single flag and can never disagree with itself.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct MazeGrid {
    width: Width,
    height: Height,
    walls: WallMap,
}

impl MazeGrid {
    /// Build a grid. A `RandomMaze` layout is carved with the thread local random generator.
    pub fn new(width: Width, height: Height, layout: InitialLayout) -> MazeGrid {
        MazeGrid::with_rng(width, height, layout, &mut rand::thread_rng())
    }

    /// Build a grid, carving any `RandomMaze` layout with the given random generator.
    pub fn with_rng<R: Rng + ?Sized>(width: Width,
                                     height: Height,
                                     layout: InitialLayout,
                                     rng: &mut R)
                                     -> MazeGrid {
        let mut grid = MazeGrid {
            width,
            height,
            walls: WallMap::new(width, height),
        };

        match layout {
            InitialLayout::Empty => {}
            InitialLayout::ClosedWalls => grid.close_all_walls(),
            InitialLayout::RandomMaze => grid.generate_random_maze(rng),
        }

        grid
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (Width, Height) {
        (self.width, self.height)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0
    }

    /// Node count and an upper bound on the number of passages, used as capacity hints.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (Width(w), Height(h)) = self.dimensions();
        let interior_edges = (2 * w * h).saturating_sub(w + h);
        (NodesCount(self.size()), EdgesCount(interior_edges))
    }

    /// Sides of the cell that currently have a wall.
    pub fn get_wall_directions(&self, coord: Cartesian2DCoordinate) -> Result<Directions, MazeError> {
        self.check_coordinate(coord)?;

        Ok(CompassPrimary::ALL
            .iter()
            .cloned()
            .filter(|dir| self.has_wall(coord, *dir))
            .collect())
    }

    /// Sides of the cell without a wall.
    pub fn get_escape_directions(&self, coord: Cartesian2DCoordinate) -> Result<Directions, MazeError> {
        self.get_wall_directions(coord).map(|walls| Directions::ALL ^ walls)
    }

    /// Make the cell's walls exactly `directions`. The east and south walls are shared with the
    /// neighbouring cells, which see the change from their west and north sides.
    pub fn set_walls_for_cell(&mut self,
                              coord: Cartesian2DCoordinate,
                              directions: Directions)
                              -> Result<(), MazeError> {
        self.check_coordinate(coord)?;

        for dir in CompassPrimary::ALL.iter() {
            self.set_wall(coord, *dir, directions.contains(*dir));
        }
        Ok(())
    }

    /// Clear the wall on one side of a cell.
    ///
    /// `direction` must name exactly one side, a set with zero or several members is rejected.
    pub fn remove_wall<D>(&mut self, coord: Cartesian2DCoordinate, direction: D) -> Result<(), MazeError>
        where D: Into<Directions>
    {
        let dir = self.check_single_wall(coord, direction.into())?;
        self.set_wall(coord, dir, false);
        Ok(())
    }

    /// Put back the wall on one side of a cell. Same argument rules as `remove_wall`.
    pub fn add_wall<D>(&mut self, coord: Cartesian2DCoordinate, direction: D) -> Result<(), MazeError>
        where D: Into<Directions>
    {
        let dir = self.check_single_wall(coord, direction.into())?;
        self.set_wall(coord, dir, true);
        Ok(())
    }

    /// Wall up every cell, discarding any passages.
    pub fn close_all_walls(&mut self) {
        self.walls.fill(WallFlags::BOTH);
    }

    /// Remove every wall, including the outer boundary.
    pub fn clear_all_walls(&mut self) {
        self.walls.fill(WallFlags::NONE);
    }

    /// Replace the current walls with a freshly carved perfect maze.
    pub fn generate_random_maze<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        generators::recursive_backtracker(self, rng);
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cartesian2DCoordinate> {
        let cells_count = self.size();
        if cells_count == 0 {
            None
        } else {
            let index = rng.gen_range(0..cells_count);
            Some(Cartesian2DCoordinate::from_row_major_index(index, self.width))
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        direction.offset_coordinate(coord)
                 .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Cells to the North, South, East or West of a cell, but not necessarily reachable.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Is there an open side between this cell and an in-grid neighbour?
    pub fn is_passage(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        self.is_valid_coordinate(coord) &&
        self.neighbour_at_direction(coord, direction).is_some() &&
        !self.has_wall(coord, direction)
    }

    /// Neighbouring cells reachable from this cell in one step.
    pub fn passages(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter(|dir| self.is_passage(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Number of open sides shared by two cells. Openings in the outer boundary do not count.
    pub fn passages_count(&self) -> usize {
        self.iter()
            .map(|coord| {
                [CompassPrimary::East, CompassPrimary::South]
                    .iter()
                    .filter(|dir| self.is_passage(coord, **dir))
                    .count()
            })
            .sum()
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            width: self.width,
            current_cell_number: 0,
            cells_count: self.size(),
        }
    }

    /// The passages as an undirected graph. Node indices follow `grid_coordinate_to_index`.
    pub fn passage_graph(&self) -> Graph<Cartesian2DCoordinate, (), Undirected> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = Graph::with_capacity(nodes, edges);

        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }

        for coord in self.iter() {
            for dir in &[CompassPrimary::East, CompassPrimary::South] {
                if !self.is_passage(coord, *dir) {
                    continue;
                }
                let neighbour_opt = self.neighbour_at_direction(coord, *dir)
                                        .and_then(|n| self.grid_coordinate_to_index(n));
                if let (Some(a), Some(b)) = (self.grid_coordinate_to_index(coord), neighbour_opt) {
                    let _ = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
                }
            }
        }

        graph
    }

    /// Clears or sets one wall without any argument checks, for callers that have already
    /// validated the coordinate.
    pub(crate) fn set_wall(&mut self,
                           coord: Cartesian2DCoordinate,
                           direction: CompassPrimary,
                           present: bool) {
        let (corner, flag) = wall_position(coord, direction);
        self.walls[corner].set(flag, present);
    }

    #[inline]
    fn has_wall(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        let ((x, y), flag) = wall_position(coord, direction);
        self.walls.get(x, y).map_or(false, |corner| corner.contains(flag))
    }

    fn check_coordinate(&self, coord: Cartesian2DCoordinate) -> Result<(), MazeError> {
        if self.is_valid_coordinate(coord) {
            Ok(())
        } else {
            Err(MazeError::CoordinateOutOfRange {
                coord,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn check_single_wall(&self,
                         coord: Cartesian2DCoordinate,
                         directions: Directions)
                         -> Result<CompassPrimary, MazeError> {
        self.check_coordinate(coord)?;
        directions.single().ok_or(MazeError::InvalidDirection(directions))
    }
}

/// The corner holding the wall on one side of a cell and which of its two flags it is.
#[inline]
fn wall_position(coord: Cartesian2DCoordinate, direction: CompassPrimary) -> ((usize, usize), WallFlags) {
    let (x, y) = (coord.x as usize, coord.y as usize);
    match direction {
        CompassPrimary::North => ((x, y), WallFlags::HORIZONTAL),
        CompassPrimary::South => ((x, y + 1), WallFlags::HORIZONTAL),
        CompassPrimary::West => ((x, y), WallFlags::VERTICAL),
        CompassPrimary::East => ((x + 1, y), WallFlags::VERTICAL),
    }
}

/// Row major iteration over the cells of a grid.
#[derive(Debug, Clone)]
pub struct CellIter {
    width: Width,
    current_cell_number: usize,
    cells_count: usize,
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                    self.width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
