use bit_set::BitSet;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::MazeGrid;
use crate::units::Width;

/// Apply the recursive backtracker maze generation algorithm to a grid.
///
/// The grid is first walled up completely. Starting from a random cell we walk to a random
/// unvisited neighbour, knocking down the wall between the two, and keep walking from there.
/// The cells walked are kept on a stack; when the current cell has no unvisited neighbours we pop
/// back to the most recent cell that still does. Every cell is visited exactly once so the
/// passages form a spanning tree: a perfect maze.
///
/// The neighbour order is reshuffled on every step.
pub fn recursive_backtracker<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {

    grid.close_all_walls();

    let start = match grid.random_cell(rng) {
        Some(coord) => coord,
        None => return, // no cells
    };

    let cells_count = grid.size();
    let Width(width) = grid.width();
    let index_of = move |coord: Cartesian2DCoordinate| coord.y as usize * width + coord.x as usize;

    let mut visited = BitSet::with_capacity(cells_count);
    let mut stack: Vec<Cartesian2DCoordinate> = Vec::with_capacity(cells_count);
    let mut directions = CompassPrimary::ALL;

    visited.insert(index_of(start));
    stack.push(start);

    while let Some(&current) = stack.last() {

        directions.shuffle(rng);

        let unvisited_neighbour = directions.iter()
            .filter_map(|dir| grid.neighbour_at_direction(current, *dir).map(|coord| (*dir, coord)))
            .find(|&(_, coord)| !visited.contains(index_of(coord)));

        if let Some((dir, neighbour)) = unvisited_neighbour {
            grid.set_wall(current, dir, false);
            visited.insert(index_of(neighbour));
            stack.push(neighbour);
        } else {
            // dead end
            stack.pop();
        }
    }
}


#[cfg(test)]
mod tests {

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::directions::Directions;
    use crate::grid::InitialLayout;
    use crate::units::Height;

    #[test]
    fn carves_over_existing_passages() {
        let mut g = MazeGrid::new(Width(5), Height(5), InitialLayout::Empty);
        recursive_backtracker(&mut g, &mut StdRng::seed_from_u64(17));
        assert_eq!(g.passages_count(), 5 * 5 - 1);
    }

    #[test]
    fn every_cell_is_joined_to_the_maze() {
        let mut g = MazeGrid::new(Width(9), Height(4), InitialLayout::ClosedWalls);
        recursive_backtracker(&mut g, &mut StdRng::seed_from_u64(23));
        for coord in g.iter() {
            let escapes = g.get_escape_directions(coord).unwrap();
            assert_ne!(escapes, Directions::NONE, "{} was never visited", coord);
        }
    }

    #[test]
    fn empty_grid_is_left_alone() {
        let mut g = MazeGrid::new(Width(0), Height(3), InitialLayout::Empty);
        recursive_backtracker(&mut g, &mut StdRng::seed_from_u64(1));
        assert_eq!(g.size(), 0);
        assert_eq!(g.passages_count(), 0);
    }

    #[test]
    fn works_with_trait_object_rngs() {
        let mut seeded = StdRng::seed_from_u64(4);
        let rng: &mut dyn rand::RngCore = &mut seeded;
        let mut g = MazeGrid::new(Width(3), Height(3), InitialLayout::ClosedWalls);
        recursive_backtracker(&mut g, rng);
        assert_eq!(g.passages_count(), 8);
    }
}
