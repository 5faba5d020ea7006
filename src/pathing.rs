use std::fmt::{Debug, Display};
use std::ops::Add;

use fnv::FnvHashMap;
use itertools::Itertools;
use num::traits::{Bounded, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::MazeGrid;


// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time
pub trait MaxDistance: Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + Ord {}
impl<T: Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + Ord> MaxDistance for T {}


/// Step counts from one start cell to every cell reachable from it through the passages of a
/// grid.
///
/// The distances are a snapshot, mutating the grid afterwards does not update them.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT: MaxDistance> Distances<MaxDistanceT> {

    /// Flood fill from `start_coordinate`. Returns None if the start is not on the grid.
    ///
    /// `MaxDistanceT` must be wide enough to count the longest path in the grid.
    pub fn new(grid: &MazeGrid, start_coordinate: Cartesian2DCoordinate) -> Option<Distances<MaxDistanceT>> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max: MaxDistanceT = Zero::zero();
        let mut distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT> =
            FnvHashMap::with_capacity_and_hasher(grid.size(), Default::default());
        distances.insert(start_coordinate, Zero::zero());

        // Every step costs the same, so the first time a cell is reached is the shortest route
        // to it and the distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link_coordinate in grid.passages(*cell_coord).iter() {
                    if !distances.contains_key(link_coordinate) {
                        distances.insert(*link_coordinate, distance_to_cell + One::one());
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    /// Number of cells reachable from the start, the start included.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// Every cell at the maximum distance, in row major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();

        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted_by_key(|coord| (coord.y, coord.x))
            .collect()
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, always stepping to the
/// linked neighbour closest to the start.
///
/// Returns None if the end point is not reachable from the start or the grid has changed since
/// the distances were calculated.
pub fn shortest_path<MaxDistanceT>(grid: &MazeGrid,
                                   distances_from_start: &Distances<MaxDistanceT>,
                                   end_point: Cartesian2DCoordinate)
                                   -> Option<Vec<Cartesian2DCoordinate>>
    where MaxDistanceT: MaxDistance
{
    let mut current_distance_to_start = distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let (closer_coord, closer_distance) = grid.passages(current_coord)
            .iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(*coord)
                                    .map(|distance| (*coord, distance))
            })
            .min_by_key(|&(_, distance)| distance)?;

        if closer_distance >= current_distance_to_start {
            // We have not got any closer to the start, so there is no path there.
            return None;
        }

        current_coord = closer_coord;
        current_distance_to_start = closer_distance;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// The longest path in the maze, found with two flood fills: the furthest cell from an arbitrary
/// start must be one end of the longest path, and the furthest cell from that is the other end.
///
/// Only exact on a perfect maze. On a grid with separate regions it only searches the region
/// holding the north west corner.
pub fn longest_path(grid: &MazeGrid) -> Option<Vec<Cartesian2DCoordinate>> {

    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances = Distances::<u32>::new(grid, arbitrary_start_point)?;

    let long_path_start_coordinate = first_distances.furthest_points_on_grid()[0];

    let distances_from_start = Distances::<u32>::new(grid, long_path_start_coordinate)?;
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    shortest_path(grid, &distances_from_start, end_point)
}


#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cells::CompassPrimary::*;
    use crate::grid::InitialLayout;
    use crate::units::{Height, Width};

    type SmallDistances = Distances<u8>;

    const OUT_OF_GRID_COORDINATE: Cartesian2DCoordinate = Cartesian2DCoordinate {
        x: u32::MAX,
        y: u32::MAX,
    };

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn closed_grid(w: usize, h: usize) -> MazeGrid {
        MazeGrid::new(Width(w), Height(h), InitialLayout::ClosedWalls)
    }

    // 2x2 grid with the walls between all four cells knocked down
    fn open_square() -> MazeGrid {
        let mut g = closed_grid(2, 2);
        g.remove_wall(gc(0, 0), East).expect("remove wall failed");
        g.remove_wall(gc(0, 0), South).expect("remove wall failed");
        g.remove_wall(gc(1, 1), North).expect("remove wall failed");
        g.remove_wall(gc(1, 1), West).expect("remove wall failed");
        g
    }

    #[test]
    fn distances_construction_requires_valid_start_coordinate() {
        let g = closed_grid(3, 3);
        let distances = SmallDistances::new(&g, OUT_OF_GRID_COORDINATE);
        assert!(distances.is_none());
    }

    #[test]
    fn start() {
        let g = closed_grid(3, 3);
        let start_coordinate = gc(1, 1);
        let distances = SmallDistances::new(&g, start_coordinate).unwrap();
        assert_eq!(start_coordinate, distances.start());
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = closed_grid(3, 3);
        let start_coordinate = gc(0, 0);
        let distances = SmallDistances::new(&g, start_coordinate).unwrap();
        for coord in g.iter() {
            let d = distances.distance_from_start_to(coord);

            if coord != start_coordinate {
                assert!(d.is_none());
            } else {
                assert_eq!(d, Some(0));
            }
        }
        assert_eq!(distances.reachable_count(), 1);
        assert_eq!(distances.max(), 0);
    }

    #[test]
    fn distance_to_invalid_coordinate_is_none() {
        let g = closed_grid(3, 3);
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.distance_from_start_to(OUT_OF_GRID_COORDINATE), None);
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_square();
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();

        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.max(), 2);
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(1, 1)]);
    }

    #[test]
    fn boundary_openings_do_not_leave_the_grid() {
        let g = MazeGrid::new(Width(2), Height(1), InitialLayout::Empty);
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.reachable_count(), 2);
        assert_eq!(distances.max(), 1);
    }

    #[test]
    fn path_along_a_corridor() {
        let mut g = closed_grid(4, 1);
        for x in 0..3 {
            g.remove_wall(gc(x, 0), East).expect("remove wall failed");
        }
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(shortest_path(&g, &distances, gc(3, 0)),
                   Some(vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(3, 0)]));
        assert_eq!(shortest_path(&g, &distances, gc(0, 0)), Some(vec![gc(0, 0)]));
        assert_eq!(longest_path(&g).map(|path| path.len()), Some(4));
    }

    #[test]
    fn no_path_to_walled_off_cells() {
        let mut g = closed_grid(3, 1);
        g.remove_wall(gc(0, 0), East).expect("remove wall failed");
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(shortest_path(&g, &distances, gc(2, 0)), None);
        assert_eq!(shortest_path(&g, &distances, OUT_OF_GRID_COORDINATE), None);
    }

    #[test]
    fn stale_distances_give_no_path() {
        let mut g = closed_grid(3, 1);
        g.remove_wall(gc(0, 0), East).expect("remove wall failed");
        g.remove_wall(gc(1, 0), East).expect("remove wall failed");
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        g.add_wall(gc(1, 0), East).expect("add wall failed");
        assert_eq!(shortest_path(&g, &distances, gc(2, 0)), None);
    }

    #[test]
    fn no_longest_path_without_cells() {
        let g = closed_grid(0, 4);
        assert_eq!(longest_path(&g), None);
    }

    #[test]
    fn perfect_maze_paths_reach_everywhere() {

        fn p(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = ((w % 10) as usize + 1, (h % 10) as usize + 1);
            let mut rng = StdRng::seed_from_u64(seed);
            let g = MazeGrid::with_rng(Width(w), Height(h), InitialLayout::RandomMaze, &mut rng);

            let distances = Distances::<u32>::new(&g, gc(0, 0)).unwrap();
            if distances.reachable_count() != w * h {
                return TestResult::failed();
            }

            let corner = gc(w as u32 - 1, h as u32 - 1);
            let path = match shortest_path(&g, &distances, corner) {
                Some(path) => path,
                None => return TestResult::failed(),
            };
            let steps_are_passages = path.iter()
                .tuple_windows()
                .all(|(a, b)| g.passages(*a).contains(b));

            let longest = longest_path(&g).unwrap();
            TestResult::from_bool(steps_are_passages &&
                                  path.len() as u32 == distances.distance_from_start_to(corner).unwrap() + 1 &&
                                  longest.len() >= path.len())
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult)
    }
}
