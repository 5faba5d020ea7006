use docopt::Docopt;
use itertools::Itertools;
use mazegrid::{
    grid::{InitialLayout, MazeGrid},
    pathing,
    units::{Height, Width},
    Cartesian2DCoordinate,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_derive::Deserialize;
use std::{
    io,
    io::prelude::*,
    fs::File,
};

const USAGE: &str = "Maze grid

Usage:
    mazegrid_driver -h | --help
    mazegrid_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--layout=<l>] [--seed=<s>] [--show-cells] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 20].
    --grid-height=<h>      The grid height in a w*h grid [default: 20].
    --layout=<l>           Starting walls: empty, closed or random [default: random].
    --seed=<s>             Seed the random maze carving so the same maze can be generated again.
    --show-cells           List the open sides of every cell, one line per grid row.
    --save-edges=<path>    Serialize the maze passages to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_layout: String,
    flag_seed: Option<u64>,
    flag_show_cells: bool,
    flag_save_edges: String,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Maze(::mazegrid::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let layout = parse_layout(&args.flag_layout)?;

    let mut rng = match args.flag_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let maze_grid = MazeGrid::with_rng(Width(width), Height(height), layout, &mut rng);

    print_summary(&maze_grid);

    if args.flag_show_cells {
        print_cell_escapes(&maze_grid)?;
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    Ok(())
}

fn parse_layout(layout_name: &str) -> Result<InitialLayout> {
    match layout_name.to_lowercase().as_str() {
        "empty" => Ok(InitialLayout::Empty),
        "closed" => Ok(InitialLayout::ClosedWalls),
        "random" => Ok(InitialLayout::RandomMaze),
        other => Err(format!("Unknown layout '{}', expected one of: empty, closed, random", other).into()),
    }
}

fn print_summary(maze_grid: &MazeGrid) {

    let (Width(width), Height(height)) = maze_grid.dimensions();
    let cells_count = maze_grid.size();
    let passages_count = maze_grid.passages_count();

    // A perfect maze is connected with exactly one fewer passage than cells.
    let reachable_count = pathing::Distances::<u32>::new(maze_grid, Cartesian2DCoordinate::new(0, 0))
        .map_or(0, |distances| distances.reachable_count());
    let is_perfect = cells_count > 0 && reachable_count == cells_count &&
                     passages_count == cells_count - 1;
    let longest_path_length = pathing::longest_path(maze_grid).map_or(0, |path| path.len());

    println!("grid: {}x{}", width, height);
    println!("cells: {}", cells_count);
    println!("passages: {}", passages_count);
    println!("perfect maze: {}", is_perfect);
    println!("longest path: {} cells", longest_path_length);
}

fn print_cell_escapes(maze_grid: &MazeGrid) -> Result<()> {

    let Width(width) = maze_grid.width();
    if width == 0 {
        return Ok(());
    }

    let escapes = maze_grid.iter()
        .map(|coord| {
            maze_grid.get_escape_directions(coord).map(|dirs| {
                let letters = dirs.iter().map(|dir| dir.letter()).collect::<String>();
                if letters.is_empty() {
                    String::from("-")
                } else {
                    letters
                }
            })
        })
        .collect::<::std::result::Result<Vec<String>, _>>()?;

    for row in escapes.chunks(width) {
        println!("{}", row.iter().map(|cell| format!("{:<4}", cell)).join(" "));
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &MazeGrid, file_path: &str) -> Result<()> {

    let graph = maze_grid.passage_graph();

    let mut graph_data = String::new();
    let vertices_count = graph.node_count();
    let edges_count = graph.edge_count();
    graph_data.push_str(vertices_count.to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(edges_count.to_string().as_ref());
    graph_data.push('\n');

    // Node indices follow the grid's row major cell indices.
    for edge in graph.raw_edges() {
        let src_as_1_based_index = edge.source().index() + 1;
        let dst_as_1_based_index = edge.target().index() + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
