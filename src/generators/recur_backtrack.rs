use crate::{
    generators::get_rng,
    maze::{Coord, Maze},
};
use rand::Rng;

/// Carve a perfect maze with an iterative randomized depth-first search,
/// seeded from `seed` (or from the OS when `None`).
pub fn recursive_backtrack(maze: &mut Maze, seed: Option<u64>) {
    let mut rng = get_rng(seed);
    carve_maze(maze, &mut rng);
}

/// Carve a perfect maze using the given random source.
///
/// Starts from `(0, 0)` and keeps an explicit stack instead of recursing, so
/// large grids can't blow the call stack. At each step the top cell picks one of
/// its unvisited neighbours uniformly at random, knocks down the wall pair in
/// between and pushes the neighbour; a cell with no unvisited neighbours is
/// popped. Every cell ends up connected to the start by exactly one path.
///
/// Expects a freshly created maze: all walls standing and nothing visited.
pub fn carve_maze<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let start: Coord = (0, 0);
    maze.set_visited(start, true);

    // The stack holds the current carving path, from the start cell to the head
    let mut stack = vec![start];
    let mut passages = 0usize;

    while let Some(&cell) = stack.last() {
        let neighbors = maze.unvisited_neighbors(cell);
        if neighbors.is_empty() {
            // Dead end, backtrack
            stack.pop();
            continue;
        }

        let (direction, neighbor) = neighbors[rng.random_range(0..neighbors.len())];
        maze.carve(cell, direction);
        maze.set_visited(neighbor, true);
        passages += 1;
        stack.push(neighbor);
    }

    // Visited flags only matter while carving
    maze.clear_visited();

    tracing::debug!(
        "[generator] carved {}x{} maze: {} cells, {} passages",
        maze.rows(),
        maze.cols(),
        maze.cell_count(),
        passages
    );
}
