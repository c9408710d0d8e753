use rand::{SeedableRng, rngs::StdRng};

mod recur_backtrack;

pub use recur_backtrack::{carve_maze, recursive_backtrack};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Build a fresh `rows x cols` maze and carve it with the iterative backtracker.
pub fn generate_maze(rows: u16, cols: u16, seed: Option<u64>) -> crate::maze::Maze {
    let mut maze = crate::maze::Maze::new(rows, cols);
    recursive_backtrack(&mut maze, seed);
    maze
}
