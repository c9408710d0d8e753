use std::time::Instant;

use mazerun::{game::Difficulty, generators::generate_maze, solvers};

/// Generate a batch of mazes at one difficulty and report how long carving took.
/// Usage: profile [DIFFICULTY] [ITERATIONS]
fn main() -> Result<(), mazerun::MazeError> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let difficulty = match args.next() {
        Some(name) => name.parse::<Difficulty>()?,
        None => Difficulty::Hard,
    };
    let num_iters = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(1000);

    let profile = difficulty.profile();
    let start_time = Instant::now();
    let mut imperfect = 0;
    for seed in 0..num_iters {
        let maze = generate_maze(profile.rows, profile.cols, Some(seed));
        if !solvers::is_perfect(&maze) {
            imperfect += 1;
        }
    }
    let elapsed = start_time.elapsed();

    println!(
        "{} mazes of {}x{} in {:?} ({:?} per maze), {} imperfect",
        num_iters,
        profile.rows,
        profile.cols,
        elapsed,
        elapsed / num_iters.max(1) as u32,
        imperfect
    );
    Ok(())
}
