mod bfs;

pub use bfs::{reachable_from, solve_bfs};

use crate::maze::{Direction, Maze};

/// Number of open passages in the maze. Each wall pair is counted once,
/// from the cell above or to the left of it.
pub fn open_passage_count(maze: &Maze) -> usize {
    maze.coords()
        .map(|coord| {
            [Direction::Down, Direction::Right]
                .into_iter()
                .filter(|&d| maze.neighbor(coord, d).is_some() && !maze.has_wall(coord, d))
                .count()
        })
        .sum()
}

/// Checks that the passages form a spanning tree: every cell reachable from the
/// start and exactly `cells - 1` passages, so no loops.
pub fn is_perfect(maze: &Maze) -> bool {
    let cells = maze.cell_count();
    reachable_from(maze, (0, 0)) == cells && open_passage_count(maze) == cells - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_on_hand_carved_maze() {
        // Three passages on a 2x2 form a tree, the fourth closes a loop
        let mut maze = Maze::new(2, 2);
        maze.carve((0, 0), Direction::Right);
        maze.carve((0, 0), Direction::Down);
        maze.carve((1, 0), Direction::Right);
        assert_eq!(open_passage_count(&maze), 3);
        assert!(is_perfect(&maze));

        maze.carve((0, 1), Direction::Down);
        assert_eq!(open_passage_count(&maze), 4);
        assert!(!is_perfect(&maze));
    }

    #[test]
    fn test_walled_maze_is_not_perfect() {
        let maze = Maze::new(2, 3);
        assert_eq!(open_passage_count(&maze), 0);
        assert_eq!(reachable_from(&maze, (0, 0)), 1);
        assert!(!is_perfect(&maze));
        assert!(is_perfect(&Maze::new(1, 1)));
    }
}
