use std::collections::VecDeque;

use crate::maze::{Coord, Direction, Maze};

/// Count the cells reachable from `start` by walking through open passages.
pub fn reachable_from(maze: &Maze, start: Coord) -> usize {
    let mut visited = vec![false; maze.cell_count()];
    let index = |c: Coord| c.0 as usize * maze.cols() as usize + c.1 as usize;

    let mut queue = VecDeque::from([start]);
    visited[index(start)] = true;
    let mut count = 0;

    while let Some(current) = queue.pop_front() {
        count += 1;
        for (_, next) in maze.open_neighbors(current) {
            if !visited[index(next)] {
                visited[index(next)] = true;
                queue.push_back(next);
            }
        }
    }
    count
}

/// Find the shortest route from `start` to `goal` with a breadth-first search.
/// Returns the steps to take, or `None` if the goal can't be reached.
pub fn solve_bfs(maze: &Maze, start: Coord, goal: Coord) -> Option<Vec<Direction>> {
    let cols = maze.cols() as usize;
    let index = |c: Coord| c.0 as usize * cols + c.1 as usize;

    // For each reached cell, the cell it was reached from and the step taken
    let mut parents: Vec<Option<(Coord, Direction)>> = vec![None; maze.cell_count()];
    let mut visited = vec![false; maze.cell_count()];
    visited[index(start)] = true;

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        if current == goal {
            // Walk the parent links back to the start
            let mut route = Vec::new();
            let mut cell = current;
            while let Some((parent, step)) = parents[index(cell)] {
                route.push(step);
                cell = parent;
            }
            route.reverse();
            return Some(route);
        }

        for (direction, next) in maze.open_neighbors(current) {
            if !visited[index(next)] {
                visited[index(next)] = true;
                parents[index(next)] = Some((current, direction));
                queue.push_back(next);
            }
        }
    }

    None // No path found
}
