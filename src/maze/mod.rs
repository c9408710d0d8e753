pub mod cell;
mod grid;

pub use cell::{Cell, Direction, Walls};
use grid::Grid;

/// A cell coordinate, `(row, col)`, with `(0, 0)` at the top left.
pub type Coord = (u16, u16);

/// A rectangular maze of `rows x cols` cells, each carrying its own four walls.
///
/// Walls between neighbouring cells are stored twice, once on each side, and are
/// only ever removed in pairs through [`Maze::carve`], so both sides always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
}

impl Maze {
    /// Creates a new maze with every wall of every cell standing and nothing visited.
    ///
    /// Panics if either dimension is 0.
    pub fn new(rows: u16, cols: u16) -> Self {
        if rows == 0 || cols == 0 {
            panic!("Maze dimensions must be at least 1x1, got {}x{}", rows, cols);
        }
        Maze {
            grid: Grid::new(rows, cols, Cell::default()),
        }
    }

    /// Returns the number of cell rows.
    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    /// Returns the number of cell columns.
    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        self.grid.is_in_bounds(coord)
    }

    /// The bottom-right cell.
    pub fn last_cell(&self) -> Coord {
        (self.rows() - 1, self.cols() - 1)
    }

    /// Wall flags of the cell at `coord`.
    pub fn walls(&self, coord: Coord) -> Walls {
        self.grid[coord].walls
    }

    /// Checks whether the wall on the `direction` side of `coord` is standing.
    /// The outer boundary is always walled.
    pub fn has_wall(&self, coord: Coord, direction: Direction) -> bool {
        self.grid[coord].walls.facing(direction)
    }

    /// The coordinate one step from `coord` in `direction`, if it lies inside the maze.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        if !self.is_in_bounds(coord) {
            panic!("The given coordinate {:?} is out of bounds", coord);
        }
        let (d_row, d_col) = direction.offset();
        let next = (
            coord.0.checked_add_signed(d_row)?,
            coord.1.checked_add_signed(d_col)?,
        );
        self.is_in_bounds(next).then_some(next)
    }

    /// Removes the wall between `from` and its neighbour in `direction`, on both sides.
    /// Returns the neighbour's coordinate.
    ///
    /// # Panics
    /// * If `from` is out of bounds
    /// * If the step leaves the maze (the outer boundary can't be carved)
    pub fn carve(&mut self, from: Coord, direction: Direction) -> Coord {
        let Some(to) = self.neighbor(from, direction) else {
            panic!(
                "Cannot carve {} from {:?}: no cell on that side",
                direction, from
            );
        };
        self.grid[from].walls.set_facing(direction, false);
        self.grid[to].walls.set_facing(direction.opposite(), false);
        to
    }

    pub fn is_visited(&self, coord: Coord) -> bool {
        self.grid[coord].visited
    }

    pub fn set_visited(&mut self, coord: Coord, visited: bool) {
        self.grid[coord].visited = visited;
    }

    /// Resets the visited flag on every cell.
    pub fn clear_visited(&mut self) {
        self.grid.iter_mut().for_each(|cell| cell.visited = false);
    }

    /// In-bounds neighbours of `coord` that have not been visited yet,
    /// tagged with the direction leading to each of them.
    pub fn unvisited_neighbors(&self, coord: Coord) -> Vec<(Direction, Coord)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.neighbor(coord, d).map(|n| (d, n)))
            .filter(|&(_, n)| !self.is_visited(n))
            .collect()
    }

    /// Neighbours of `coord` reachable through an open passage.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&d| !self.has_wall(coord, d))
            .filter_map(move |d| self.neighbor(coord, d).map(|n| (d, n)))
    }

    /// All cell coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (rows, cols) = (self.rows(), self.cols());
        (0..rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_maze_is_fully_walled() {
        let maze = Maze::new(3, 5);
        assert_eq!(maze.cell_count(), 15);
        for coord in maze.coords() {
            assert_eq!(maze.walls(coord), Walls::CLOSED);
            assert!(!maze.is_visited(coord));
        }
    }

    #[test]
    fn test_carve_clears_both_sides() {
        let mut maze = Maze::new(3, 3);
        let to = maze.carve((1, 1), Direction::Right);
        assert_eq!(to, (1, 2));
        assert!(!maze.has_wall((1, 1), Direction::Right));
        assert!(!maze.has_wall((1, 2), Direction::Left));
        // Other walls untouched
        assert!(maze.has_wall((1, 1), Direction::Up));
        assert!(maze.has_wall((1, 2), Direction::Right));

        maze.carve((1, 1), Direction::Up);
        assert!(!maze.has_wall((0, 1), Direction::Down));
    }

    #[test]
    #[should_panic(expected = "Cannot carve")]
    fn test_carve_outer_boundary_panics() {
        let mut maze = Maze::new(2, 2);
        maze.carve((0, 0), Direction::Left);
    }

    #[test]
    #[should_panic(expected = "at least 1x1")]
    fn test_zero_dimension_panics() {
        let _ = Maze::new(0, 4);
    }

    #[test]
    fn test_neighbors_at_corners() {
        let maze = Maze::new(2, 3);
        assert_eq!(maze.neighbor((0, 0), Direction::Up), None);
        assert_eq!(maze.neighbor((0, 0), Direction::Left), None);
        assert_eq!(maze.neighbor((0, 0), Direction::Down), Some((1, 0)));
        assert_eq!(maze.neighbor((1, 2), Direction::Right), None);
        assert_eq!(maze.neighbor((1, 2), Direction::Down), None);
        assert_eq!(maze.neighbor((1, 2), Direction::Left), Some((1, 1)));
    }

    #[test]
    fn test_unvisited_neighbors() {
        let mut maze = Maze::new(3, 3);
        let all = maze.unvisited_neighbors((1, 1));
        assert_eq!(all.len(), 4);
        assert!(all.contains(&(Direction::Up, (0, 1))));

        maze.set_visited((0, 1), true);
        maze.set_visited((1, 2), true);
        let left = maze.unvisited_neighbors((1, 1));
        assert_eq!(
            left,
            vec![(Direction::Down, (2, 1)), (Direction::Left, (1, 0))]
        );

        // Corner cell: two candidates, (1, 2) already visited
        assert_eq!(maze.unvisited_neighbors((2, 2)).len(), 1);

        maze.clear_visited();
        assert!(maze.coords().all(|c| !maze.is_visited(c)));
    }

    #[test]
    fn test_single_cell_has_no_neighbors() {
        let maze = Maze::new(1, 1);
        assert!(maze.unvisited_neighbors((0, 0)).is_empty());
        assert_eq!(maze.open_neighbors((0, 0)).count(), 0);
        assert_eq!(maze.last_cell(), (0, 0));
    }

    #[test]
    fn test_open_neighbors_follow_carving() {
        let mut maze = Maze::new(2, 2);
        maze.carve((0, 0), Direction::Down);
        let open: Vec<_> = maze.open_neighbors((0, 0)).collect();
        assert_eq!(open, vec![(Direction::Down, (1, 0))]);
    }
}
