use std::fmt;

/// One of the four cardinal directions on the grid.
/// `Up` decreases the row, `Left` decreases the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the order neighbours are enumerated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction pointing back the way this one came.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Row and column offsets of a single step in this direction.
    pub fn offset(self) -> (i16, i16) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Wall flags of a single cell. `true` means the wall is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Walls {
    /// All four walls standing.
    pub const CLOSED: Walls = Walls {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    /// The wall a step in `direction` has to pass through.
    /// `Up` faces `top`, `Down` faces `bottom`, and so on.
    pub fn facing(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub(crate) fn set_facing(&mut self, direction: Direction, present: bool) {
        let wall = match direction {
            Direction::Up => &mut self.top,
            Direction::Down => &mut self.bottom,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        };
        *wall = present;
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::CLOSED
    }
}

/// A single grid cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub walls: Walls,
    /// Set by the generator while carving. Meaningless once the maze is built.
    pub visited: bool,
}
