use super::cell::Cell;

/// Flat row-major storage for the cells of a maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Cell]>,
    rows: u16,
    cols: u16,
}

impl Grid {
    pub fn new(rows: u16, cols: u16, cell: Cell) -> Self {
        let data = vec![cell; rows as usize * cols as usize].into_boxed_slice();
        Grid { data, rows, cols }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_in_bounds(&self, coord: (u16, u16)) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    fn ravel_index(&self, coord: (u16, u16)) -> usize {
        if !self.is_in_bounds(coord) {
            panic!(
                "Coordinate {:?} is out of bounds for a {}x{} grid",
                coord, self.rows, self.cols
            );
        }
        // Overflow-safe since rows and cols are u16 (assuming usize is at least 32 bits)
        coord.0 as usize * self.cols as usize + coord.1 as usize
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.data.iter_mut()
    }
}

impl std::ops::Index<(u16, u16)> for Grid {
    type Output = Cell;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl std::ops::IndexMut<(u16, u16)> for Grid {
    fn index_mut(&mut self, index: (u16, u16)) -> &mut Self::Output {
        let idx = self.ravel_index(index);
        &mut self.data[idx]
    }
}
