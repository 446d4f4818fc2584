use super::cell::Cell;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Passage,
}

/// A rectangular wall/passage grid. Freshly created grids are solid wall;
/// the generator carves passages into them.
///
/// Out-of-bounds queries are deliberately safe: a coordinate outside the
/// grid reads as a wall, and writes to it are ignored. Neighbor expansion
/// in the searches relies on this instead of bounds-checking first.
pub struct Grid {
    data: Box<[Tile]>,
    rows: u16,
    cols: u16,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Self {
        let data = vec![Tile::Wall; rows as usize * cols as usize].into_boxed_slice();
        Grid { data, rows, cols }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    fn ravel_index(&self, cell: Cell) -> usize {
        // Overflow-safe since rows and cols are u16 (assuming usize is at least 32 bits)
        cell.row as usize * self.cols as usize + cell.col as usize
    }

    pub fn is_passage(&self, cell: Cell) -> bool {
        self.is_in_bounds(cell) && self.data[self.ravel_index(cell)] == Tile::Passage
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        !self.is_passage(cell)
    }

    /// Carves the cell open. Idempotent; out-of-bounds coordinates are ignored.
    pub fn set_passage(&mut self, cell: Cell) {
        if self.is_in_bounds(cell) {
            let idx = self.ravel_index(cell);
            self.data[idx] = Tile::Passage;
        }
    }

    /// In-bounds cardinal neighbors of `cell`, in fixed order: up, down, left, right.
    pub fn neighbors4(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors4()
            .into_iter()
            .filter(move |&c| self.is_in_bounds(c))
    }
}
