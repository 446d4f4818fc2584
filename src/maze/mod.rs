pub mod cell;
pub mod grid;

pub use cell::Cell;
pub use grid::{Grid, Tile};

/// A generated maze: a wall/passage grid plus its fixed endpoints.
///
/// A maze is immutable once built. Searches only read it, which is what
/// makes sharing one `Arc<Maze>` between concurrent runs safe.
pub struct Maze {
    grid: Grid,
    start: Cell,
    end: Cell,
}

impl Maze {
    pub(crate) fn new(grid: Grid, start: Cell, end: Cell) -> Self {
        Maze { grid, start, end }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }
}
