use std::fmt;

/// A grid coordinate, addressed as (row, col) from the top-left corner.
///
/// Identity is value-based: two cells with equal coordinates are the same
/// cell, so `Cell` works directly as a `HashSet` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u16,
    pub col: u16,
}

impl Cell {
    pub const fn new(row: u16, col: u16) -> Self {
        Cell { row, col }
    }

    /// The four cardinal neighbors in fixed order: up, down, left, right.
    ///
    /// DFS results depend on this order, so it must never change.
    ///
    /// NOTE: This way of handling underflow/overflow is overflow-safe.
    /// When row or col is 0, wrapping the subtraction lands on u16::MAX,
    /// and saturating the addition pins at u16::MAX; both fall outside any
    /// valid grid dimension, so bounds-checked queries treat them as walls.
    pub fn neighbors4(self) -> [Cell; 4] {
        [
            Cell::new(self.row.wrapping_sub(1), self.col),
            Cell::new(self.row.saturating_add(1), self.col),
            Cell::new(self.row, self.col.wrapping_sub(1)),
            Cell::new(self.row, self.col.saturating_add(1)),
        ]
    }
}

impl From<(u16, u16)> for Cell {
    fn from((row, col): (u16, u16)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
