use super::RandomSource;
use crate::maze::{Cell, Grid};

/// Row/col deltas for the four carve directions, two cells at a time so a
/// one-cell wall lattice survives between parallel corridors.
const CARVE_STEPS: [(i32, i32); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Randomized depth-first carver ("recursive backtracker").
///
/// Walks the step-2 lattice of interior cells with an explicit stack: while
/// the top of the stack has uncarved step-2 neighbors, pick one uniformly,
/// open it along with the wall cell between, and descend; otherwise pop.
/// The stack is explicit because a 255x255 grid would nest thousands of
/// recursive calls deep.
///
/// The carved passages form a spanning tree over the lattice: exactly one
/// simple path connects any two carved cells.
pub(super) fn carve(grid: &mut Grid, rng: &mut dyn RandomSource) {
    let origin = Cell::new(1, 1);
    if !grid.is_in_bounds(origin) {
        return;
    }
    grid.set_passage(origin);
    let mut stack = vec![origin];

    while let Some(&current) = stack.last() {
        let candidates = carve_candidates(grid, current);
        if candidates.is_empty() {
            // Dead end, backtrack
            stack.pop();
        } else {
            let (next, link) = candidates[rng.next_index(candidates.len())];
            grid.set_passage(next);
            grid.set_passage(link);
            stack.push(next);
        }
    }
}

/// Step-2 neighbors of `current` that are strictly interior and still
/// solid, each paired with the wall cell a carve toward it would open.
fn carve_candidates(grid: &Grid, current: Cell) -> Vec<(Cell, Cell)> {
    let rows = grid.rows() as i32;
    let cols = grid.cols() as i32;
    CARVE_STEPS
        .iter()
        .filter_map(|&(dr, dc)| {
            let row = current.row as i32 + dr;
            let col = current.col as i32 + dc;
            if row <= 0 || row >= rows - 1 || col <= 0 || col >= cols - 1 {
                return None;
            }
            let next = Cell::new(row as u16, col as u16);
            if !grid.is_wall(next) {
                return None;
            }
            let link = Cell::new(
                (current.row as i32 + dr / 2) as u16,
                (current.col as i32 + dc / 2) as u16,
            );
            Some((next, link))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ZeroRandom;

    impl RandomSource for ZeroRandom {
        fn next_index(&mut self, _n: usize) -> usize {
            0
        }
    }

    #[test]
    fn candidates_are_interior_walls_only() {
        let grid = Grid::new(5, 5);
        let candidates = carve_candidates(&grid, Cell::new(1, 1));
        // Up and left would leave the interior; down and right remain.
        assert_eq!(
            candidates,
            vec![
                (Cell::new(3, 1), Cell::new(2, 1)),
                (Cell::new(1, 3), Cell::new(1, 2)),
            ]
        );
    }

    #[test]
    fn carve_without_room_to_step_only_opens_the_origin() {
        let mut grid = Grid::new(3, 3);
        carve(&mut grid, &mut ZeroRandom);
        for row in 0..3 {
            for col in 0..3 {
                let cell = Cell::new(row, col);
                assert_eq!(grid.is_passage(cell), cell == Cell::new(1, 1));
            }
        }
    }

    #[test]
    fn carve_opens_the_full_odd_lattice() {
        let mut grid = Grid::new(9, 9);
        carve(&mut grid, &mut ZeroRandom);
        // Every odd-odd lattice cell must be reached by the spanning walk.
        for row in [1, 3, 5, 7] {
            for col in [1, 3, 5, 7] {
                assert!(grid.is_passage(Cell::new(row, col)), "({row}, {col}) not carved");
            }
        }
        // Both-even cells are never touched.
        for row in [0, 2, 4, 6, 8] {
            for col in [0, 2, 4, 6, 8] {
                assert!(grid.is_wall(Cell::new(row, col)));
            }
        }
    }
}
