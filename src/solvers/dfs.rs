use std::collections::HashSet;
use std::time::Instant;

use super::{Clock, RenderSink, SearchReport, SearchStatus, Snapshot, Solver};
use crate::maze::{Cell, Maze};

/// One entry on the traversal stack: a cell plus the index of the next
/// neighbor direction to try from it.
struct Frame {
    cell: Cell,
    next_neighbor: usize,
}

/// Depth-first search with an explicit backtracking stack.
///
/// The stack replaces the natural recursive formulation so that deep
/// corridors (a 55x55 maze can wind through well over a thousand cells)
/// cannot overflow the call stack. Neighbor order is the same fixed
/// up/down/left/right as everywhere else, which fully determines the
/// branch the walk commits to first, and therefore which (generally
/// non-shortest) path it reports.
///
/// Rejected cells (out of bounds, wall, already visited) cost nothing:
/// no state changes, no snapshot. An accepted visit marks the cell, pushes
/// it on the path, emits a snapshot, and pauses; a dead end pops the cell
/// and emits a snapshot of the shrunk path without pausing. Running out of
/// cells emits a final Exhausted snapshot with an empty path.
pub fn solve_dfs(
    maze: &Maze,
    sink: &mut dyn RenderSink,
    clock: &dyn Clock,
    step_ms: u64,
) -> SearchReport {
    let started = Instant::now();
    let mut walk = Walk {
        maze,
        explored: HashSet::new(),
        visited: HashSet::new(),
        stack: Vec::new(),
        sink,
        clock,
        step_ms,
    };

    walk.enter(maze.start());
    loop {
        let Some(frame) = walk.stack.last() else {
            break;
        };
        if frame.cell == maze.end() {
            walk.emit(SearchStatus::Found);
            let path = walk.path();
            return SearchReport {
                solver: Solver::Dfs,
                status: SearchStatus::Found,
                explored: walk.explored.len(),
                path,
                elapsed: started.elapsed(),
            };
        }

        let cell = frame.cell;
        let direction = frame.next_neighbor;
        if direction < 4 {
            if let Some(frame) = walk.stack.last_mut() {
                frame.next_neighbor += 1;
            }
            walk.enter(cell.neighbors4()[direction]);
        } else {
            // Every branch from this cell failed: backtrack.
            walk.stack.pop();
            walk.emit(SearchStatus::Running);
        }
    }

    // The stack is empty, so this snapshot carries an empty path.
    walk.emit(SearchStatus::Exhausted);
    SearchReport {
        solver: Solver::Dfs,
        status: SearchStatus::Exhausted,
        explored: walk.explored.len(),
        path: Vec::new(),
        elapsed: started.elapsed(),
    }
}

struct Walk<'a> {
    maze: &'a Maze,
    explored: HashSet<Cell>,
    visited: HashSet<Cell>,
    stack: Vec<Frame>,
    sink: &'a mut dyn RenderSink,
    clock: &'a dyn Clock,
    step_ms: u64,
}

impl Walk<'_> {
    /// Tries to step onto `cell`. Walls (including anything out of bounds)
    /// and visited cells are cheap rejections; an accepted visit is one
    /// animated exploration step.
    fn enter(&mut self, cell: Cell) -> bool {
        if !self.maze.grid().is_passage(cell) || self.visited.contains(&cell) {
            return false;
        }
        self.visited.insert(cell);
        self.explored.insert(cell);
        self.stack.push(Frame {
            cell,
            next_neighbor: 0,
        });
        self.emit(SearchStatus::Running);
        self.clock.delay(self.step_ms);
        true
    }

    fn path(&self) -> Vec<Cell> {
        self.stack.iter().map(|frame| frame.cell).collect()
    }

    fn emit(&mut self, status: SearchStatus) {
        let snapshot = Snapshot {
            explored: self.explored.clone(),
            path: self.path(),
            status,
        };
        self.sink.draw(snapshot);
    }
}
