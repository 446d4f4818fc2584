use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use super::{Clock, RenderSink, SearchReport, SearchStatus, Snapshot, Solver};
use crate::maze::Maze;

/// Breadth-first search, animating one dequeued path per step.
///
/// The frontier holds full paths rather than cells with parent pointers:
/// the path that first reaches the end is returned as-is, with no
/// backtracking pass. Paths leave the queue in non-decreasing length order
/// and visited-marking at enqueue time stops any cell from entering the
/// frontier twice, so the first path to reach the end has the minimum
/// possible cell count.
pub fn solve_bfs(
    maze: &Maze,
    sink: &mut dyn RenderSink,
    clock: &dyn Clock,
    step_ms: u64,
) -> SearchReport {
    let started = Instant::now();
    let mut explored = HashSet::new();
    let mut visited = HashSet::from([maze.start()]);
    let mut queue = VecDeque::from([vec![maze.start()]]);

    while let Some(path) = queue.pop_front() {
        let Some(&current) = path.last() else { continue };
        explored.insert(current);
        sink.draw(Snapshot {
            explored: explored.clone(),
            path: Vec::new(),
            status: SearchStatus::Running,
        });
        clock.delay(step_ms);

        if current == maze.end() {
            sink.draw(Snapshot {
                explored: explored.clone(),
                path: path.clone(),
                status: SearchStatus::Found,
            });
            return SearchReport {
                solver: Solver::Bfs,
                status: SearchStatus::Found,
                explored: explored.len(),
                path,
                elapsed: started.elapsed(),
            };
        }

        for neighbor in maze.grid().neighbors4(current) {
            if maze.grid().is_passage(neighbor) && visited.insert(neighbor) {
                let mut extended = path.clone();
                extended.push(neighbor);
                queue.push_back(extended);
            }
        }
    }

    // Expected on arbitrary grids; on a generated maze this means the
    // generator failed to connect the endpoints (callers log it).
    sink.draw(Snapshot {
        explored: explored.clone(),
        path: Vec::new(),
        status: SearchStatus::Exhausted,
    });
    SearchReport {
        solver: Solver::Bfs,
        status: SearchStatus::Exhausted,
        explored: explored.len(),
        path: Vec::new(),
        elapsed: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::{NullClock, NullSink};
    use super::*;
    use crate::maze::{Cell, Grid};

    #[test]
    fn open_grid_path_is_manhattan_shortest() {
        // (1,1) to (3,3) in an open interior: 4 steps, 5 cells.
        let maze = open_maze(5, 5);
        let report = solve_bfs(&maze, &mut NullSink, &NullClock, 1);
        assert_eq!(report.status, SearchStatus::Found);
        assert_eq!(report.path_len(), 5);
        assert_valid_path(&maze, &report.path);
    }

    #[test]
    fn explored_set_grows_by_exactly_one_per_step() {
        let maze = open_maze(7, 7);
        let mut sink = RecordingSink::default();
        solve_bfs(&maze, &mut sink, &NullClock, 1);

        let (terminal, steps) = sink
            .snapshots
            .split_last()
            .expect("at least one snapshot");
        for (i, snapshot) in steps.iter().enumerate() {
            assert_eq!(snapshot.status, SearchStatus::Running);
            assert_eq!(snapshot.explored.len(), i + 1);
            assert!(snapshot.path.is_empty(), "path only appears on success");
        }
        // The success snapshot repeats the final explored set and adds the path.
        assert_eq!(terminal.status, SearchStatus::Found);
        assert_eq!(terminal.explored.len(), steps.len());
        assert!(!terminal.path.is_empty());
    }

    #[test]
    fn sealed_end_exhausts_with_empty_path() {
        let maze = sealed_maze();
        let mut sink = RecordingSink::default();
        let report = solve_bfs(&maze, &mut sink, &NullClock, 1);
        assert_eq!(report.status, SearchStatus::Exhausted);
        assert!(report.path.is_empty());
        // Only the reachable pocket around the start gets explored.
        let last = sink.snapshots.last().expect("snapshots");
        assert_eq!(last.status, SearchStatus::Exhausted);
        assert_eq!(last.explored.len(), 2);
        assert!(!last.explored.contains(&Cell::new(3, 3)));
    }

    #[test]
    fn start_equal_to_end_is_found_immediately() {
        let mut grid = Grid::new(3, 3);
        grid.set_passage(Cell::new(1, 1));
        let maze = crate::maze::Maze::new(grid, Cell::new(1, 1), Cell::new(1, 1));
        let report = solve_bfs(&maze, &mut NullSink, &NullClock, 1);
        assert_eq!(report.status, SearchStatus::Found);
        assert_eq!(report.path_len(), 1);
        assert_eq!(report.explored, 1);
    }
}
