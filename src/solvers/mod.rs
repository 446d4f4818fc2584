mod bfs;
mod dfs;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::maze::{Cell, Maze};

pub use bfs::solve_bfs;
pub use dfs::solve_dfs;

/// Which search algorithm a run (and its render panel) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Bfs,
    Dfs,
}

impl Solver {
    /// Short tag used in panel headers and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Solver::Bfs => "BFS",
            Solver::Dfs => "DFS",
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
        }
    }
}

/// Progress of a single search run.
///
/// A run moves `Running -> Found` or `Running -> Exhausted` and never
/// leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    Found,
    Exhausted,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Running => write!(f, "Solving..."),
            SearchStatus::Found => write!(f, "Found!"),
            SearchStatus::Exhausted => write!(f, "No path found"),
        }
    }
}

/// Point-in-time view of one run: every cell explored so far plus the path
/// the algorithm is currently committed to.
///
/// BFS only reports a path on the final Found snapshot; DFS reports its
/// live backtracking stack on every snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub explored: HashSet<Cell>,
    pub path: Vec<Cell>,
    pub status: SearchStatus,
}

/// Where snapshots go, one `draw` call per emitted snapshot.
///
/// Each run owns its sink; concurrent runs never share one, so a sink
/// implementation needs no internal locking for correctness.
pub trait RenderSink: Send {
    fn draw(&mut self, snapshot: Snapshot);
}

/// Discards every snapshot. Used by the profiling binary and tests.
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw(&mut self, _snapshot: Snapshot) {}
}

/// The pacing primitive between animation steps. Searches suspend through
/// it exactly once per accepted exploration step; it exists purely to make
/// progress observable, not for correctness.
pub trait Clock: Send + Sync {
    fn delay(&self, ms: u64);
}

/// Wall-clock pacing.
pub struct SystemClock;

impl Clock for SystemClock {
    fn delay(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Zero-delay clock for headless runs.
pub struct NullClock;

impl Clock for NullClock {
    fn delay(&self, _ms: u64) {}
}

/// Terminal outcome of one search run.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub solver: Solver,
    /// `Found` or `Exhausted`, never `Running`.
    pub status: SearchStatus,
    /// Number of distinct cells explored.
    pub explored: usize,
    /// Start-to-end path on success, empty on exhaustion.
    pub path: Vec<Cell>,
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn path_len(&self) -> usize {
        self.path.len()
    }
}

pub fn solve_maze(
    maze: &Maze,
    solver: Solver,
    sink: &mut dyn RenderSink,
    clock: &dyn Clock,
    step_ms: u64,
) -> SearchReport {
    match solver {
        Solver::Bfs => solve_bfs(maze, sink, clock, step_ms),
        Solver::Dfs => solve_dfs(maze, sink, clock, step_ms),
    }
}

/// Races both algorithms against the same maze, one thread each.
///
/// Every run gets its own sink and its own visited/explored state; the maze
/// is the only shared piece and is read-only. Returns only after both runs
/// reach a terminal state (a join barrier, not lockstep; the interleaving
/// of their snapshots is unspecified).
pub fn solve_both(
    maze: &Arc<Maze>,
    bfs_sink: Box<dyn RenderSink>,
    dfs_sink: Box<dyn RenderSink>,
    clock: Arc<dyn Clock>,
    step_ms: u64,
) -> (SearchReport, SearchReport) {
    let spawn_run = |solver: Solver, mut sink: Box<dyn RenderSink>| {
        let maze = Arc::clone(maze);
        let clock = Arc::clone(&clock);
        std::thread::spawn(move || solve_maze(&maze, solver, sink.as_mut(), clock.as_ref(), step_ms))
    };
    let bfs_handle = spawn_run(Solver::Bfs, bfs_sink);
    let dfs_handle = spawn_run(Solver::Dfs, dfs_sink);
    (
        bfs_handle.join().expect("BFS thread panicked"),
        dfs_handle.join().expect("DFS thread panicked"),
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::maze::Grid;

    /// Sink that keeps every snapshot for assertions.
    #[derive(Default)]
    pub struct RecordingSink {
        pub snapshots: Vec<Snapshot>,
    }

    impl RenderSink for RecordingSink {
        fn draw(&mut self, snapshot: Snapshot) {
            self.snapshots.push(snapshot);
        }
    }

    /// A maze whose whole interior is open, bordered by walls.
    pub fn open_maze(rows: u16, cols: u16) -> Maze {
        let mut grid = Grid::new(rows, cols);
        for row in 1..rows - 1 {
            for col in 1..cols - 1 {
                grid.set_passage(Cell::new(row, col));
            }
        }
        Maze::new(grid, Cell::new(1, 1), Cell::new(rows - 2, cols - 2))
    }

    /// A maze where the end cell is sealed off from the start.
    pub fn sealed_maze() -> Maze {
        let mut grid = Grid::new(5, 5);
        grid.set_passage(Cell::new(1, 1));
        grid.set_passage(Cell::new(1, 2));
        grid.set_passage(Cell::new(3, 3));
        Maze::new(grid, Cell::new(1, 1), Cell::new(3, 3))
    }

    /// Start-to-end walk over passages with unit steps, no revisits.
    pub fn assert_valid_path(maze: &Maze, path: &[Cell]) {
        assert_eq!(path.first(), Some(&maze.start()));
        assert_eq!(path.last(), Some(&maze.end()));
        let mut seen = HashSet::new();
        for window in path.windows(2) {
            let (a, b) = (window[0], window[1]);
            let dist = a.row.abs_diff(b.row) + a.col.abs_diff(b.col);
            assert_eq!(dist, 1, "{a} and {b} are not adjacent");
        }
        for &cell in path {
            assert!(maze.grid().is_passage(cell), "{cell} is a wall");
            assert!(seen.insert(cell), "{cell} appears twice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::generators::{self, StdRandom};

    fn generated(seed: u64, size: u16) -> Maze {
        let mut rng = StdRandom::new(Some(seed));
        generators::generate(
            size,
            size,
            Cell::new(1, 1),
            Cell::new(size - 2, size - 2),
            &mut rng,
        )
    }

    #[test]
    fn race_terminates_found_and_bfs_is_never_longer() {
        for seed in 0..5 {
            let maze = Arc::new(generated(seed, 15));
            let (bfs, dfs) = solve_both(
                &maze,
                Box::new(NullSink),
                Box::new(NullSink),
                Arc::new(NullClock),
                1,
            );
            assert_eq!(bfs.status, SearchStatus::Found);
            assert_eq!(dfs.status, SearchStatus::Found);
            assert!(
                bfs.path_len() <= dfs.path_len(),
                "seed {seed}: BFS path {} longer than DFS path {}",
                bfs.path_len(),
                dfs.path_len()
            );
            assert_valid_path(&maze, &bfs.path);
            assert_valid_path(&maze, &dfs.path);
        }
    }

    #[test]
    fn perfect_maze_has_a_unique_path_both_algorithms_find() {
        // Odd dimensions keep the endpoints on the carve lattice, so the
        // passages form a spanning tree and both searches must return the
        // same (unique) simple path.
        let maze = generated(42, 9);
        let bfs = solve_maze(&maze, Solver::Bfs, &mut NullSink, &NullClock, 1);
        let dfs = solve_maze(&maze, Solver::Dfs, &mut NullSink, &NullClock, 1);
        assert_eq!(bfs.path, dfs.path);
    }

    #[test]
    fn reports_carry_explored_counts_and_elapsed_time() {
        let maze = open_maze(5, 5);
        let report = solve_maze(&maze, Solver::Bfs, &mut NullSink, &NullClock, 1);
        assert_eq!(report.status, SearchStatus::Found);
        assert!(report.explored >= report.path_len());
        assert!(report.explored > 0);
    }
}
