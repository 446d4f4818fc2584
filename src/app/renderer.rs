use std::{
    collections::HashSet,
    fmt,
    io::{Stdout, Write},
    sync::{
        Arc,
        mpsc::{Receiver, SyncSender},
    },
    time::Instant,
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    maze::{Cell, Maze},
    solvers::{RenderSink, SearchStatus, Snapshot, Solver},
};

/// One animation frame: a snapshot tagged with the algorithm that made it.
pub struct Frame {
    pub solver: Solver,
    pub snapshot: Snapshot,
}

/// Sink that forwards snapshots to the render thread.
///
/// The channel is bounded, so a fast search blocks here until the renderer
/// catches up rather than piling frames into memory.
pub struct ChannelSink {
    solver: Solver,
    tx: SyncSender<Frame>,
}

impl ChannelSink {
    pub fn new(solver: Solver, tx: SyncSender<Frame>) -> Self {
        ChannelSink { solver, tx }
    }
}

impl RenderSink for ChannelSink {
    fn draw(&mut self, snapshot: Snapshot) {
        // A renderer that hung up (I/O error) must not kill the search;
        // the run still finishes and reports.
        let _ = self.tx.send(Frame {
            solver: self.solver,
            snapshot,
        });
    }
}

/// What one grid cell looks like on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Glyph {
    Wall,
    Open,
    Explored(Solver),
    PathMark,
    Start,
    End,
}

impl Glyph {
    /// The width of each cell when rendered, in character widths.
    const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "⬜".with(Color::White),
            Glyph::Open => "  ".with(Color::Reset),
            Glyph::Explored(Solver::Bfs) => "░░".with(Color::Green),
            Glyph::Explored(Solver::Dfs) => "░░".with(Color::Red),
            Glyph::PathMark => "🟨".with(Color::Yellow),
            Glyph::Start => "🟩".with(Color::Green),
            Glyph::End => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Drawing state for one algorithm's panel.
struct Lane {
    solver: Solver,
    /// Leftmost terminal column of this panel.
    origin: u16,
    /// Explored cells already on screen.
    drawn: HashSet<Cell>,
    /// Path cells currently highlighted.
    path: Vec<Cell>,
    /// Set when the lane's first frame arrives.
    started: Option<Instant>,
}

impl Lane {
    fn new(solver: Solver, origin: u16) -> Self {
        Lane {
            solver,
            origin,
            drawn: HashSet::new(),
            path: Vec::new(),
            started: None,
        }
    }
}

/// Renders both panels from a single thread.
///
/// The two searches deliver frames over one channel; per-sender order is
/// preserved, so each lane's snapshots arrive in step order even though
/// the lanes interleave arbitrarily.
pub struct Renderer {
    stdout: Stdout,
    maze: Arc<Maze>,
    lanes: [Lane; 2],
}

impl Renderer {
    /// Terminal columns between the two panels.
    pub const PANEL_GAP: u16 = 4;
    /// The width of each maze cell, in terminal columns.
    pub const CELL_WIDTH: u16 = Glyph::CELL_WIDTH;
    /// Rows used beyond the maze itself: header above, stats line below,
    /// and the summary block printed after the run.
    pub const RESERVED_ROWS: u16 = 6;

    pub fn new(maze: Arc<Maze>) -> Self {
        let panel_width = maze.cols() * Glyph::CELL_WIDTH;
        let lanes = [
            Lane::new(Solver::Bfs, 0),
            Lane::new(Solver::Dfs, panel_width + Self::PANEL_GAP),
        ];
        Renderer {
            stdout: std::io::stdout(),
            maze,
            lanes,
        }
    }

    /// Drains frames until every sender hangs up, then parks the cursor
    /// below the panels for the summary.
    pub fn render(&mut self, rx: Receiver<Frame>) -> std::io::Result<()> {
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )?;
        for lane in &self.lanes {
            Self::draw_panel(&mut self.stdout, &self.maze, lane)?;
        }
        self.stdout.flush()?;

        while let Ok(frame) = rx.recv() {
            self.draw_frame(frame)?;
        }

        queue!(
            self.stdout,
            cursor::MoveTo(0, self.maze.rows() + 2),
            cursor::Show
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    fn draw_frame(&mut self, frame: Frame) -> std::io::Result<()> {
        let lane = match frame.solver {
            Solver::Bfs => &mut self.lanes[0],
            Solver::Dfs => &mut self.lanes[1],
        };
        let started = *lane.started.get_or_insert_with(Instant::now);
        let snapshot = frame.snapshot;

        // Newly explored cells since the last frame of this lane.
        for &cell in &snapshot.explored {
            if lane.drawn.insert(cell) {
                Self::put_cell(
                    &mut self.stdout,
                    &self.maze,
                    lane.origin,
                    cell,
                    Glyph::Explored(lane.solver),
                )?;
            }
        }

        // Path diff: cells that left the path revert to explored, new ones
        // get the highlight. DFS shrinks the path on backtrack; BFS only
        // ever reports one, final, path.
        let current: HashSet<Cell> = snapshot.path.iter().copied().collect();
        for &cell in &lane.path {
            if !current.contains(&cell) {
                Self::put_cell(
                    &mut self.stdout,
                    &self.maze,
                    lane.origin,
                    cell,
                    Glyph::Explored(lane.solver),
                )?;
            }
        }
        for &cell in &snapshot.path {
            Self::put_cell(&mut self.stdout, &self.maze, lane.origin, cell, Glyph::PathMark)?;
        }
        lane.path = snapshot.path.clone();

        Self::draw_stats(&mut self.stdout, &self.maze, lane, &snapshot, started)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Header, base maze, and an idle stats line for one panel.
    fn draw_panel(stdout: &mut Stdout, maze: &Maze, lane: &Lane) -> std::io::Result<()> {
        let width = Self::panel_text_width(maze);
        let header = format!("{}", lane.solver);
        let (header, _) = header.unicode_truncate(width);
        stdout
            .queue(cursor::MoveTo(lane.origin, 0))?
            .queue(style::PrintStyledContent(
                header
                    .to_string()
                    .with(Self::lane_color(lane.solver))
                    .attribute(Attribute::Bold),
            ))?;

        for row in 0..maze.rows() {
            stdout.queue(cursor::MoveTo(lane.origin, row + 1))?;
            for col in 0..maze.cols() {
                let cell = Cell::new(row, col);
                stdout.queue(style::Print(Self::base_glyph(maze, cell)))?;
            }
        }

        stdout
            .queue(cursor::MoveTo(lane.origin, maze.rows() + 1))?
            .queue(style::PrintStyledContent("Ready".with(Color::DarkGrey)))?;
        Ok(())
    }

    fn base_glyph(maze: &Maze, cell: Cell) -> Glyph {
        if cell == maze.start() {
            Glyph::Start
        } else if cell == maze.end() {
            Glyph::End
        } else if maze.grid().is_passage(cell) {
            Glyph::Open
        } else {
            Glyph::Wall
        }
    }

    /// Overlay glyphs never cover the endpoint markers.
    fn put_cell(
        stdout: &mut Stdout,
        maze: &Maze,
        origin: u16,
        cell: Cell,
        glyph: Glyph,
    ) -> std::io::Result<()> {
        if cell == maze.start() || cell == maze.end() {
            return Ok(());
        }
        stdout
            .queue(cursor::MoveTo(
                origin + cell.col * Glyph::CELL_WIDTH,
                cell.row + 1,
            ))?
            .queue(style::Print(glyph))?;
        Ok(())
    }

    fn draw_stats(
        stdout: &mut Stdout,
        maze: &Maze,
        lane: &Lane,
        snapshot: &Snapshot,
        started: Instant,
    ) -> std::io::Result<()> {
        let path_cells = match snapshot.status {
            SearchStatus::Running if lane.solver == Solver::Bfs => "-".to_string(),
            _ => snapshot.path.len().to_string(),
        };
        let text = format!(
            "explored {}  path {}  {:.1}s  {}",
            snapshot.explored.len(),
            path_cells,
            started.elapsed().as_secs_f64(),
            snapshot.status,
        );
        let width = Self::panel_text_width(maze);
        let (text, _) = text.unicode_truncate(width);
        // Pad to the panel width so shrinking text overwrites its leftovers
        // without clearing into the neighboring panel.
        let text = format!("{text:<width$}");
        let color = match snapshot.status {
            SearchStatus::Running => Color::Reset,
            SearchStatus::Found => Color::Green,
            SearchStatus::Exhausted => Color::Red,
        };
        stdout
            .queue(cursor::MoveTo(lane.origin, maze.rows() + 1))?
            .queue(style::PrintStyledContent(text.with(color)))?;
        Ok(())
    }

    fn lane_color(solver: Solver) -> Color {
        match solver {
            Solver::Bfs => Color::Green,
            Solver::Dfs => Color::Red,
        }
    }

    /// Widest text that fits a panel without bleeding into its neighbor.
    fn panel_text_width(maze: &Maze) -> usize {
        (maze.cols() * Glyph::CELL_WIDTH + Self::PANEL_GAP - 2) as usize
    }
}
