mod renderer;

pub use renderer::{ChannelSink, Frame, Renderer};

use std::{
    fmt,
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    config::{ConfigError, RaceConfig, SizePreset, SpeedPreset},
    generators::{self, StdRandom},
    maze::Maze,
    solvers::{self, Clock, SearchReport, SearchStatus, Solver, SystemClock},
};

/// One interactive session: the current maze, its configuration, and the
/// busy guard that keeps top-level runs from overlapping.
pub struct Session {
    config: RaceConfig,
    maze: Option<Arc<Maze>>,
    busy: Arc<AtomicBool>,
}

impl Session {
    pub fn new(config: RaceConfig) -> Self {
        Session {
            config,
            maze: None,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn maze(&self) -> Option<&Arc<Maze>> {
        self.maze.as_ref()
    }

    /// Replaces the current maze with a freshly generated one. Ignored if
    /// a run is in flight.
    pub fn generate(&mut self) {
        let Some(_guard) = self.try_begin() else {
            return;
        };
        let mut rng = StdRandom::new(None);
        let maze = generators::generate(
            self.config.rows(),
            self.config.cols(),
            self.config.start(),
            self.config.end(),
            &mut rng,
        );
        tracing::info!(
            rows = self.config.rows(),
            cols = self.config.cols(),
            "generated maze"
        );
        self.maze = Some(Arc::new(maze));
    }

    pub fn set_speed(&mut self, preset: SpeedPreset) -> Result<(), ConfigError> {
        self.config = self.config.with_step_ms(preset.step_ms())?;
        Ok(())
    }

    /// Claims the busy flag for one top-level run.
    ///
    /// Returns `None` when a run is already in flight; callers silently
    /// drop the request (overlapping requests are ignored, not errors). A
    /// race claims the guard once and drives both algorithms under it.
    fn try_begin(&self) -> Option<BusyGuard> {
        match self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        {
            Ok(_) => Some(BusyGuard(Arc::clone(&self.busy))),
            Err(_) => {
                tracing::debug!("a run is already in flight; request ignored");
                None
            }
        }
    }
}

/// Clears the busy flag when a run finishes, however it exits.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Menu entries, one per control of the original visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Generate,
    SolveBfs,
    SolveDfs,
    Race,
    ChangeSpeed,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Generate => write!(f, "Generate a new maze"),
            Action::SolveBfs => write!(f, "Solve with {}", Solver::Bfs),
            Action::SolveDfs => write!(f, "Solve with {}", Solver::Dfs),
            Action::Race => write!(f, "Race BFS vs DFS"),
            Action::ChangeSpeed => write!(f, "Change animation speed"),
            Action::Quit => write!(f, "Quit"),
        }
    }
}

/// Size menu: the two original presets plus free-form dimensions.
#[derive(Debug, Clone, Copy)]
enum SizeChoice {
    Preset(SizePreset),
    Custom,
}

impl fmt::Display for SizeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeChoice::Preset(preset) => preset.fmt(f),
            SizeChoice::Custom => write!(f, "Custom..."),
        }
    }
}

pub struct App {
    /// Bound on frames buffered between the search threads and the renderer.
    frame_buffer: usize,
}

impl Default for App {
    fn default() -> Self {
        Self { frame_buffer: 1024 }
    }
}

impl App {
    const ACTIONS: [Action; 6] = [
        Action::Generate,
        Action::SolveBfs,
        Action::SolveDfs,
        Action::Race,
        Action::ChangeSpeed,
        Action::Quit,
    ];
    const SPEEDS: [SpeedPreset; 3] = [SpeedPreset::Slow, SpeedPreset::Normal, SpeedPreset::Fast];

    /// Set a panic hook to restore terminal state on panic, even if the
    /// panic occurs in a different thread.
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen.
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Leave alternate screen and disable raw mode.
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop: configure once, then loop over the action
    /// menu until the user quits.
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        let (rows, cols) = match App::ask_maze_dimensions(stdout)? {
            Some(dims) => dims,
            None => return Ok(()),
        };
        let speed = match App::select_from_menu(
            stdout,
            "Animation speed (use arrow keys and Enter, or Esc to exit):",
            &App::SPEEDS,
        )? {
            Some(speed) => speed,
            None => return Ok(()),
        };

        let config = match RaceConfig::new(rows, cols, speed.step_ms()) {
            Ok(config) => config,
            Err(e) => {
                stdout.execute(style::PrintStyledContent(
                    format!("Invalid configuration: {e}\r\n").with(Color::Red),
                ))?;
                return Ok(());
            }
        };
        let mut session = Session::new(config);
        session.generate();

        loop {
            queue!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
            stdout.queue(style::PrintStyledContent(
                format!(
                    "mazerace - {}x{}, {} ms/step\r\n\r\n",
                    session.config().rows(),
                    session.config().cols(),
                    session.config().step_ms()
                )
                .with(Color::Yellow)
                .attribute(Attribute::Bold),
            ))?;
            stdout.flush()?;

            let action = match App::select_from_menu(
                stdout,
                "What next? (use arrow keys and Enter, or Esc to exit):",
                &App::ACTIONS,
            )? {
                Some(action) => action,
                None => break,
            };
            match action {
                Action::Generate => session.generate(),
                Action::SolveBfs => self.run_search(stdout, &session, Some(Solver::Bfs))?,
                Action::SolveDfs => self.run_search(stdout, &session, Some(Solver::Dfs))?,
                Action::Race => self.run_search(stdout, &session, None)?,
                Action::ChangeSpeed => {
                    if let Some(speed) = App::select_from_menu(
                        stdout,
                        "Animation speed (use arrow keys and Enter, or Esc to go back):",
                        &App::SPEEDS,
                    )? {
                        // Presets are all non-zero, so this cannot fail.
                        session.set_speed(speed).ok();
                    }
                }
                Action::Quit => break,
            }
        }
        Ok(())
    }

    /// Animates one solver, or races both when `solver` is `None`, then
    /// prints the summary and waits for a key.
    fn run_search(
        &self,
        stdout: &mut Stdout,
        session: &Session,
        solver: Option<Solver>,
    ) -> std::io::Result<()> {
        let Some(maze) = session.maze() else {
            return Ok(());
        };
        let Some(_guard) = session.try_begin() else {
            return Ok(());
        };

        let (frame_tx, frame_rx) = mpsc::sync_channel::<Frame>(self.frame_buffer);
        let render_maze = Arc::clone(maze);
        let render_handle = std::thread::spawn(move || Renderer::new(render_maze).render(frame_rx));

        let step_ms = session.config().step_ms();
        let reports = match solver {
            Some(solver) => {
                let mut sink = ChannelSink::new(solver, frame_tx);
                vec![solvers::solve_maze(
                    maze,
                    solver,
                    &mut sink,
                    &SystemClock,
                    step_ms,
                )]
            }
            None => {
                let bfs_sink = Box::new(ChannelSink::new(Solver::Bfs, frame_tx.clone()));
                let dfs_sink = Box::new(ChannelSink::new(Solver::Dfs, frame_tx.clone()));
                // The renderer only exits once every sender is gone.
                drop(frame_tx);
                let clock: Arc<dyn Clock> = Arc::new(SystemClock);
                let (bfs, dfs) = solvers::solve_both(maze, bfs_sink, dfs_sink, clock, step_ms);
                vec![bfs, dfs]
            }
        };

        render_handle.join().expect("Render thread panicked")?;

        for report in &reports {
            if report.status == SearchStatus::Exhausted {
                // Generated mazes are always connected; reaching this is a
                // generator or search defect, not bad input.
                tracing::warn!(
                    solver = report.solver.label(),
                    "search exhausted on a generated maze"
                );
            }
            App::print_summary(stdout, report)?;
        }

        stdout.execute(style::PrintStyledContent(
            "Press Enter to return to the menu...\r\n"
                .with(Color::Blue)
                .attribute(Attribute::Bold),
        ))?;
        App::wait_for_enter()?;
        Ok(())
    }

    fn print_summary(stdout: &mut Stdout, report: &SearchReport) -> std::io::Result<()> {
        let line = match report.status {
            SearchStatus::Found => format!(
                "{}: path found - {} cells long, {} explored, {:.2}s\r\n",
                report.solver.label(),
                report.path_len(),
                report.explored,
                report.elapsed.as_secs_f64(),
            ),
            _ => format!(
                "{}: no path found - {} explored, {:.2}s\r\n",
                report.solver.label(),
                report.explored,
                report.elapsed.as_secs_f64(),
            ),
        };
        let color = match report.status {
            SearchStatus::Found => Color::Green,
            _ => Color::Red,
        };
        stdout.execute(style::PrintStyledContent(
            line.with(color).attribute(Attribute::Bold),
        ))?;
        Ok(())
    }

    /// Blocks until the user presses Enter (or Esc).
    fn wait_for_enter() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind == event::KeyEventKind::Press
                    && matches!(code, KeyCode::Enter | KeyCode::Esc)
                {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Largest maze that fits the terminal with two panels side by side,
    /// forced odd (the carve lattice wants odd dimensions) and at least 3.
    fn max_maze_dims() -> (u16, u16) {
        let (term_width, term_height) = terminal::size().unwrap_or((80, 24));
        let odd_and_min_3 = |n: u16| if n % 2 == 0 && n > 0 { n - 1 } else { n }.max(3);
        let max_cols = odd_and_min_3(
            term_width.saturating_sub(Renderer::PANEL_GAP) / (2 * Renderer::CELL_WIDTH),
        );
        let max_rows = odd_and_min_3(term_height.saturating_sub(Renderer::RESERVED_ROWS));
        (max_rows, max_cols)
    }

    /// Ask for maze dimensions: a preset (clamped to the terminal) or
    /// custom rows/cols with live validation.
    /// Returns `None` if the user cancels with Esc.
    fn ask_maze_dimensions(stdout: &mut Stdout) -> std::io::Result<Option<(u16, u16)>> {
        let choices = [
            SizeChoice::Preset(SizePreset::Small),
            SizeChoice::Preset(SizePreset::Big),
            SizeChoice::Custom,
        ];
        let choice = match App::select_from_menu(
            stdout,
            "Maze size (use arrow keys and Enter, or Esc to exit):",
            &choices,
        )? {
            Some(choice) => choice,
            None => return Ok(None),
        };

        let (max_rows, max_cols) = App::max_maze_dims();
        match choice {
            SizeChoice::Preset(preset) => {
                let (rows, cols) = preset.dims();
                if rows > max_rows || cols > max_cols {
                    tracing::debug!(
                        rows, cols, max_rows, max_cols,
                        "preset clamped to terminal size"
                    );
                }
                Ok(Some((rows.min(max_rows), cols.min(max_cols))))
            }
            SizeChoice::Custom => {
                let validate = |s: &str, max: u16| -> Result<u16, String> {
                    if s.trim().is_empty() {
                        return Ok(max);
                    }
                    let error_msg = format!("Please enter a number between 3 and {max}.");
                    s.trim()
                        .parse::<u16>()
                        .map_err(|_| error_msg.clone())
                        .and_then(|n| match n {
                            3.. if n <= max => Ok(n),
                            _ => Err(error_msg),
                        })
                };
                let rows = match App::prompt_with_validation(stdout, "Rows: ", |s| {
                    validate(s, max_rows)
                })? {
                    Some(rows) => rows,
                    None => return Ok(None),
                };
                let cols = match App::prompt_with_validation(stdout, "Cols: ", |s| {
                    validate(s, max_cols)
                })? {
                    Some(cols) => cols,
                    None => return Ok(None),
                };
                Ok(Some((rows, cols)))
            }
        }
    }

    /// Get user input with real-time validation and feedback.
    /// Returns `None` if the user cancels with Esc.
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        stdout.flush()?;

        let mut input = String::new();
        let value = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            let validation = validate(&input);
            let input_color = match validation {
                Ok(_) => Color::Green,
                Err(_) => Color::Red,
            };
            queue!(
                stdout,
                style::SetForegroundColor(input_color),
                style::Print(&input),
                style::ResetColor,
                style::Print(" \r\n")
            )?;
            if let Err(msg) = &validation {
                stdout.queue(style::PrintStyledContent(
                    msg.as_str().with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Enter => {
                        if let Ok(value) = validation {
                            break Some(value);
                        }
                    }
                    KeyCode::Char(c) if !c.is_whitespace() && !c.is_control() => {
                        input.push(c);
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };

        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;
        Ok(value)
    }

    /// Present a menu and let the user select with arrow keys.
    /// Returns `None` if the user cancels with Esc.
    fn select_from_menu<T: fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;
        let choice = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;
            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Up => {
                        selected = match selected {
                            0 => options.len() - 1,
                            _ => selected - 1,
                        };
                    }
                    KeyCode::Down => {
                        selected = if selected + 1 >= options.len() {
                            0
                        } else {
                            selected + 1
                        };
                    }
                    KeyCode::Enter => break Some(options[selected]),
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };

        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;
        Ok(choice)
    }
}
