use mazerace::app::App;
use tracing_subscriber::EnvFilter;

/// Logs go to a file: the terminal runs in raw mode and belongs to the
/// renderer, so writing log lines to stdout would tear the grid.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", "mazerace.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    // Keep the guard alive for the whole run so buffered logs flush on exit.
    let _log_guard = init_logging();

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let app = App::default();
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    result
}
