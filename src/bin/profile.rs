//! Headless generate-and-race run for profiling: no terminal, no delays.

use std::sync::Arc;

use mazerace::{
    config::RaceConfig,
    generators::{self, StdRandom},
    solvers::{self, NullClock, NullSink, SearchStatus},
};

fn main() {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let size: u16 = args.next().and_then(|s| s.parse().ok()).unwrap_or(55);
    let seed: Option<u64> = args.next().and_then(|s| s.parse().ok());

    let config = match RaceConfig::new(size, size, 1) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut rng = StdRandom::new(seed);
    let maze = Arc::new(generators::generate(
        config.rows(),
        config.cols(),
        config.start(),
        config.end(),
        &mut rng,
    ));

    let (bfs, dfs) = solvers::solve_both(
        &maze,
        Box::new(NullSink),
        Box::new(NullSink),
        Arc::new(NullClock),
        config.step_ms(),
    );

    for report in [bfs, dfs] {
        let outcome = match report.status {
            SearchStatus::Found => format!("path of {} cells", report.path_len()),
            _ => "no path".to_string(),
        };
        println!(
            "{}: {} ({} cells explored in {:.3}s)",
            report.solver.label(),
            outcome,
            report.explored,
            report.elapsed.as_secs_f64(),
        );
    }
}
