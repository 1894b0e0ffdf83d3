#![forbid(unsafe_code)]

//! Spectrum demo binary entry point.

use std::time::Instant;

use spectrum::{ReportEngine, WriterSink};
use spectrum_demo::{cli, scenario};
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(errors) = opts.config.validate() {
        for error in errors {
            eprintln!("Invalid configuration: {error}");
        }
        std::process::exit(2);
    }

    let mut engine = ReportEngine::new(opts.config, WriterSink::stdout());
    let outcome = scenario::run(&mut engine, Instant::now());
    tracing::info!(
        reports = engine.reports_emitted(),
        steps = outcome.steps,
        views = outcome.ui.view_count(),
        "demo finished"
    );
}
