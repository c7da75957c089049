//! prioq - Main Entry Point
//! Loads settings, wires the random source and logging sink, runs to completion.

use anyhow::{Context, Result};
use clap::Parser;
use prioq_core::application::RunCoordinator;
use prioq_core::port::{LoggingSink, RandomWorkSource, WorkSource};
use prioq_runner::report::render_text;
use prioq_runner::telemetry::init_tracing;
use prioq_runner::{drive, load_run_config, Cli, ReportFormat};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    init_tracing(cli.log_format)?;
    info!("prioq v{} starting...", prioq_core::VERSION);

    // 2. Load configuration (defaults <- file <- env <- flags)
    let mut config = load_run_config(cli.config.as_deref(), None)?;
    cli.apply(&mut config);
    info!(?config, "Configuration loaded");

    // 3. Wire the run
    let coordinator =
        RunCoordinator::<String>::new(config.clone()).context("Invalid run configuration")?;
    let max_priority = config.max_priority;
    let source_config = config.clone();
    let make_source = move |index: usize, _name: &str| -> Box<dyn WorkSource<String>> {
        // Offset keeps priority and pacing streams apart under the same seed
        let seed = source_config
            .worker_seed(index)
            .map(|seed| seed.wrapping_add(1 << 32));
        Box::new(RandomWorkSource::new(max_priority, seed))
    };

    info!("Press Ctrl+C to stop early");

    // 4. Run until done or interrupted
    let report = drive(coordinator, make_source, Arc::new(LoggingSink), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable, running to completion");
            std::future::pending::<()>().await;
        }
    })
    .await?;

    // 5. Report
    match cli.report {
        ReportFormat::Text => print!("{}", render_text(&report)),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
