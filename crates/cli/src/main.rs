mod batch;
mod cli;
mod config;
mod terminal;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tempo_scheduler::Scheduler;
use tracing::{info, warn};

use crate::batch::{run_batch, Reporter};
use crate::cli::CliArgs;
use crate::terminal::Terminal;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = config::load(args.config.as_deref()).context("failed to load configuration")?;
    let scheduler = Scheduler::with_config(config).context("failed to create scheduler")?;
    scheduler.start().context("failed to start scheduler")?;

    let failing: HashSet<usize> = args.fail.iter().copied().collect();
    let reporter: Reporter = Arc::new(|number| {
        if let Err(e) = terminal::print_task_completed(number) {
            warn!(error = %e, task = number, "failed to print completion");
        }
    });

    let submitted = match args.delays {
        Some(delays) => run_batch(&scheduler, delays.into_iter().map(Ok), &failing, reporter)?,
        None => {
            let mut term = Terminal::stdin();
            term.print_banner()?;
            let count = term.prompt_number("Enter the number of tasks: ")?;
            let delays = (1..=count).map(|i| {
                term.prompt_number(&format!("Enter the delay for task {i} (seconds): "))
            });
            run_batch(&scheduler, delays, &failing, reporter)?
        }
    };

    scheduler.stop();

    let metrics = scheduler.metrics();
    info!(
        submitted,
        completed = metrics.completed,
        failed = metrics.failed,
        avg_task_duration = ?metrics.avg_task_duration,
        max_lateness = ?metrics.max_lateness,
        "batch finished"
    );
    terminal::print_info(&format!(
        "{} task(s) run, {} failed",
        metrics.completed, metrics.failed
    ))?;
    Ok(())
}
