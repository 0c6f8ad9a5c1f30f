mod commands;
mod logging;
mod output;
mod progress;

use std::process;

use anyhow::{bail, Context};
use clap::Parser;
use clean_folder_core::{Error, SortEngine};
use colored::*;
use commands::Cli;
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let args = Cli::parse();

    let guard = logging::init_logger();
    let result = run(args);
    if let Err(err) = &result {
        error!("Error: {:#}", err);
    }
    drop(guard);

    if result.is_err() {
        process::exit(1);
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let mut config =
        clean_folder_core::config::load_configuration().context("Error loading configuration")?;
    if let Some(workers) = args.workers {
        config.max_workers = workers;
    }
    if args.no_extract {
        config.extract_archives = false;
    }

    let engine = SortEngine::new(&args.root, config);
    let reporter = CliReporter::new();
    let result = match engine.run(&reporter) {
        Ok(result) => result,
        Err(Error::MoveFailed(failures)) => {
            for failure in &failures {
                error!("{}", output::move_failure_message(failure));
            }
            bail!("{} file operation(s) failed", failures.len());
        }
        Err(err) => return Err(err.into()),
    };

    output::print_report(&result.report);

    if let Some(csv_path) = &args.report_csv {
        output::write_csv(&result.report, csv_path)
            .with_context(|| format!("Error writing report to {}", csv_path.display()))?;
        info!("Report written to {}", csv_path.display());
    }

    info!(
        "Normalize: {}, Move: {}, Cleanup: {}, Extract: {}",
        format!("{:.2}s", result.normalize_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.move_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.cleanup_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.extract_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files sorted, {} duplicates deleted, {} empty directories removed",
        format!("{}", result.report.total_files()).cyan(),
        format!("{}", result.moves.deleted).red(),
        format!("{}", result.removed_dirs).cyan(),
    );
    println!(
        "Execution time: {} seconds",
        format!("{:.3}", result.total_duration.as_secs_f64()).green()
    );

    Ok(())
}
