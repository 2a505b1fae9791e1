//! Run command implementation.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use qexp_runner::{ExecutorKind, Pipeline, RunReport};

use super::common::{print_counts, source_from_arg};
use crate::cli::RunArgs;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = args.to_config()?;
    let pipeline = Pipeline::new(config);
    let report = run_with(&pipeline, &args.source).await?;

    print_counts(&report.counts, report.shots);
    if let Some(dominant) = &report.dominant {
        println!("\n  Dominant state: {}", style(dominant).yellow().bold());
    }
    if let Some(ms) = report.execution_time_ms {
        println!("  Execution time: {} ms", style(ms).yellow());
    }

    println!(
        "\n{} Saved {}",
        style("✓").green().bold(),
        style(report.paths.record.display()).green()
    );
    if let Some(histogram) = &report.paths.histogram {
        println!("  Saved {}", style(histogram.display()).green());
    }
    Ok(())
}

/// Run the pipeline for `source_arg` under a spinner, then describe what
/// each stage did.
pub async fn run_with(pipeline: &Pipeline, source_arg: &str) -> Result<RunReport> {
    let config = pipeline.config();
    let source = source_from_arg(source_arg)?;
    debug!(?config, "run configuration");

    println!(
        "{} Running {} ({} shots)",
        style("→").cyan().bold(),
        style(source.id()).green(),
        config.shots
    );

    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("Executing...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let report = pipeline.run(&source).await;
    spinner.finish_and_clear();
    let report = report?;

    println!(
        "  Loaded: {} qubits, depth {}",
        report.num_qubits, report.depth
    );
    if let Some(warning) = &report.fallback {
        println!("  {} {}", style("!").yellow().bold(), warning);
    }
    match &report.executor {
        ExecutorKind::Local => println!("  Backend: {}", style("local simulator").yellow()),
        ExecutorKind::Remote { device_id } => {
            println!("  Backend: {} (real device)", style(device_id).yellow());
        }
    }
    println!(
        "  Lowered: {} ops -> {} ops (level {})",
        report.ops.0, report.ops.1, config.optimization_level
    );
    Ok(report)
}
