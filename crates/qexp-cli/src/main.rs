//! qexp command-line interface.
//!
//! ```text
//! qexp run circuits/srfm_exp_a.qasm --shots 1024
//! qexp run circuits/srfm_exp_a.qasm --remote --device ibm_marrakesh
//! qexp lower circuits/srfm_exp_c.qasm --target eagle -O 2
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use qexp_cli::cli::{Cli, Commands};
use qexp_cli::commands::{lower, run};
use qexp_runner::PipelineError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Lower(args) => lower::execute(args),
    };

    if let Err(e) = result {
        match e.downcast_ref::<PipelineError>() {
            Some(err) => eprintln!("{} {}: {}", style("Error:").red().bold(), err.stage(), err),
            None => eprintln!("{} {:#}", style("Error:").red().bold(), e),
        }
        std::process::exit(1);
    }
}
