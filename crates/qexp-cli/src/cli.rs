//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use qexp_compile::BasisGates;
use qexp_runner::ExperimentConfig;

/// qexp - run small quantum experiments locally or on IBM Quantum
#[derive(Debug, Parser)]
#[command(name = "qexp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run an experiment and save its outcome table
    Run(RunArgs),

    /// Lower a circuit for a target and print it as OpenQASM 3
    Lower(LowerArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Circuit file (OpenQASM 2 or 3), or `-` to read stdin
    pub source: String,

    /// Try the remote device first; falls back to the local simulator
    #[arg(long, env = "QEXP_REMOTE")]
    pub remote: bool,

    /// Remote device identifier
    #[arg(short, long, env = "QEXP_DEVICE")]
    pub device: Option<String>,

    /// Number of shots
    #[arg(short, long, env = "QEXP_SHOTS")]
    pub shots: Option<u32>,

    /// Optimization level (0-3)
    #[arg(short = 'O', long, env = "QEXP_OPTIMIZATION_LEVEL")]
    pub optimization_level: Option<u8>,

    /// Directory for result files
    #[arg(short, long, env = "QEXP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Seed for the local simulator
    #[arg(long, env = "QEXP_SEED")]
    pub seed: Option<u64>,

    /// Skip the text histogram file
    #[arg(long, env = "QEXP_NO_HISTOGRAM")]
    pub no_histogram: bool,

    /// YAML configuration file
    #[arg(short, long, env = "QEXP_CONFIG")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Configuration for this run: file values (or defaults) overridden by
    /// the flags that were given.
    pub fn to_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ExperimentConfig::default(),
        };

        if self.remote {
            config.prefer_remote = true;
        }
        if let Some(device) = &self.device {
            config.device_id.clone_from(device);
        }
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if let Some(level) = self.optimization_level {
            config.optimization_level = level;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_histogram {
            config.histogram = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Lowering targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Local simulator (every standard gate)
    Local,
    /// IBM Heron devices
    Heron,
    /// IBM Eagle devices
    Eagle,
}

impl Target {
    pub fn basis(self) -> BasisGates {
        match self {
            Target::Local => BasisGates::universal(),
            Target::Heron => BasisGates::heron(),
            Target::Eagle => BasisGates::eagle(),
        }
    }
}

#[derive(Debug, Args)]
pub struct LowerArgs {
    /// Circuit file (OpenQASM 2 or 3), or `-` to read stdin
    pub source: String,

    /// Target basis
    #[arg(short, long, value_enum, default_value = "heron")]
    pub target: Target,

    /// Optimization level (0-3)
    #[arg(short = 'O', long, default_value = "0")]
    pub optimization_level: u8,

    /// Write the lowered circuit here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
