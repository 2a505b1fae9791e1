//! Per-run experiment configuration.
//!
//! Values come from defaults, then an optional YAML file, then command-line
//! flags (which also read `QEXP_*` environment variables).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Highest optimization level the lowering stage knows.
pub const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// Errors loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Options of one experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Try the remote device before the local simulator.
    pub prefer_remote: bool,

    /// Remote device identifier.
    pub device_id: String,

    /// Number of shots.
    pub shots: u32,

    /// Lowering optimization level (0-3).
    pub optimization_level: u8,

    /// Directory the result files go to.
    pub output_dir: PathBuf,

    /// Seed for the local simulator's sampling.
    pub seed: Option<u64>,

    /// Also write the text histogram.
    pub histogram: bool,

    /// How often a remote job is polled, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            prefer_remote: false,
            device_id: "ibm_marrakesh".to_string(),
            shots: 1024,
            optimization_level: 0,
            output_dir: PathBuf::from("."),
            seed: None,
            histogram: true,
            poll_interval_ms: 2000,
        }
    }
}

impl ExperimentConfig {
    /// Load a configuration from a YAML file. Missing keys keep their
    /// defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    /// Check the configuration before a run.
    ///
    /// A zero shot count is rejected. An optimization level above
    /// [`MAX_OPTIMIZATION_LEVEL`] is clamped.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::Invalid("shots must be positive".into()));
        }
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::Invalid("device_id must not be empty".into()));
        }
        if self.optimization_level > MAX_OPTIMIZATION_LEVEL {
            warn!(
                "optimization level {} clamped to {}",
                self.optimization_level, MAX_OPTIMIZATION_LEVEL
            );
            self.optimization_level = MAX_OPTIMIZATION_LEVEL;
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
