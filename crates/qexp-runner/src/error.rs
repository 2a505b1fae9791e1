//! Error types for the experiment pipeline.

use std::fmt;
use std::path::PathBuf;

use qexp_compile::CompileError;
use qexp_hal::HalError;
use thiserror::Error;

/// Result type for pipeline stages.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline stage that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Lower,
    Execute,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Lower => "lower",
            Stage::Execute => "execute",
            Stage::Persist => "persist",
        })
    }
}

/// A failure that aborts one experiment run.
///
/// A remote connection failure is not in this list. The resolver recovers
/// from it and reports a [`crate::RemoteFallbackWarning`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The circuit file does not exist.
    #[error("circuit source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The circuit text could not be read or does not parse.
    #[error("malformed circuit '{id}': {cause}")]
    MalformedCircuit { id: String, cause: String },

    /// An operation has no decomposition into the target basis.
    #[error(transparent)]
    UnsupportedOperation(CompileError),

    /// The executor refused or failed the job.
    #[error("execution failed: {0}")]
    ExecutionFailure(String),

    /// The job finished without a usable outcome table.
    #[error("result unavailable: {0}")]
    ResultUnavailable(String),

    /// An output file could not be written.
    #[error("could not write {}: {source}", path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// The stage this error aborted.
    pub fn stage(&self) -> Stage {
        match self {
            Self::SourceNotFound { .. } | Self::MalformedCircuit { .. } => Stage::Load,
            Self::UnsupportedOperation(_) => Stage::Lower,
            Self::ExecutionFailure(_) | Self::ResultUnavailable(_) => Stage::Execute,
            Self::PersistenceFailure { .. } => Stage::Persist,
        }
    }
}

impl From<CompileError> for PipelineError {
    fn from(e: CompileError) -> Self {
        Self::UnsupportedOperation(e)
    }
}

impl From<HalError> for PipelineError {
    fn from(e: HalError) -> Self {
        Self::ExecutionFailure(e.to_string())
    }
}
