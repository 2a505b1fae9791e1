//! Error types for lowering.

use qexp_ir::IrError;
use thiserror::Error;

/// Errors raised while lowering a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A translation pass ran without a target basis.
    #[error("Target basis gates not set")]
    MissingBasisGates,

    /// No decomposition of the operation reaches the target basis.
    #[error("Operation '{name}' cannot be lowered to target '{target}'")]
    UnsupportedOperation {
        /// Operation name as it appears in the circuit.
        name: String,
        /// Name of the target basis.
        target: String,
    },

    /// A pass produced an invalid result.
    #[error("Pass '{pass}' failed: {reason}")]
    PassFailed {
        /// Name of the failing pass.
        pass: String,
        /// What went wrong.
        reason: String,
    },

    /// Rebuilding the circuit failed validation.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),
}

impl CompileError {
    /// Build an [`CompileError::UnsupportedOperation`].
    pub fn unsupported(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// Result type for lowering.
pub type CompileResult<T> = Result<T, CompileError>;
