//! Executor errors.

use thiserror::Error;

/// Failures reported by an executor.
///
/// Variants fall in three groups: the executor could not be reached
/// (`BackendUnavailable`, `AuthenticationFailed`), it refused the request
/// (`InvalidCircuit`, `CircuitTooLarge`, `InvalidShots`, `Unsupported`,
/// `SubmissionFailed`), or a submitted job went wrong (`JobFailed`,
/// `JobCancelled`, `JobNotFound`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    #[error("executor unavailable: {0}")]
    BackendUnavailable(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("submission rejected: {0}")]
    SubmissionFailed(String),

    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job was cancelled")]
    JobCancelled,

    #[error("no such job: {0}")]
    JobNotFound(String),

    #[error("circuit rejected: {0}")]
    InvalidCircuit(String),

    /// More qubits than the executor offers.
    #[error("circuit too large: {0}")]
    CircuitTooLarge(String),

    #[error("invalid shot count: {0}")]
    InvalidShots(String),

    #[error("not supported: {0}")]
    Unsupported(String),

    /// Anything else the executor reported.
    #[error("executor error: {0}")]
    Backend(String),
}

/// Result alias for executor operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            HalError::JobNotFound("sim-7".into()).to_string(),
            "no such job: sim-7"
        );
        assert_eq!(HalError::JobCancelled.to_string(), "job was cancelled");
    }
}
