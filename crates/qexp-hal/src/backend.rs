//! The executor contract.
//!
//! A run talks to its executor in a fixed order:
//!
//! ```text
//!   validate ─→ submit ─→ status* ─→ result
//!                         └ wait() loops here
//! ```
//!
//! `name` and `capabilities` are plain accessors that every implementation
//! fills in at construction. Everything that may touch the network is async.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use qexp_ir::CircuitDescription;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// How often [`Backend::wait`] asks for the job status.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A circuit executor: the local simulator or a remote device.
///
/// A submitted job starts `Queued`. `result` may only be asked for once
/// `status` says `Completed`. `wait` polls until the job is terminal and
/// never gives up on its own.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Executor name, e.g. `local_simulator` or a device id.
    fn name(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    /// Whether the executor takes jobs right now.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Check `circuit` against what this executor can run.
    async fn validate(&self, circuit: &CircuitDescription) -> HalResult<ValidationResult>;

    /// Queue `circuit` for `shots` repetitions.
    async fn submit(&self, circuit: &CircuitDescription, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Outcome table of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// [`Backend::wait_with_interval`] at [`DEFAULT_POLL_INTERVAL`].
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.wait_with_interval(job_id, DEFAULT_POLL_INTERVAL).await
    }

    /// Block until `job_id` is terminal, then fetch its result.
    async fn wait_with_interval(
        &self,
        job_id: &JobId,
        poll_interval: Duration,
    ) -> HalResult<ExecutionResult> {
        loop {
            let status = self.status(job_id).await?;
            match status {
                JobStatus::Completed => break self.result(job_id).await,
                JobStatus::Failed(reason) => break Err(HalError::JobFailed(reason)),
                JobStatus::Cancelled => break Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    trace!(job = %job_id, %status, "polling");
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }
    }
}

/// Snapshot of an executor's readiness.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    pub accepting_jobs: bool,
    /// Jobs ahead in the device queue, when the executor reports it.
    pub pending_jobs: Option<u32>,
    pub note: Option<String>,
}

impl BackendAvailability {
    /// An executor with no queue.
    pub fn ready() -> Self {
        Self {
            accepting_jobs: true,
            pending_jobs: Some(0),
            note: None,
        }
    }

    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            accepting_jobs: false,
            pending_jobs: None,
            note: Some(reason.into()),
        }
    }
}

/// Outcome of [`Backend::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reasons: Vec<String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// `Invalid` becomes [`HalError::InvalidCircuit`] with the reasons
    /// joined by `; `.
    pub fn into_result(self) -> HalResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { reasons } => {
                Err(HalError::InvalidCircuit(reasons.join("; ")))
            }
        }
    }
}
