//! Job bookkeeping.
//!
//! ```text
//!   submit ─→ Queued ─→ Running ─→ Completed
//!               │          └────→ Failed(reason)
//!               └─────────────────→ Cancelled
//! ```
//!
//! Once a job is terminal it stays that way. Only a `Completed` job has a
//! result.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Executor-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    /// Carries the executor's failure reason.
    Failed(String),
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Running => f.write_str("running"),
            JobStatus::Completed => f.write_str("completed"),
            JobStatus::Failed(reason) => write!(f, "failed ({reason})"),
            JobStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Record an executor keeps for each job it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub shots: u32,
    /// Executor name.
    pub backend: String,
    pub submitted_at: DateTime<Utc>,
    /// Set on the transition into a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: JobId, shots: u32, backend: impl Into<String>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            shots,
            backend: backend.into(),
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Advance to `next`. Ignored once the job is terminal.
    pub fn transition(&mut self, next: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("t1 drift".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_terminal_job_is_frozen() {
        let mut job = Job::new(JobId::new("sim-1"), 1024, "local_simulator");
        job.transition(JobStatus::Running);
        assert!(job.finished_at.is_none());

        job.transition(JobStatus::Failed("out of memory".into()));
        let finished = job.finished_at;
        assert!(finished.is_some());

        job.transition(JobStatus::Completed);
        assert_eq!(job.status, JobStatus::Failed("out of memory".into()));
        assert_eq!(job.finished_at, finished);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Queued.to_string(), "queued");
        assert_eq!(
            JobStatus::Failed("calibration".into()).to_string(),
            "failed (calibration)"
        );
        assert_eq!(JobId::new("abc").to_string(), "abc");
    }

    #[test]
    fn test_status_serializes_tagged() {
        let json = serde_json::to_string(&JobStatus::Failed("x".into())).unwrap();
        assert_eq!(json, r#"{"state":"failed","reason":"x"}"#);
    }
}
