//! Execution engine: one submission, one completion.

use std::time::Duration;

use qexp_hal::{Counts, ExecutionResult, HalError};
use qexp_ir::CircuitDescription;
use tracing::{debug, info, instrument};

use crate::error::{PipelineError, PipelineResult};
use crate::resolver::ExecutorHandle;

/// Run `circuit` for `shots` on `handle` and return its verified outcome
/// table.
///
/// The engine blocks until the job is terminal and imposes no timeout of its
/// own. Rejection before or at submission, or losing the executor while the
/// job runs, is [`PipelineError::ExecutionFailure`]; a job that ends without
/// a consistent table is [`PipelineError::ResultUnavailable`].
#[instrument(skip(handle, circuit), fields(circuit = %circuit.name(), executor = %handle.kind()))]
pub async fn execute(
    handle: &ExecutorHandle,
    circuit: &CircuitDescription,
    shots: u32,
    poll_interval: Duration,
) -> PipelineResult<ExecutionResult> {
    if shots == 0 {
        return Err(PipelineError::ExecutionFailure(
            "shots must be positive".into(),
        ));
    }
    let backend = handle.backend();
    backend.validate(circuit).await?.into_result()?;

    let job_id = backend.submit(circuit, shots).await?;
    info!("job {job_id} submitted to {}", backend.name());

    let result = backend
        .wait_with_interval(&job_id, poll_interval)
        .await
        .map_err(completion_error)?;
    verify(&result.counts, shots, circuit.num_clbits() as usize)?;
    debug!("job {job_id} returned {} distinct outcomes", result.counts.len());
    Ok(result)
}

fn completion_error(e: HalError) -> PipelineError {
    match e {
        HalError::BackendUnavailable(_) | HalError::AuthenticationFailed(_) => {
            PipelineError::ExecutionFailure(e.to_string())
        }
        _ => PipelineError::ResultUnavailable(e.to_string()),
    }
}

/// Counts must add up to `shots` and every key must be `width` bits.
pub fn verify(counts: &Counts, shots: u32, width: usize) -> PipelineResult<()> {
    let total = counts.total_shots();
    if total != u64::from(shots) {
        return Err(PipelineError::ResultUnavailable(format!(
            "outcome counts sum to {total}, expected {shots}"
        )));
    }
    if let Some((bits, _)) = counts
        .iter()
        .find(|(bits, _)| bits.len() != width || bits.bytes().any(|b| b != b'0' && b != b'1'))
    {
        return Err(PipelineError::ResultUnavailable(format!(
            "outcome '{bits}' is not a {width}-bit string"
        )));
    }
    Ok(())
}
