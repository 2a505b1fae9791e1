//! The local executor.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use qexp_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult, Job,
    JobId, JobStatus, ValidationResult,
};
use qexp_ir::{CircuitDescription, ClbitId, QubitId};

use crate::statevector::Statevector;

/// Default qubit limit of the simulator.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// A job and, once it finished, its outcome.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local noiseless statevector simulator.
///
/// The unitary part of a circuit is simulated once. Shots are then drawn
/// from the marginal distribution of the measured qubits, and each draw is
/// written into a classical bitstring as wide as the circuit's classical
/// register.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    /// Submitted jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Seed for reproducible sampling; every job restarts from it.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a simulator with [`DEFAULT_MAX_QUBITS`] and entropy seeding.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with a custom qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            seed: None,
        }
    }

    /// Sample from a fixed seed so repeated runs give identical counts.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn width_error(&self, circuit: &CircuitDescription) -> Option<String> {
        let limit = self.capabilities.num_qubits;
        (circuit.num_qubits() > limit)
            .then(|| format!("{} qubits requested, limit is {limit}", circuit.num_qubits()))
    }

    fn check(&self, circuit: &CircuitDescription) -> Vec<String> {
        let mut reasons = Vec::new();
        if !circuit.has_measurements() {
            reasons.push("circuit has no measurements".to_string());
        }
        if let Some(op) = circuit
            .operations()
            .iter()
            .find(|op| !op.is_barrier() && !self.capabilities.gate_set.contains(op.name()))
        {
            reasons.push(format!("unsupported gate: {}", op.name()));
        }
        reasons
    }

    fn store(&self, job_id: &JobId, job: SimJob) {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.0.clone(), job);
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulate `circuit` once and draw `shots` readouts.
#[instrument(skip(circuit), fields(circuit = %circuit.name()))]
fn run_simulation(
    circuit: &CircuitDescription,
    shots: u32,
    seed: Option<u64>,
) -> HalResult<ExecutionResult> {
    let start = Instant::now();
    debug!(qubits = circuit.num_qubits(), shots, "simulating");

    let mut sv = Statevector::new(circuit.num_qubits() as usize);
    for op in circuit.operations() {
        sv.apply(op)?;
    }

    let measured: Vec<(QubitId, ClbitId)> = circuit
        .measured_bits()
        .iter()
        .map(|(q, c)| (*q, *c))
        .collect();
    let mask = measured.iter().fold(0usize, |acc, (q, _)| acc | (1 << q.index()));

    let mut outcomes: Vec<(usize, f64)> = sv.marginal(mask).into_iter().collect();
    outcomes.sort_unstable_by_key(|(key, _)| *key);
    let dist = WeightedIndex::new(outcomes.iter().map(|(_, p)| *p))
        .map_err(|e| HalError::Backend(format!("invalid outcome distribution: {e}")))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut tally = vec![0u64; outcomes.len()];
    for _ in 0..shots {
        tally[dist.sample(&mut rng)] += 1;
    }

    let width = circuit.num_clbits() as usize;
    let mut counts = Counts::new();
    for ((key, _), count) in outcomes.iter().zip(tally) {
        if count > 0 {
            counts.insert(readout(*key, &measured, width), count);
        }
    }

    let ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(outcomes = counts.len(), ms, "sampled");
    Ok(ExecutionResult::new(counts, shots).with_execution_time(ms))
}

/// Classical bitstring for a basis index. Classical bit 0 is the rightmost
/// character; bits no qubit was measured into read `0`.
fn readout(index: usize, measured: &[(QubitId, ClbitId)], width: usize) -> String {
    let mut bits = vec![b'0'; width];
    for (q, c) in measured {
        if index & (1 << q.index()) != 0 {
            if let Some(slot) = width.checked_sub(c.index() + 1).and_then(|i| bits.get_mut(i)) {
                *slot = b'1';
            }
        }
    }
    bits.into_iter().map(char::from).collect()
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::ready())
    }

    async fn validate(&self, circuit: &CircuitDescription) -> HalResult<ValidationResult> {
        let reasons: Vec<String> = self
            .width_error(circuit)
            .into_iter()
            .chain(self.check(circuit))
            .collect();
        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &CircuitDescription, shots: u32) -> HalResult<JobId> {
        if let Some(reason) = self.width_error(circuit) {
            return Err(HalError::CircuitTooLarge(reason));
        }
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} exceeds the limit of {}",
                self.capabilities.max_shots
            )));
        }
        let reasons = self.check(circuit);
        if !reasons.is_empty() {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), shots, self.name());
        job.transition(JobStatus::Running);
        self.store(&job_id, SimJob { job: job.clone(), result: None });
        debug!(job = %job_id, "accepted");

        let owned = circuit.clone();
        let seed = self.seed;
        let outcome = tokio::task::spawn_blocking(move || run_simulation(&owned, shots, seed))
            .await
            .map_err(|e| HalError::Backend(format!("simulation task failed: {e}")))?;

        let sim_job = match outcome {
            Ok(result) => {
                job.transition(JobStatus::Completed);
                SimJob {
                    job,
                    result: Some(result),
                }
            }
            Err(e) => {
                job.transition(JobStatus::Failed(e.to_string()));
                SimJob { job, result: None }
            }
        };
        self.store(&job_id, sim_job);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (status, _) => Err(HalError::Backend(format!(
                "{job_id} is {status}, no result yet"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_orders_bits_right_to_left() {
        let measured = [(QubitId(0), ClbitId(0)), (QubitId(1), ClbitId(2))];
        // qubit 0 = 1, qubit 1 = 0
        assert_eq!(readout(0b01, &measured, 3), "001");
        // qubit 1 = 1 lands in clbit 2, the leftmost character
        assert_eq!(readout(0b10, &measured, 3), "100");
        // clbit 1 is never written
        assert_eq!(readout(0b11, &measured, 3), "101");
    }

    #[test]
    fn test_readout_permuted_measurement() {
        let measured = [(QubitId(2), ClbitId(0)), (QubitId(0), ClbitId(1))];
        assert_eq!(readout(0b100, &measured, 2), "01");
        assert_eq!(readout(0b001, &measured, 2), "10");
    }

    #[tokio::test]
    async fn test_reports_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
        assert!(backend.availability().await.unwrap().accepting_jobs);
    }

    #[tokio::test]
    async fn test_bell_outcomes_are_correlated() {
        let backend = SimulatorBackend::new();

        let circuit = CircuitDescription::bell().unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();

        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);

        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_ghz_outcomes() {
        let backend = SimulatorBackend::new();

        let circuit = CircuitDescription::ghz(3).unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        let counts = &result.counts;
        assert_eq!(counts.get("000") + counts.get("111"), 1000);
    }

    #[tokio::test]
    async fn test_rejects_wide_circuit() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let mut circuit = CircuitDescription::new("test", 10, 10).unwrap();
        circuit.measure_all().unwrap();
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
        assert!(!backend.validate(&circuit).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_simulator_requires_measurement() {
        let backend = SimulatorBackend::new();
        let mut circuit = CircuitDescription::new("test", 1, 1).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let result = backend.submit(&circuit, 100).await;
        assert!(matches!(result, Err(HalError::InvalidCircuit(_))));
    }

    #[tokio::test]
    async fn test_simulator_rejects_zero_shots() {
        let backend = SimulatorBackend::new();
        let circuit = CircuitDescription::bell().unwrap();
        let result = backend.submit(&circuit, 0).await;
        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let err = backend.status(&JobId::new("nope")).await.unwrap_err();
        assert!(matches!(err, HalError::JobNotFound(_)));
    }

    #[tokio::test]
    async fn test_seeded_runs_repeat() {
        let mut circuit = CircuitDescription::new("superposition", 3, 3).unwrap();
        for q in 0..3 {
            circuit.h(QubitId(q)).unwrap();
        }
        circuit.measure_all().unwrap();

        let backend = SimulatorBackend::new().with_seed(7);
        let first = backend.submit(&circuit, 500).await.unwrap();
        let second = backend.submit(&circuit, 500).await.unwrap();
        assert_eq!(
            backend.result(&first).await.unwrap().counts,
            backend.result(&second).await.unwrap().counts
        );
    }
}
