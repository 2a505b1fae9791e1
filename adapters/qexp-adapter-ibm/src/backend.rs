//! IBM Quantum backend implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use qexp_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, GateSet, HalError,
    HalResult, JobId, JobStatus, ValidationResult,
};
use qexp_ir::CircuitDescription;

use crate::api::{BackendInfo, IbmClient, JobResultResponse, JobStatusResponse, LEGACY_ENDPOINT};
use crate::error::{IbmError, IbmResult};

/// IBM Quantum device as a remote executor.
pub struct IbmBackend {
    client: Arc<IbmClient>,
    capabilities: Capabilities,
    info: BackendInfo,
    /// Declared classical width of each submitted job, for decoding samples.
    widths: Mutex<HashMap<String, usize>>,
}

impl std::fmt::Debug for IbmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IbmBackend")
            .field("device", &self.info.name)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl IbmBackend {
    /// Connect to `device` with credentials from the environment.
    ///
    /// `IBM_API_KEY` with `IBM_SERVICE_CRN` selects the IBM Cloud API. A bare
    /// `IBM_QUANTUM_TOKEN` selects the legacy endpoint. The device must
    /// exist; its lookup doubles as the credential check.
    pub async fn connect(device: impl Into<String>) -> IbmResult<Self> {
        let device = device.into();

        let client = if let Ok(api_key) = std::env::var("IBM_API_KEY") {
            let service_crn =
                std::env::var("IBM_SERVICE_CRN").map_err(|_| IbmError::MissingServiceCrn)?;
            debug!("connecting to IBM Cloud API (IAM key exchange)");
            IbmClient::connect(&api_key, &service_crn).await?
        } else if let Ok(token) = std::env::var("IBM_QUANTUM_TOKEN") {
            debug!("connecting to legacy IBM Quantum endpoint");
            IbmClient::new(LEGACY_ENDPOINT, &token)?
        } else {
            return Err(IbmError::MissingToken);
        };

        Self::with_client(client, device).await
    }

    /// Bind an existing client to `device`.
    pub async fn with_client(client: IbmClient, device: impl Into<String>) -> IbmResult<Self> {
        let device = device.into();
        let info = client.get_backend(&device).await?;
        info!(
            "connected to {} ({} qubits, {} pending jobs)",
            info.name,
            info.num_qubits,
            info.status.pending_jobs.unwrap_or(0)
        );
        Ok(Self::from_info(Arc::new(client), info))
    }

    fn from_info(client: Arc<IbmClient>, info: BackendInfo) -> Self {
        let gate_set = if info.basis_gates.is_empty() {
            GateSet::ibm_heron()
        } else {
            GateSet::from_names(&info.basis_gates)
        };
        let mut capabilities = Capabilities::ibm(&info.name, info.num_qubits, gate_set);
        if let Some(max_shots) = info.max_shots {
            capabilities.max_shots = max_shots;
        }
        Self {
            client,
            capabilities,
            info,
            widths: Mutex::new(HashMap::new()),
        }
    }

    /// Device name.
    pub fn device(&self) -> &str {
        &self.info.name
    }
}

fn map_status(status: &JobStatusResponse) -> JobStatus {
    match status.normalized_status().as_str() {
        "QUEUED" => JobStatus::Queued,
        "COMPLETED" => JobStatus::Completed,
        "FAILED" | "ERROR" => JobStatus::Failed(
            status
                .error_message()
                .unwrap_or_else(|| "unknown error".to_string()),
        ),
        "CANCELLED" => JobStatus::Cancelled,
        // VALIDATING, RUNNING and anything new
        _ => JobStatus::Running,
    }
}

/// Decode Sampler output into counts of `width`-bit strings.
///
/// V2 results carry one hex sample per shot per classical register. V1
/// results carry counts keyed by hex outcome.
fn results_to_counts(results: &JobResultResponse, width: usize) -> Counts {
    let mut counts = Counts::new();
    let Some(result) = results.results.first() else {
        return counts;
    };

    if let Some(data) = &result.data {
        for register in data.values() {
            for sample in &register.samples {
                counts.insert(hex_to_binary(sample, width), 1);
            }
        }
    } else if let Some(raw) = &result.counts {
        for (outcome, &count) in raw {
            counts.insert(hex_to_binary(outcome, width), count);
        }
    }
    counts
}

/// Convert a hex outcome to a binary string padded to `width`.
///
/// With `width == 0` the width falls back to four bits per hex digit. Input
/// that is not hex is assumed to be binary already.
fn hex_to_binary(hex: &str, width: usize) -> String {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    match u64::from_str_radix(hex, 16) {
        Ok(value) => {
            let width = if width > 0 { width } else { hex.len() * 4 };
            format!("{value:0>width$b}")
        }
        Err(_) => hex.to_string(),
    }
}

#[async_trait]
impl Backend for IbmBackend {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        match self.client.get_backend(&self.info.name).await {
            Ok(info) if info.status.operational => Ok(BackendAvailability {
                accepting_jobs: true,
                pending_jobs: info.status.pending_jobs,
                note: info.status.status_msg,
            }),
            Ok(info) => Ok(BackendAvailability::offline(
                info.status
                    .status_msg
                    .unwrap_or_else(|| "backend offline".to_string()),
            )),
            Err(e) => Ok(BackendAvailability::offline(e.to_string())),
        }
    }

    async fn validate(&self, circuit: &CircuitDescription) -> HalResult<ValidationResult> {
        let mut reasons = Vec::new();
        if circuit.num_qubits() > self.capabilities.num_qubits {
            reasons.push(
                IbmError::TooManyQubits {
                    required: circuit.num_qubits(),
                    available: self.capabilities.num_qubits,
                }
                .to_string(),
            );
        }
        if !circuit.has_measurements() {
            reasons.push("circuit has no measurements".to_string());
        }
        if let Some(op) = circuit
            .operations()
            .iter()
            .find(|op| !op.is_barrier() && !self.capabilities.gate_set.contains(op.name()))
        {
            reasons.push(format!("gate '{}' is not native to {}", op.name(), self.info.name));
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit), fields(device = %self.info.name))]
    async fn submit(&self, circuit: &CircuitDescription, shots: u32) -> HalResult<JobId> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        if circuit.num_qubits() > self.capabilities.num_qubits {
            return Err(IbmError::TooManyQubits {
                required: circuit.num_qubits(),
                available: self.capabilities.num_qubits,
            }
            .into());
        }

        let qasm = qexp_qasm::emit(circuit);
        let response = self
            .client
            .submit_sampler_job(&self.info.name, qasm, shots)
            .await
            .map_err(|e| HalError::SubmissionFailed(e.to_string()))?;

        info!("submitted job {} to {}", response.id, self.info.name);
        self.widths
            .lock()
            .await
            .insert(response.id.clone(), circuit.num_clbits() as usize);
        Ok(JobId(response.id))
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let status = self.client.get_job_status(&job_id.0).await?;
        Ok(map_status(&status))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let status = self.client.get_job_status(&job_id.0).await?;
        match map_status(&status) {
            JobStatus::Completed => {}
            JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
            JobStatus::Cancelled => return Err(HalError::JobCancelled),
            other => {
                return Err(HalError::Backend(format!(
                    "Job {job_id} not yet completed ({other})"
                )));
            }
        }

        let results = self.client.get_job_results(&job_id.0).await?;
        let width = self
            .widths
            .lock()
            .await
            .get(&job_id.0)
            .copied()
            .unwrap_or(0);
        let counts = results_to_counts(&results, width);
        let shots = u32::try_from(counts.total_shots()).unwrap_or(u32::MAX);
        Ok(ExecutionResult::new(counts, shots))
    }
}
