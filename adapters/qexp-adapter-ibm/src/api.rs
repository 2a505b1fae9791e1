//! IBM Quantum REST client.
//!
//! Covers the calls one experiment run needs: authenticate, look up the
//! target device, submit a Sampler job, poll it, and fetch its samples.
//!
//! Two flavours of the service are spoken:
//! - the IBM Cloud API (`quantum.cloud.ibm.com/api`), reached through an
//!   IAM exchange of an API key and a service CRN;
//! - the legacy endpoint (`api.quantum-computing.ibm.com`) with a direct
//!   bearer token.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{IbmError, IbmResult};

/// IBM Cloud Quantum API.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Pre-Cloud IBM Quantum API, still reachable with a bearer token.
pub const LEGACY_ENDPOINT: &str = "https://api.quantum-computing.ibm.com";

const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Value of the `IBM-API-Version` header on Cloud API requests.
const IBM_API_VERSION: &str = "2026-02-01";

/// The API front end rejects reqwest's default agent.
const USER_AGENT: &str = concat!("qexp/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Authenticated client for one IBM Quantum service.
pub struct IbmClient {
    client: Client,
    endpoint: String,
    cloud_api: bool,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Default headers hold the bearer token; keep them out of logs.
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("cloud_api", &self.cloud_api)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

fn json_headers(bearer: &str) -> IbmResult<HeaderMap> {
    let auth = HeaderValue::from_str(&format!("Bearer {bearer}"))
        .map_err(|_| IbmError::InvalidToken)?;
    let json = HeaderValue::from_static("application/json");
    Ok(HeaderMap::from_iter([
        (header::AUTHORIZATION, auth),
        (header::CONTENT_TYPE, json.clone()),
        (header::ACCEPT, json),
    ]))
}

fn http_client(headers: HeaderMap) -> IbmResult<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Trade an IBM Cloud API key for a short-lived IAM bearer token.
async fn exchange_api_key(api_key: &str) -> IbmResult<String> {
    let response = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?
        .post(IAM_TOKEN_URL)
        .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", api_key)])
        .send()
        .await
        .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IbmError::IamTokenExchange(format!("{status}: {body}")));
    }

    let token: IamTokenResponse = response
        .json()
        .await
        .map_err(|e| IbmError::IamTokenExchange(format!("unreadable IAM response: {e}")))?;
    Ok(token.access_token)
}

/// Build an [`IbmError::ApiError`] from a failed response, preferring the
/// service's own error message over the raw body.
async fn api_error(response: Response, context: &str) -> IbmError {
    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(parsed) if !parsed.message.is_empty() => (parsed.code, parsed.message),
        _ => (None, body),
    };
    IbmError::ApiError {
        code,
        message: format!("{context}: {message}"),
    }
}

impl IbmClient {
    /// Legacy mode: a bearer token used as-is. The Cloud API goes through
    /// [`IbmClient::connect`].
    pub fn new(endpoint: impl Into<String>, token: &str) -> IbmResult<Self> {
        Ok(Self {
            client: http_client(json_headers(token)?)?,
            endpoint: endpoint.into(),
            cloud_api: false,
        })
    }

    /// Cloud API mode. Every request carries the IAM token, the
    /// `Service-CRN` of the Quantum instance and the API version.
    pub async fn connect(api_key: &str, service_crn: &str) -> IbmResult<Self> {
        let token = exchange_api_key(api_key).await?;

        let mut headers = json_headers(&token)?;
        let crn = HeaderValue::from_str(service_crn).map_err(|_| IbmError::MissingServiceCrn)?;
        headers.insert(HeaderName::from_static("service-crn"), crn);
        headers.insert(
            HeaderName::from_static("ibm-api-version"),
            HeaderValue::from_static(IBM_API_VERSION),
        );

        Ok(Self {
            client: http_client(headers)?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cloud_api: true,
        })
    }

    pub fn is_cloud_api(&self) -> bool {
        self.cloud_api
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.endpoint)
    }

    /// GET `path` and decode the body. A 404 becomes `missing()`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
        missing: impl FnOnce() -> IbmError,
    ) -> IbmResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(missing()),
            s if s.is_success() => Ok(response.json().await?),
            _ => Err(api_error(response, context).await),
        }
    }

    /// Look up one device. An unknown name is
    /// [`IbmError::BackendUnavailable`].
    pub async fn get_backend(&self, name: &str) -> IbmResult<BackendInfo> {
        let unknown = || IbmError::BackendUnavailable(name.to_string());
        if !self.cloud_api {
            return self
                .get_json(&format!("backends/{name}"), "device lookup", unknown)
                .await;
        }

        // The Cloud API splits a device into configuration and status.
        let config: BackendConfigResponse = self
            .get_json(
                &format!("backends/{name}/configuration"),
                "device configuration",
                unknown,
            )
            .await?;
        let status = match self
            .get_json::<BackendStatusResponse>(
                &format!("backends/{name}/status"),
                "device status",
                unknown,
            )
            .await
        {
            Ok(s) => BackendStatus {
                operational: s.state,
                status_msg: Some(s.status),
                pending_jobs: Some(u32::try_from(s.length_queue).unwrap_or(u32::MAX)),
            },
            // The configuration answered, so the device exists.
            Err(_) => BackendStatus {
                operational: true,
                status_msg: None,
                pending_jobs: None,
            },
        };

        Ok(BackendInfo {
            name: config.backend_name,
            num_qubits: config.n_qubits,
            status,
            basis_gates: config.basis_gates,
            simulator: config.simulator.unwrap_or(false),
            max_shots: config.max_shots,
        })
    }

    /// Queue one circuit on the Sampler primitive.
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        qasm: String,
        shots: u32,
    ) -> IbmResult<SubmitResponse> {
        let body = sampler_request(backend, qasm, shots, self.cloud_api);
        let response = self.client.post(self.url("jobs")).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response, "job submission").await);
        }
        Ok(response.json().await?)
    }

    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        self.get_json(&format!("jobs/{job_id}"), "job status", || {
            IbmError::JobNotFound(job_id.to_string())
        })
        .await
    }

    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        self.get_json(&format!("jobs/{job_id}/results"), "job results", || {
            IbmError::JobNotFound(job_id.to_string())
        })
        .await
    }
}

/// Request body for a Sampler job.
///
/// The Cloud API takes V2 PUBs, each `[circuit, parameter values, shots]`.
/// The circuit is already in the device basis, so the service only routes it
/// (optimization level 1). The legacy endpoint takes the V1 layout.
fn sampler_request(backend: &str, qasm: String, shots: u32, cloud_api: bool) -> serde_json::Value {
    let params = if cloud_api {
        serde_json::json!({
            "version": 2,
            "pubs": [[qasm, {}, shots]],
            "options": { "optimization_level": 1 }
        })
    } else {
        serde_json::json!({
            "circuits": [qasm],
            "shots": shots,
            "skip_transpilation": false
        })
    };
    serde_json::json!({
        "program_id": "sampler",
        "backend": backend,
        "params": params
    })
}

// Response types

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

/// `/backends/{name}/configuration` on the Cloud API.
#[derive(Debug, Deserialize)]
struct BackendConfigResponse {
    backend_name: String,
    n_qubits: u32,
    #[serde(default)]
    basis_gates: Vec<String>,
    #[serde(default)]
    simulator: Option<bool>,
    #[serde(default)]
    max_shots: Option<u32>,
}

/// `/backends/{name}/status` on the Cloud API.
#[derive(Debug, Deserialize)]
struct BackendStatusResponse {
    state: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    length_queue: u64,
}

/// Device information.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub num_qubits: u32,
    pub status: BackendStatus,
    /// Native gates reported by the device.
    #[serde(default)]
    pub basis_gates: Vec<String>,
    #[serde(default)]
    pub simulator: bool,
    #[serde(default)]
    pub max_shots: Option<u32>,
}

/// Device status.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendStatus {
    pub operational: bool,
    #[serde(default)]
    pub status_msg: Option<String>,
    #[serde(default)]
    pub pending_jobs: Option<u32>,
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub id: String,
    /// Mixed case on the Cloud API ("Completed"), upper case on legacy.
    pub status: String,
    /// Failure details on the legacy API.
    #[serde(default)]
    pub error: Option<JobError>,
    /// Failure details on the Cloud API.
    #[serde(default)]
    pub state: Option<JobState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    #[serde(default)]
    pub reason: Option<String>,
}

impl JobStatusResponse {
    /// Status in upper case.
    pub fn normalized_status(&self) -> String {
        self.status.to_uppercase()
    }

    /// Failure reason, preferring the Cloud API field.
    pub fn error_message(&self) -> Option<String> {
        self.state
            .as_ref()
            .and_then(|s| s.reason.clone())
            .or_else(|| self.error.as_ref().map(|e| e.message.clone()))
    }
}

/// Job result response.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    pub results: Vec<SamplerResult>,
}

/// Sampler output for one circuit.
#[derive(Debug, Deserialize)]
pub struct SamplerResult {
    /// V2: classical register name to per-shot samples.
    #[serde(default)]
    pub data: Option<HashMap<String, ClassicalRegisterData>>,
    /// V1: pre-aggregated counts keyed by hex outcome.
    #[serde(default)]
    pub counts: Option<HashMap<String, u64>>,
}

/// One classical register of a V2 result.
#[derive(Debug, Deserialize)]
pub struct ClassicalRegisterData {
    /// One hex string per shot, e.g. `"0x3"`.
    pub samples: Vec<String>,
}
