//! IBM Quantum remote executor.
//!
//! [`IbmBackend`] implements [`qexp_hal::Backend`] against the IBM Quantum
//! REST API. Circuits are sent as OpenQASM 3 through the Sampler primitive
//! and the returned samples are decoded into bitstrings as wide as the
//! circuit's classical register.
//!
//! # Authentication
//!
//! [`IbmBackend::connect`] reads credentials from the environment:
//!
//! - `IBM_API_KEY` and `IBM_SERVICE_CRN` for the IBM Cloud API
//! - `IBM_QUANTUM_TOKEN` for the legacy endpoint
//!
//! # Example
//!
//! ```ignore
//! use qexp_adapter_ibm::IbmBackend;
//! use qexp_hal::Backend;
//!
//! let backend = IbmBackend::connect("ibm_marrakesh").await?;
//! let job_id = backend.submit(&lowered, 1024).await?;
//! let result = backend.wait(&job_id).await?;
//! ```

mod api;
mod backend;
mod error;

pub use api::{BackendInfo, BackendStatus, DEFAULT_ENDPOINT, IbmClient, LEGACY_ENDPOINT};
pub use backend::IbmBackend;
pub use error::{IbmError, IbmResult};
