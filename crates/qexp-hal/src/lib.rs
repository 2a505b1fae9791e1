//! Executor contract for qexp.
//!
//! Every executor, local or remote, implements the async [`Backend`] trait.
//! The execution engine only talks to this trait, so it never needs to know
//! which kind of executor it holds.
//!
//! - [`Capabilities`] and [`GateSet`] describe what a backend runs
//! - [`Job`], [`JobId`] and [`JobStatus`] track submitted work
//! - [`Counts`] and [`ExecutionResult`] carry outcomes
//!
//! | Backend | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local statevector simulator | `qexp-adapter-sim` | None |
//! | IBM Quantum | `qexp-adapter-ibm` | `IBM_API_KEY` + `IBM_SERVICE_CRN`, or `IBM_QUANTUM_TOKEN` |
//!
//! # Example
//!
//! ```ignore
//! use qexp_hal::Backend;
//! use qexp_adapter_sim::SimulatorBackend;
//! use qexp_ir::CircuitDescription;
//!
//! let backend = SimulatorBackend::new();
//! let circuit = CircuitDescription::bell()?;
//! let job_id = backend.submit(&circuit, 1024).await?;
//! let result = backend.wait(&job_id).await?;
//! if let Some((bits, count)) = result.counts.most_frequent() {
//!     println!("{bits}: {count}");
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, DEFAULT_POLL_INTERVAL, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
