//! Local statevector executor.
//!
//! [`SimulatorBackend`] implements [`qexp_hal::Backend`] with a noiseless
//! statevector simulation. It is the local executor that the backend
//! resolver falls back to when no remote device is reachable.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```ignore
//! use qexp_adapter_sim::SimulatorBackend;
//! use qexp_hal::Backend;
//! use qexp_ir::CircuitDescription;
//!
//! let backend = SimulatorBackend::new().with_seed(42);
//! let circuit = CircuitDescription::bell()?;
//! let job_id = backend.submit(&circuit, 1024).await?;
//! let result = backend.wait(&job_id).await?;
//! println!("{:?}", result.counts);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
pub use statevector::Statevector;
