//! qexp circuit description
//!
//! This crate holds the data model every stage of an experiment run shares:
//! an ordered list of abstract [`Operation`]s over an indexed register, and a
//! terminal measurement map from qubits to classical bits.
//!
//! # Core Components
//!
//! - **Identifiers**: [`QubitId`] and [`ClbitId`] address the quantum and
//!   classical registers
//! - **Gates**: [`StandardGate`] gives known gate names their arity and
//!   parameter count
//! - **Operations**: [`Operation`] is a gate name, ordered targets and numeric
//!   parameters, immutable once built
//! - **Circuit**: [`CircuitDescription`] validates every operation against the
//!   register as it is appended
//!
//! # Example
//!
//! ```rust
//! use qexp_ir::{CircuitDescription, QubitId};
//!
//! let mut circuit = CircuitDescription::new("bell_state", 2, 2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_ops(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! Operations whose name is not in the standard table are kept as opaque
//! entries. Later stages decide whether a target can run them.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod operation;
pub mod qubit;

pub use circuit::CircuitDescription;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use operation::{BARRIER, Operation};
pub use qubit::{ClbitId, QubitId};
