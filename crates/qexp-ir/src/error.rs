//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while building a circuit description.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A circuit must act on at least one qubit.
    #[error("Circuit '{0}' has an empty quantum register")]
    EmptyRegister(String),

    /// Qubit index is outside the declared register.
    #[error("Qubit {qubit} is outside the register of size {size}{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The offending qubit.
        qubit: QubitId,
        /// Declared register size.
        size: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit index is outside the declared classical register.
    #[error("Classical bit {clbit} is outside the classical register of size {size}")]
    ClbitNotFound {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Declared classical register size.
        size: u32,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Gate requires a different number of parameters.
    #[error("Gate '{gate_name}' requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of parameters.
        expected: u32,
        /// Actual number of parameters provided.
        got: u32,
    },

    /// Non-finite parameter value.
    #[error("Gate '{gate_name}' has a non-finite parameter")]
    NonFiniteParameter {
        /// Name of the gate.
        gate_name: String,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Operation applied to a qubit whose measurement already happened.
    #[error("Qubit {qubit} is used after its measurement{}", format_gate_context(.gate_name))]
    OperationAfterMeasurement {
        /// The measured qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Qubit measured twice.
    #[error("Qubit {0} is measured more than once")]
    QubitAlreadyMeasured(QubitId),

    /// Two qubits measured into the same classical bit.
    #[error("Classical bit {clbit} already receives the measurement of {qubit}")]
    ClbitAlreadyAssigned {
        /// The contested classical bit.
        clbit: ClbitId,
        /// The qubit that already writes to it.
        qubit: QubitId,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
