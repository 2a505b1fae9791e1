//! Abstract operations: a gate name applied to ordered targets.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// Name used for barrier directives.
pub const BARRIER: &str = "barrier";

/// One gate or directive of a circuit.
///
/// An operation is immutable once built: passes that rewrite a circuit
/// produce new operations instead of editing existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    name: String,
    targets: Vec<QubitId>,
    params: Vec<f64>,
}

impl Operation {
    /// Create an operation from its parts.
    pub fn new(
        name: impl Into<String>,
        targets: impl IntoIterator<Item = QubitId>,
        params: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            name: name.into(),
            targets: targets.into_iter().collect(),
            params: params.into_iter().collect(),
        }
    }

    /// Create an operation for a standard gate, using its canonical name.
    pub fn gate(
        gate: StandardGate,
        targets: impl IntoIterator<Item = QubitId>,
        params: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self::new(gate.name(), targets, params)
    }

    /// Create a parameter-free single-qubit gate.
    pub fn single(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit], [])
    }

    /// Create a single-qubit rotation.
    pub fn rotation(gate: StandardGate, angle: f64, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit], [angle])
    }

    /// Create a parameter-free two-qubit gate.
    pub fn two(gate: StandardGate, q0: QubitId, q1: QubitId) -> Self {
        Self::gate(gate, [q0, q1], [])
    }

    /// Create a barrier over the given qubits.
    pub fn barrier(targets: impl IntoIterator<Item = QubitId>) -> Self {
        Self::new(BARRIER, targets, [])
    }

    /// Gate name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered target qubits.
    pub fn targets(&self) -> &[QubitId] {
        &self.targets
    }

    /// Ordered numeric parameters.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// The standard gate this operation names, if any.
    pub fn standard(&self) -> Option<StandardGate> {
        StandardGate::from_name(&self.name)
    }

    /// Whether this operation is a barrier directive.
    pub fn is_barrier(&self) -> bool {
        self.name == BARRIER
    }

    /// Whether this operation is the explicit identity gate.
    pub fn is_identity(&self) -> bool {
        self.standard() == Some(StandardGate::I)
    }

    /// Whether this operation touches the given qubit.
    pub fn acts_on(&self, qubit: QubitId) -> bool {
        self.targets.contains(&qubit)
    }
}
