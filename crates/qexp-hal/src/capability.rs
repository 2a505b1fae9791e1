//! Backend capability introspection.
//!
//! [`Capabilities`] describe what an executor can run: its qubit count,
//! the gates it accepts and its shot limit. The lowering stage derives its
//! target basis from [`GateSet`].

use serde::{Deserialize, Serialize};

use qexp_ir::StandardGate;

/// Hardware capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend or device.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags such as `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 1_000_000,
            is_simulator: true,
            features: vec!["statevector".into()],
        }
    }

    /// Create capabilities for an IBM device with the given gate set.
    pub fn ibm(name: impl Into<String>, num_qubits: u32, gate_set: GateSet) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set,
            max_shots: 100_000,
            is_simulator: false,
            features: vec![],
        }
    }
}

/// Gate set supported by a backend, grouped by arity.
///
/// Gate names follow the OpenQASM 3 naming convention (lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Group gate names by arity. Names that are not standard gates, and
    /// directives such as `measure`, `reset` and `delay`, are skipped.
    pub fn from_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut set = Self {
            single_qubit: vec![],
            two_qubit: vec![],
            three_qubit: vec![],
        };
        for name in names {
            let Some(gate) = StandardGate::from_name(name.as_ref()) else {
                continue;
            };
            let bucket = match gate.num_qubits() {
                1 => &mut set.single_qubit,
                2 => &mut set.two_qubit,
                _ => &mut set.three_qubit,
            };
            let canonical = gate.name().to_string();
            if !bucket.contains(&canonical) {
                bucket.push(canonical);
            }
        }
        set
    }

    /// Every standard gate.
    pub fn universal() -> Self {
        Self::from_names(StandardGate::ALL.iter().map(|g| g.name()))
    }

    /// IBM Heron processors (`ibm_torino`, `ibm_marrakesh`, ...).
    pub fn ibm_heron() -> Self {
        Self::from_names(["rz", "sx", "x", "id", "rx", "cz", "rzz"])
    }

    /// IBM Eagle processors with a CX two-qubit gate.
    pub fn ibm_eagle() -> Self {
        Self::from_names(["rz", "sx", "x", "id", "cx"])
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.names().any(|g| g == gate)
    }

    /// All supported gate names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .map(String::as_str)
    }
}
