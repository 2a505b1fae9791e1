//! Circuit description: register sizes, ordered operations, measurement map.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::operation::Operation;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit as an ordered list of operations over an indexed
/// register, followed by terminal measurements into classical bits.
///
/// Every target index is below `num_qubits`, and every measured qubit
/// writes to its own classical bit. Both hold after every successful
/// builder call, and deserialization replays the builder to keep them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct CircuitDescription {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    operations: Vec<Operation>,
    measured_bits: BTreeMap<QubitId, ClbitId>,
}

/// Serialized shape of [`CircuitDescription`], before any checks.
#[derive(Deserialize)]
struct RawCircuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    operations: Vec<Operation>,
    measured_bits: BTreeMap<QubitId, ClbitId>,
}

impl TryFrom<RawCircuit> for CircuitDescription {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        let mut circuit = Self::new(raw.name, raw.num_qubits, raw.num_clbits)?;
        for op in raw.operations {
            circuit.push(op)?;
        }
        for (qubit, clbit) in raw.measured_bits {
            circuit.measure(qubit, clbit)?;
        }
        Ok(circuit)
    }
}

impl CircuitDescription {
    /// Create an empty circuit with the given register sizes.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> IrResult<Self> {
        let name = name.into();
        if num_qubits == 0 {
            return Err(IrError::EmptyRegister(name));
        }
        Ok(Self {
            name,
            num_qubits,
            num_clbits,
            operations: Vec::new(),
            measured_bits: BTreeMap::new(),
        })
    }

    /// Append an operation after checking it against the register.
    pub fn push(&mut self, op: Operation) -> IrResult<&mut Self> {
        self.check_operation(&op)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Record a terminal measurement of `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.check_qubit(qubit, Some("measure"))?;
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitNotFound {
                clbit,
                size: self.num_clbits,
            });
        }
        if self.measured_bits.contains_key(&qubit) {
            return Err(IrError::QubitAlreadyMeasured(qubit));
        }
        if let Some((&owner, _)) = self.measured_bits.iter().find(|(_, c)| **c == clbit) {
            return Err(IrError::ClbitAlreadyAssigned {
                clbit,
                qubit: owner,
            });
        }
        self.measured_bits.insert(qubit, clbit);
        Ok(self)
    }

    /// Measure qubit `i` into classical bit `i` for every qubit.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        for i in 0..self.num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Build a circuit with the same registers and measurements but a new
    /// operation list. Every operation is checked again.
    pub fn with_operations(&self, operations: Vec<Operation>) -> IrResult<Self> {
        let mut rebuilt = Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            operations: Vec::with_capacity(operations.len()),
            measured_bits: BTreeMap::new(),
        };
        for op in operations {
            rebuilt.push(op)?;
        }
        rebuilt.measured_bits = self.measured_bits.clone();
        Ok(rebuilt)
    }

    /// Rename the circuit.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // =========================================================================
    // Gate helpers
    // =========================================================================

    /// Apply the identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::single(StandardGate::I, qubit))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::single(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::single(StandardGate::X, qubit))
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::single(StandardGate::SX, qubit))
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::rotation(StandardGate::Rx, theta, qubit))
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::rotation(StandardGate::Rz, theta, qubit))
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::two(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::two(StandardGate::CZ, control, target))
    }

    /// Apply a barrier across all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        self.push(Operation::barrier((0..self.num_qubits).map(QubitId)))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Circuit name (the source identifier).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Declared classical register size; readout bitstrings have this width.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Operations in program order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations, barriers included.
    pub fn num_ops(&self) -> usize {
        self.operations.len()
    }

    /// Terminal measurement map, ordered by qubit.
    pub fn measured_bits(&self) -> &BTreeMap<QubitId, ClbitId> {
        &self.measured_bits
    }

    /// Whether any qubit is measured.
    pub fn has_measurements(&self) -> bool {
        !self.measured_bits.is_empty()
    }

    /// Operation counts by name.
    pub fn count_ops(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.name()).or_insert(0) += 1;
        }
        if !self.measured_bits.is_empty() {
            counts.insert("measure", self.measured_bits.len());
        }
        counts
    }

    /// Length of the longest chain of dependent gates and measurements.
    ///
    /// Barriers are directives and add no depth.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits as usize];
        let mut clbit_level = vec![0usize; self.num_clbits as usize];

        for op in self.operations.iter().filter(|op| !op.is_barrier()) {
            let level = op
                .targets()
                .iter()
                .map(|q| qubit_level[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in op.targets() {
                qubit_level[q.index()] = level;
            }
        }

        for (q, c) in &self.measured_bits {
            let level = qubit_level[q.index()].max(clbit_level[c.index()]) + 1;
            qubit_level[q.index()] = level;
            clbit_level[c.index()] = level;
        }

        qubit_level
            .into_iter()
            .chain(clbit_level)
            .max()
            .unwrap_or(0)
    }

    fn check_qubit(&self, qubit: QubitId, gate_name: Option<&str>) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitNotFound {
                qubit,
                size: self.num_qubits,
                gate_name: gate_name.map(str::to_string),
            });
        }
        Ok(())
    }

    fn check_operation(&self, op: &Operation) -> IrResult<()> {
        let mut seen = HashSet::with_capacity(op.targets().len());
        for &qubit in op.targets() {
            self.check_qubit(qubit, Some(op.name()))?;
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(op.name().to_string()),
                });
            }
            if self.measured_bits.contains_key(&qubit) {
                return Err(IrError::OperationAfterMeasurement {
                    qubit,
                    gate_name: Some(op.name().to_string()),
                });
            }
        }

        if let Some(gate) = op.standard() {
            let got = op.targets().len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: op.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
            let got = op.params().len() as u32;
            if got != gate.num_params() {
                return Err(IrError::ParameterCountMismatch {
                    gate_name: op.name().to_string(),
                    expected: gate.num_params(),
                    got,
                });
            }
        }

        if op.params().iter().any(|p| !p.is_finite()) {
            return Err(IrError::NonFiniteParameter {
                gate_name: op.name().to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Common circuits
    // =========================================================================

    /// Bell state preparation with both qubits measured.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new("bell", 2, 2)?;
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
        Ok(circuit)
    }

    /// GHZ state preparation on `n` qubits with every qubit measured.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new(format!("ghz_{n}"), n, n)?;
        circuit.h(QubitId(0))?;
        for i in 0..n.saturating_sub(1) {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_circuit() {
        let circuit = CircuitDescription::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(circuit.measured_bits().len(), 2);
        // h, cx, measure
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_empty_register_rejected() {
        assert!(matches!(
            CircuitDescription::new("empty", 0, 0),
            Err(IrError::EmptyRegister(_))
        ));
    }

    #[test]
    fn test_out_of_range_target() {
        let mut circuit = CircuitDescription::new("c", 2, 2).unwrap();
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { size: 2, .. }));
        assert!(err.to_string().contains("gate: h"));
    }

    #[test]
    fn test_arity_and_param_checks() {
        let mut circuit = CircuitDescription::new("c", 2, 0).unwrap();
        let err = circuit
            .push(Operation::new("cx", [QubitId(0)], []))
            .unwrap_err();
        assert!(matches!(err, IrError::QubitCountMismatch { expected: 2, got: 1, .. }));

        let err = circuit
            .push(Operation::new("rz", [QubitId(0)], []))
            .unwrap_err();
        assert!(matches!(err, IrError::ParameterCountMismatch { expected: 1, got: 0, .. }));

        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_opaque_operations_are_accepted() {
        let mut circuit = CircuitDescription::new("c", 3, 0).unwrap();
        circuit
            .push(Operation::new("mystery", [QubitId(0), QubitId(2)], [1.0]))
            .unwrap();
        assert_eq!(circuit.operations()[0].name(), "mystery");
    }

    #[test]
    fn test_measurement_map_is_unique() {
        let mut circuit = CircuitDescription::new("c", 3, 3).unwrap();
        circuit.measure(QubitId(2), ClbitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(1)).unwrap();
        assert!(matches!(
            circuit.measure(QubitId(1), ClbitId(0)),
            Err(IrError::ClbitAlreadyAssigned { qubit: QubitId(2), .. })
        ));
        assert!(matches!(
            circuit.measure(QubitId(0), ClbitId(2)),
            Err(IrError::QubitAlreadyMeasured(QubitId(0)))
        ));
        assert!(matches!(
            circuit.measure(QubitId(1), ClbitId(3)),
            Err(IrError::ClbitNotFound { size: 3, .. })
        ));
    }

    #[test]
    fn test_gate_after_measurement_rejected() {
        let mut circuit = CircuitDescription::new("c", 1, 1).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        assert!(matches!(
            circuit.x(QubitId(0)),
            Err(IrError::OperationAfterMeasurement { .. })
        ));
    }

    #[test]
    fn test_depth_ignores_barriers() {
        let mut circuit = CircuitDescription::new("c", 2, 0).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.id(QubitId(1)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.count_ops()["barrier"], 1);
    }

    #[test]
    fn test_with_operations_keeps_measurements() {
        let circuit = CircuitDescription::bell().unwrap();
        let rebuilt = circuit
            .with_operations(vec![Operation::single(StandardGate::X, QubitId(1))])
            .unwrap();
        assert_eq!(rebuilt.num_ops(), 1);
        assert_eq!(rebuilt.measured_bits(), circuit.measured_bits());
        assert!(
            circuit
                .with_operations(vec![Operation::single(StandardGate::X, QubitId(5))])
                .is_err()
        );
    }

    #[test]
    fn test_ghz_depth() {
        let circuit = CircuitDescription::ghz(4).unwrap();
        assert_eq!(circuit.num_ops(), 4);
        assert_eq!(circuit.depth(), 5);
    }

    #[test]
    fn test_deserialize_replays_checks() {
        let bell = CircuitDescription::bell().unwrap();
        let json = serde_json::to_string(&bell).unwrap();
        let back: CircuitDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bell);

        let out_of_range = json.replace("\"num_qubits\":2", "\"num_qubits\":1");
        assert!(serde_json::from_str::<CircuitDescription>(&out_of_range).is_err());

        let shared_bit = r#"{"name":"x","num_qubits":2,"num_clbits":1,
            "operations":[],"measured_bits":{"0":0,"1":0}}"#;
        let err = serde_json::from_str::<CircuitDescription>(shared_bit).unwrap_err();
        assert!(err.to_string().contains("already receives"), "{err}");
    }
}
