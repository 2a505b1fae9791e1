//! Lowered circuits must prepare the same state as their source, up to a
//! global phase.

use proptest::prelude::*;
use qexp_adapter_sim::Statevector;
use qexp_compile::{BasisGates, lower};
use qexp_ir::{CircuitDescription, Operation, QubitId, StandardGate};

const NUM_QUBITS: u32 = 3;

fn prepare(circuit: &CircuitDescription) -> Statevector {
    let mut sv = Statevector::new(circuit.num_qubits() as usize);
    for op in circuit.operations() {
        sv.apply(op).unwrap();
    }
    sv
}

/// |<a|b>|, which is 1 exactly when the states agree up to phase.
fn overlap(a: &Statevector, b: &Statevector) -> f64 {
    (0..1usize << NUM_QUBITS)
        .map(|i| a.amplitude(i).conj() * b.amplitude(i))
        .sum::<num_complex::Complex64>()
        .norm()
}

/// Spread amplitude over every basis state so controlled gates do something.
fn scrambled() -> CircuitDescription {
    let mut circuit = CircuitDescription::new("equivalence", NUM_QUBITS, NUM_QUBITS).unwrap();
    for q in 0..NUM_QUBITS {
        circuit.h(QubitId(q)).unwrap();
        circuit.rz(0.3 + f64::from(q), QubitId(q)).unwrap();
        circuit.rx(0.7 * f64::from(q + 1), QubitId(q)).unwrap();
    }
    circuit
}

fn with_gate(gate: StandardGate, params: &[f64]) -> CircuitDescription {
    let mut circuit = scrambled();
    let targets = (0..gate.num_qubits()).map(|q| QubitId((q + 1) % NUM_QUBITS));
    circuit
        .push(Operation::gate(gate, targets, params.iter().copied()))
        .unwrap();
    circuit
}

fn assert_equivalent(circuit: &CircuitDescription, basis: &BasisGates, level: u8) {
    let lowered = lower(circuit, basis, level).unwrap();
    let fidelity = overlap(&prepare(circuit), &prepare(&lowered));
    assert!(
        (fidelity - 1.0).abs() < 1e-9,
        "{} lowered to {} at level {level}: overlap {fidelity}",
        circuit.operations().last().map_or("", |op| op.name()),
        basis.name()
    );
}

#[test]
fn every_standard_gate_survives_lowering() {
    for gate in StandardGate::ALL {
        let params: Vec<f64> = (0..gate.num_params())
            .map(|i| 0.41 + 0.37 * f64::from(i))
            .collect();
        let circuit = with_gate(gate, &params);
        for basis in [BasisGates::heron(), BasisGates::eagle()] {
            for level in 0..=3 {
                assert_equivalent(&circuit, &basis, level);
            }
        }
    }
}

fn gate_strategy() -> impl Strategy<Value = (StandardGate, Vec<f64>)> {
    prop::sample::select(StandardGate::ALL.to_vec()).prop_flat_map(|gate| {
        let n = gate.num_params() as usize;
        (
            Just(gate),
            prop::collection::vec(-std::f64::consts::TAU..std::f64::consts::TAU, n),
        )
    })
}

proptest! {
    #[test]
    fn random_sequences_keep_their_state(
        gates in prop::collection::vec((gate_strategy(), 0..NUM_QUBITS), 1..12),
        level in 0u8..=3,
    ) {
        let mut circuit = scrambled();
        for ((gate, params), offset) in gates {
            let targets = (0..gate.num_qubits()).map(|q| QubitId((q + offset) % NUM_QUBITS));
            circuit.push(Operation::gate(gate, targets, params)).unwrap();
        }
        let lowered = lower(&circuit, &BasisGates::heron(), level).unwrap();
        let fidelity = overlap(&prepare(&circuit), &prepare(&lowered));
        prop_assert!((fidelity - 1.0).abs() < 1e-9, "overlap {}", fidelity);
    }
}
