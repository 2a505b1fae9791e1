//! Emit-then-parse keeps every operation, in order, with exact parameters.

use proptest::prelude::*;
use qexp_ir::{CircuitDescription, ClbitId, Operation, QubitId, StandardGate};
use qexp_qasm::{emit, parse};

const NUM_QUBITS: u32 = 4;

fn arb_operation() -> impl Strategy<Value = Operation> {
    (
        prop::sample::select(StandardGate::ALL.to_vec()),
        Just((0..NUM_QUBITS).collect::<Vec<u32>>()).prop_shuffle(),
        prop::collection::vec(-10.0f64..10.0, 3),
    )
        .prop_map(|(gate, qubits, params)| {
            Operation::gate(
                gate,
                qubits[..gate.num_qubits() as usize].iter().map(|&q| QubitId(q)),
                params[..gate.num_params() as usize].iter().copied(),
            )
        })
}

proptest! {
    #[test]
    fn roundtrip_preserves_operations(
        ops in prop::collection::vec(arb_operation(), 0..40),
        measured in prop::collection::btree_set(0..NUM_QUBITS, 0..=NUM_QUBITS as usize),
    ) {
        let mut circuit = CircuitDescription::new("prop", NUM_QUBITS, NUM_QUBITS).unwrap();
        for op in ops {
            circuit.push(op).unwrap();
        }
        for (clbit, qubit) in measured.into_iter().enumerate() {
            circuit.measure(QubitId(qubit), ClbitId(clbit as u32)).unwrap();
        }

        let reparsed = parse(&emit(&circuit)).unwrap();
        prop_assert_eq!(circuit.operations(), reparsed.operations());
        prop_assert_eq!(circuit.measured_bits(), reparsed.measured_bits());
        prop_assert_eq!(circuit.depth(), reparsed.depth());
    }
}
