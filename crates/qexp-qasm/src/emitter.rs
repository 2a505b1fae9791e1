//! OpenQASM 3 emitter for circuit descriptions.

use std::fmt::Write;

use qexp_ir::{CircuitDescription, QubitId};

/// Emit a circuit as OpenQASM 3 source.
///
/// Qubits go to a single `q` register and classical bits to `c`, so the
/// output parses back to the same operation list.
pub fn emit(circuit: &CircuitDescription) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 3.0;\n");
    out.push_str("include \"stdgates.inc\";\n\n");

    let _ = writeln!(out, "qubit[{}] q;", circuit.num_qubits());
    if circuit.num_clbits() > 0 {
        let _ = writeln!(out, "bit[{}] c;", circuit.num_clbits());
    }
    out.push('\n');

    for op in circuit.operations() {
        let qubits = emit_qubits(op.targets());
        if op.params().is_empty() {
            let _ = writeln!(out, "{} {qubits};", op.name());
        } else {
            let params: Vec<String> = op.params().iter().map(|p| format!("{p:?}")).collect();
            let _ = writeln!(out, "{}({}) {qubits};", op.name(), params.join(", "));
        }
    }

    for (q, c) in circuit.measured_bits() {
        let _ = writeln!(out, "c[{}] = measure q[{}];", c.0, q.0);
    }

    out
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ")
}
