//! Benchmarks for circuit lowering
//!
//! Run with: cargo bench -p qexp-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qexp_compile::{BasisGates, lower};
use qexp_ir::{CircuitDescription, QubitId};

fn layered(n: u32, layers: u32) -> CircuitDescription {
    let mut circuit = CircuitDescription::new("bench", n, n).unwrap();
    for layer in 0..layers {
        for q in 0..n {
            circuit.h(QubitId(q)).unwrap();
            circuit.rz(0.1 * f64::from(layer + 1), QubitId(q)).unwrap();
        }
        for q in 0..n - 1 {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit.measure_all().unwrap();
    circuit
}

fn bench_lowering(c: &mut Criterion) {
    let mut group = c.benchmark_group("lowering");

    for num_qubits in &[2u32, 5, 10, 20] {
        let circuit = layered(*num_qubits, 10);
        for level in [0u8, 1, 3] {
            group.bench_with_input(
                BenchmarkId::new(format!("heron_o{level}"), num_qubits),
                &circuit,
                |b, circuit| {
                    b.iter(|| lower(black_box(circuit), &BasisGates::heron(), level).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_lowering);
criterion_main!(benches);
