//! Tests for optimization passes.

use std::f64::consts::PI;

use qexp_ir::{CircuitDescription, Operation, QubitId, StandardGate};

use crate::pass::Pass;
use crate::property::PropertySet;

use super::{CancelInverses, MergeRotations, RemoveIdentities};

fn names(circuit: &CircuitDescription) -> Vec<&str> {
    circuit.operations().iter().map(Operation::name).collect()
}

#[test]
fn test_cancel_cx_pair() {
    let mut circuit = CircuitDescription::new("test", 2, 0).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let mut props = PropertySet::new();
    CancelInverses.run(&mut circuit, &mut props).unwrap();

    assert_eq!(circuit.num_ops(), 0);
    assert_eq!(props.stats.cancelled_pairs, 1);
}

#[test]
fn test_cancel_reversed_cx_kept() {
    let mut circuit = CircuitDescription::new("test", 2, 0).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(1), QubitId(0)).unwrap();

    CancelInverses
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(circuit.num_ops(), 2);
}

#[test]
fn test_cancel_symmetric_cz() {
    let mut circuit = CircuitDescription::new("test", 2, 0).unwrap();
    circuit.cz(QubitId(0), QubitId(1)).unwrap();
    circuit.cz(QubitId(1), QubitId(0)).unwrap();

    CancelInverses
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(circuit.num_ops(), 0);
}

#[test]
fn test_cancel_nested_pairs() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.h(QubitId(0)).unwrap();
    circuit.x(QubitId(0)).unwrap();
    circuit.x(QubitId(0)).unwrap();
    circuit.h(QubitId(0)).unwrap();

    let mut props = PropertySet::new();
    CancelInverses.run(&mut circuit, &mut props).unwrap();
    assert_eq!(circuit.num_ops(), 0);
    assert_eq!(props.stats.cancelled_pairs, 2);
}

#[test]
fn test_cancel_sx_sxdg() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.sx(QubitId(0)).unwrap();
    circuit
        .push(Operation::single(StandardGate::SXdg, QubitId(0)))
        .unwrap();

    CancelInverses
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(circuit.num_ops(), 0);
}

#[test]
fn test_cancel_blocked_by_intervening_gate() {
    let mut circuit = CircuitDescription::new("test", 2, 0).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.x(QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    CancelInverses
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(names(&circuit), vec!["cx", "x", "cx"]);
}

#[test]
fn test_cancel_ignores_unrelated_wires() {
    let mut circuit = CircuitDescription::new("test", 3, 0).unwrap();
    circuit.h(QubitId(0)).unwrap();
    circuit.x(QubitId(2)).unwrap();
    circuit.h(QubitId(0)).unwrap();

    CancelInverses
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(names(&circuit), vec!["x"]);
}

#[test]
fn test_barrier_fences_cancellation() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.x(QubitId(0)).unwrap();
    circuit.barrier_all().unwrap();
    circuit.x(QubitId(0)).unwrap();

    CancelInverses
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(names(&circuit), vec!["x", "barrier", "x"]);
}

#[test]
fn test_merge_rz() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.rz(PI / 4.0, QubitId(0)).unwrap();
    circuit.rz(PI / 4.0, QubitId(0)).unwrap();
    circuit.rz(PI / 2.0, QubitId(0)).unwrap();

    let mut props = PropertySet::new();
    MergeRotations.run(&mut circuit, &mut props).unwrap();

    assert_eq!(circuit.num_ops(), 1);
    assert!((circuit.operations()[0].params()[0] - PI).abs() < 1e-12);
    assert_eq!(props.stats.merged_rotations, 2);
}

#[test]
fn test_merge_keeps_axes_apart() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.rz(0.1, QubitId(0)).unwrap();
    circuit.rx(0.2, QubitId(0)).unwrap();
    circuit.rz(0.3, QubitId(0)).unwrap();

    MergeRotations
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(names(&circuit), vec!["rz", "rx", "rz"]);
}

#[test]
fn test_merge_blocked_by_barrier() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.rz(0.1, QubitId(0)).unwrap();
    circuit.barrier_all().unwrap();
    circuit.rz(0.3, QubitId(0)).unwrap();

    MergeRotations
        .run(&mut circuit, &mut PropertySet::new())
        .unwrap();
    assert_eq!(circuit.num_ops(), 3);
}

#[test]
fn test_cancel_leaves_identity_pairs() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.id(QubitId(0)).unwrap();
    circuit.id(QubitId(0)).unwrap();

    let mut props = PropertySet::new();
    CancelInverses.run(&mut circuit, &mut props).unwrap();
    assert_eq!(names(&circuit), vec!["id", "id"]);
    assert_eq!(props.stats.cancelled_pairs, 0);
}

#[test]
fn test_remove_identities() {
    let mut circuit = CircuitDescription::new("test", 1, 0).unwrap();
    circuit.id(QubitId(0)).unwrap();
    circuit.rz(0.0, QubitId(0)).unwrap();
    circuit.x(QubitId(0)).unwrap();
    circuit.rx(2.0 * PI, QubitId(0)).unwrap();

    let mut props = PropertySet::new();
    RemoveIdentities.run(&mut circuit, &mut props).unwrap();
    assert_eq!(names(&circuit), vec!["x"]);
    assert_eq!(props.stats.removed_identities, 3);
}

#[test]
fn test_merge_then_remove() {
    let mut circuit = CircuitDescription::new("test", 1, 1).unwrap();
    circuit.rz(0.7, QubitId(0)).unwrap();
    circuit.rz(-0.7, QubitId(0)).unwrap();
    circuit.measure(QubitId(0), qexp_ir::ClbitId(0)).unwrap();

    let mut props = PropertySet::new();
    MergeRotations.run(&mut circuit, &mut props).unwrap();
    RemoveIdentities.run(&mut circuit, &mut props).unwrap();
    assert_eq!(circuit.num_ops(), 0);
    assert!(circuit.has_measurements());
}
