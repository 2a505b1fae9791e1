//! Merging of consecutive rotations.

use qexp_ir::{CircuitDescription, Operation};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

use super::{WireTracker, same_wires};

/// Folds a rotation into the directly preceding rotation of the same kind
/// on the same wires, adding the angles.
///
/// A merge can leave a zero-angle rotation behind; [`super::RemoveIdentities`]
/// drops it.
pub struct MergeRotations;

impl Pass for MergeRotations {
    fn name(&self) -> &'static str {
        "MergeRotations"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: &mut CircuitDescription,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        let mut buffer: Vec<Operation> = Vec::with_capacity(circuit.num_ops());
        let mut wires = WireTracker::default();
        let mut merged = 0;

        for op in circuit.operations() {
            if let Some(k) = wires.predecessor(op.targets()) {
                if let Some(sum) = merge(&buffer[k], op) {
                    buffer[k] = sum;
                    merged += 1;
                    continue;
                }
            }
            wires.push(buffer.len(), op.targets());
            buffer.push(op.clone());
        }

        if merged > 0 {
            *circuit = circuit.with_operations(buffer)?;
            properties.stats.merged_rotations += merged;
        }
        Ok(())
    }
}

fn merge(prev: &Operation, next: &Operation) -> Option<Operation> {
    let gate = prev.standard()?;
    if !gate.is_additive_rotation() || next.standard() != Some(gate) {
        return None;
    }
    if !same_wires(gate, prev, next) {
        return None;
    }
    match (prev.params(), next.params()) {
        ([a], [b]) => Some(Operation::gate(gate, prev.targets().iter().copied(), [a + b])),
        _ => None,
    }
}
