//! Identity removal.

use std::f64::consts::TAU;

use qexp_ir::{CircuitDescription, Operation, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

use super::EPSILON;

/// Drops `id` gates and rotations by a multiple of their period.
pub struct RemoveIdentities;

impl Pass for RemoveIdentities {
    fn name(&self) -> &'static str {
        "RemoveIdentities"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: &mut CircuitDescription,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        let kept: Vec<Operation> = circuit
            .operations()
            .iter()
            .filter(|op| !is_trivial(op))
            .cloned()
            .collect();
        let removed = circuit.num_ops() - kept.len();
        if removed > 0 {
            *circuit = circuit.with_operations(kept)?;
            properties.stats.removed_identities += removed;
        }
        Ok(())
    }
}

fn is_trivial(op: &Operation) -> bool {
    if op.is_identity() {
        return true;
    }
    match (op.standard(), op.params()) {
        (Some(gate), [angle]) if gate.is_additive_rotation() => {
            // CRz(2π) is a Z on the control, so its period doubles.
            let period = if gate == StandardGate::CRz { 2.0 * TAU } else { TAU };
            let r = angle.rem_euclid(period);
            r < EPSILON || period - r < EPSILON
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qexp_ir::QubitId;

    #[test]
    fn test_trivial_rotations() {
        let q = QubitId(0);
        assert!(is_trivial(&Operation::single(StandardGate::I, q)));
        assert!(is_trivial(&Operation::rotation(StandardGate::Rz, 0.0, q)));
        assert!(is_trivial(&Operation::rotation(StandardGate::Rx, TAU, q)));
        assert!(is_trivial(&Operation::rotation(StandardGate::P, -TAU, q)));
        assert!(!is_trivial(&Operation::rotation(StandardGate::Rz, 0.1, q)));
        assert!(!is_trivial(&Operation::single(StandardGate::X, q)));
    }

    #[test]
    fn test_crz_period() {
        let (c, t) = (QubitId(0), QubitId(1));
        assert!(!is_trivial(&Operation::gate(StandardGate::CRz, [c, t], [TAU])));
        assert!(is_trivial(&Operation::gate(StandardGate::CRz, [c, t], [2.0 * TAU])));
    }
}
