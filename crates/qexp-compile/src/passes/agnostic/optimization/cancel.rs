//! Cancellation of adjacent inverse pairs.

use qexp_ir::{CircuitDescription, Operation, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

use super::{WireTracker, same_wires};

/// Cancels adjacent parameter-free gates that undo each other.
///
/// `cx·cx`, `h·h`, `sx·sxdg`, `t·tdg` and similar pairs are removed when no
/// other operation touches their wires in between. `id` is left to
/// [`super::RemoveIdentities`]. After a pair is removed
/// the operations around it become adjacent, so nested pairs such as
/// `h x x h` collapse in a single pass.
pub struct CancelInverses;

impl Pass for CancelInverses {
    fn name(&self) -> &'static str {
        "CancelInverses"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: &mut CircuitDescription,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        let mut buffer: Vec<Option<Operation>> = Vec::with_capacity(circuit.num_ops());
        let mut wires = WireTracker::default();
        let mut cancelled = 0;

        for op in circuit.operations() {
            if let Some(k) = wires.predecessor(op.targets()) {
                if buffer[k].as_ref().is_some_and(|prev| cancels(prev, op)) {
                    buffer[k] = None;
                    wires.pop(op.targets());
                    cancelled += 1;
                    continue;
                }
            }
            wires.push(buffer.len(), op.targets());
            buffer.push(Some(op.clone()));
        }

        if cancelled > 0 {
            *circuit = circuit.with_operations(buffer.into_iter().flatten().collect())?;
            properties.stats.cancelled_pairs += cancelled;
        }
        Ok(())
    }
}

fn cancels(prev: &Operation, next: &Operation) -> bool {
    let (Some(a), Some(b)) = (prev.standard(), next.standard()) else {
        return false;
    };
    a != StandardGate::I
        && prev.params().is_empty()
        && next.params().is_empty()
        && a.inverse() == Some(b)
        && same_wires(a, prev, next)
}
