//! Local peephole optimizations over the operation list.
//!
//! All passes here walk the list once and keep, per qubit, a stack of the
//! kept operations that touch it. Two operations are adjacent when the
//! earlier one sits on top of the stack of every wire the later one uses.
//! Barriers are pushed like any other operation, so nothing is combined
//! across them.

mod cancel;
mod identity;
mod merge;

#[cfg(test)]
mod tests;

pub use cancel::CancelInverses;
pub use identity::RemoveIdentities;
pub use merge::MergeRotations;

use rustc_hash::FxHashMap;

use qexp_ir::{Operation, QubitId, StandardGate};

pub(super) const EPSILON: f64 = 1e-10;

/// Per-wire stacks of indices into a rewrite buffer.
#[derive(Default)]
pub(super) struct WireTracker {
    stacks: FxHashMap<QubitId, Vec<usize>>,
}

impl WireTracker {
    /// Index of the operation directly before `targets` on all of its
    /// wires, if one operation holds that position on every wire.
    pub(super) fn predecessor(&self, targets: &[QubitId]) -> Option<usize> {
        let mut tops = targets
            .iter()
            .map(|q| self.stacks.get(q).and_then(|s| s.last().copied()));
        let first = tops.next()??;
        tops.all(|top| top == Some(first)).then_some(first)
    }

    pub(super) fn push(&mut self, index: usize, targets: &[QubitId]) {
        for q in targets {
            self.stacks.entry(*q).or_default().push(index);
        }
    }

    pub(super) fn pop(&mut self, targets: &[QubitId]) {
        for q in targets {
            if let Some(stack) = self.stacks.get_mut(q) {
                stack.pop();
            }
        }
    }
}

/// Whether two operations act on the same wires in an order the gate
/// treats as equivalent.
pub(super) fn same_wires(gate: StandardGate, a: &Operation, b: &Operation) -> bool {
    if a.targets() == b.targets() {
        return true;
    }
    let symmetric = matches!(gate, StandardGate::CZ | StandardGate::Swap | StandardGate::RZZ);
    symmetric
        && matches!((a.targets(), b.targets()), ([a0, a1], [b0, b1]) if a0 == b1 && a1 == b0)
}
