//! Basis translation pass.

use tracing::debug;

use qexp_ir::{CircuitDescription, Operation};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{BasisGates, PropertySet};

use super::decompose::decompose;

/// Maximum nesting of decomposition rules before giving up.
pub const MAX_DECOMPOSITION_DEPTH: usize = 8;

/// Basis translation pass.
///
/// Walks the operation list once. Operations whose gate is native to the
/// target are kept at their position; every other operation is replaced in
/// place by its decomposition, applied recursively until all produced
/// gates are native. Nothing is merged or reordered.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: &mut CircuitDescription,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;

        let mut lowered = Vec::with_capacity(circuit.num_ops());
        let mut decomposed = 0;
        for op in circuit.operations() {
            if is_native(op, basis) {
                lowered.push(canonical(op));
                continue;
            }
            expand(op, basis, 0, &mut lowered)
                .ok_or_else(|| CompileError::unsupported(op.name(), basis.name()))?;
            decomposed += 1;
        }

        if decomposed > 0 {
            debug!(
                "Decomposed {} operations for target '{}'",
                decomposed,
                basis.name()
            );
            *circuit = circuit.with_operations(lowered)?;
        }
        properties.stats.decomposed += decomposed;
        Ok(())
    }

    fn should_run(&self, _circuit: &CircuitDescription, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

/// Check whether the target executes an operation directly.
///
/// Standard gates are looked up by canonical name so aliases such as `u1`
/// match a basis listing `p`.
pub(crate) fn is_native(op: &Operation, basis: &BasisGates) -> bool {
    if op.is_barrier() {
        return true;
    }
    match op.standard() {
        Some(gate) => basis.contains(gate.name()),
        None => basis.contains(op.name()),
    }
}

fn canonical(op: &Operation) -> Operation {
    match op.standard() {
        Some(gate) if gate.name() != op.name() => {
            Operation::gate(gate, op.targets().iter().copied(), op.params().iter().copied())
        }
        _ => op.clone(),
    }
}

/// Append the native expansion of `op` to `out`.
///
/// On failure `out` may hold a partial expansion; the caller discards it.
fn expand(op: &Operation, basis: &BasisGates, depth: usize, out: &mut Vec<Operation>) -> Option<()> {
    if is_native(op, basis) {
        out.push(canonical(op));
        return Some(());
    }
    if depth >= MAX_DECOMPOSITION_DEPTH {
        return None;
    }
    let gate = op.standard()?;
    for step in decompose(gate, op.targets(), op.params(), basis)? {
        expand(&step, basis, depth + 1, out)?;
    }
    Some(())
}
