//! Final check that a lowered circuit only uses native gates.

use qexp_ir::CircuitDescription;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

use super::translation::is_native;

/// Analysis pass that rejects any operation outside the target basis.
///
/// Runs last so that a faulty rewrite in an optimization pass surfaces as
/// an error instead of reaching a backend.
pub struct BasisVerification;

impl Pass for BasisVerification {
    fn name(&self) -> &'static str {
        "BasisVerification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
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
        match circuit.operations().iter().find(|op| !is_native(op, basis)) {
            Some(op) => Err(CompileError::PassFailed {
                pass: self.name().into(),
                reason: format!(
                    "operation '{}' is not native to target '{}'",
                    op.name(),
                    basis.name()
                ),
            }),
            None => Ok(()),
        }
    }

    fn should_run(&self, _circuit: &CircuitDescription, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::BasisGates;

    #[test]
    fn test_rejects_foreign_gate() {
        let mut circuit = CircuitDescription::bell().unwrap();
        let mut props = PropertySet::new().with_basis(BasisGates::heron());
        let err = BasisVerification.run(&mut circuit, &mut props).unwrap_err();
        assert!(err.to_string().contains("'h'"));
    }

    #[test]
    fn test_accepts_native_circuit() {
        let mut circuit = CircuitDescription::bell().unwrap();
        let mut props = PropertySet::new().with_basis(BasisGates::universal());
        BasisVerification.run(&mut circuit, &mut props).unwrap();
    }
}
