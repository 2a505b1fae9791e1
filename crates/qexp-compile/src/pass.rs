//! Pass trait and types for lowering passes.

use qexp_ir::CircuitDescription;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of lowering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the circuit.
    Analysis,
    /// Transformation pass that rewrites the operation list.
    Transformation,
}

/// A lowering pass over a circuit description.
///
/// Transformation passes rebuild the circuit through
/// [`CircuitDescription::with_operations`], so every rewrite is validated
/// against the register sizes and the measurement map again.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given circuit.
    ///
    /// Analysis passes must leave `circuit` untouched and may only record
    /// findings in the `PropertySet`.
    fn run(&self, circuit: &mut CircuitDescription, properties: &mut PropertySet)
    -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _circuit: &CircuitDescription, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPass;

    impl Pass for TestPass {
        fn name(&self) -> &'static str {
            "test"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(
            &self,
            _circuit: &mut CircuitDescription,
            _properties: &mut PropertySet,
        ) -> CompileResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pass_kind() {
        let pass = TestPass;
        assert_eq!(pass.kind(), PassKind::Analysis);
        assert_eq!(pass.name(), "test");
        let circuit = CircuitDescription::bell().unwrap();
        assert!(pass.should_run(&circuit, &PropertySet::new()));
    }
}
