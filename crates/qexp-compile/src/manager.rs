//! Ordered execution of lowering passes.

use tracing::{debug, info, instrument};

use qexp_ir::CircuitDescription;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    BasisTranslation, BasisVerification, CancelInverses, FixedPoint, MergeRotations,
    RemoveIdentities,
};
use crate::property::{BasisGates, PropertySet};

/// Round bound for the level-2 optimization loop.
const LEVEL2_ROUNDS: usize = 8;
/// Round bound for the level-3 optimization loop.
const LEVEL3_ROUNDS: usize = 32;

/// An ordered list of passes applied to one circuit.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Append `pass` to the schedule.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Names of the scheduled passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Apply every scheduled pass to `circuit`, stopping at the first error.
    #[instrument(skip(self, circuit, properties), fields(circuit = %circuit.name()))]
    pub fn run(
        &self,
        circuit: &mut CircuitDescription,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        info!(
            passes = self.passes.len(),
            ops = circuit.num_ops(),
            "lowering"
        );

        for pass in &self.passes {
            if !pass.should_run(circuit, properties) {
                debug!(pass = pass.name(), "skipped");
                continue;
            }
            let before = circuit.num_ops();
            pass.run(circuit, properties)?;
            debug!(pass = pass.name(), before, after = circuit.num_ops(), "pass done");
        }

        info!(
            ops = circuit.num_ops(),
            depth = circuit.depth(),
            "lowered"
        );

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Optimization level (0-3).
    optimization_level: u8,
    /// Target properties.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with level 0 and no target.
    pub fn new() -> Self {
        Self {
            optimization_level: 0,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level. Values above 3 are clamped.
    ///
    /// - Level 0: basis translation only
    /// - Level 1: one round of identity removal, inverse cancellation and
    ///   rotation merging
    /// - Level 2: the level-1 passes repeated until nothing changes
    /// - Level 3: as level 2 with a higher round bound
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Set the target basis.
    #[must_use]
    pub fn with_basis(mut self, basis_gates: BasisGates) -> Self {
        self.properties.basis_gates = Some(basis_gates);
        self
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();
        let has_basis = self.properties.basis_gates.is_some();

        if has_basis {
            pm.add_pass(BasisTranslation);
        }

        match self.optimization_level {
            0 => {}
            1 => {
                pm.add_pass(CancelInverses);
                pm.add_pass(MergeRotations);
                pm.add_pass(RemoveIdentities);
            }
            2 => pm.add_pass(FixedPoint::new(optimization_group(), LEVEL2_ROUNDS)),
            _ => pm.add_pass(FixedPoint::new(optimization_group(), LEVEL3_ROUNDS)),
        }

        if has_basis && self.optimization_level >= 1 {
            pm.add_pass(BasisVerification);
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn optimization_group() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(CancelInverses),
        Box::new(MergeRotations),
        Box::new(RemoveIdentities),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use qexp_ir::QubitId;

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run_without_passes() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();
        let mut circuit = CircuitDescription::bell().unwrap();
        pm.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit.num_ops(), 2);
    }

    #[test]
    fn test_level_zero_schedule() {
        let (pm, props) = PassManagerBuilder::new()
            .with_basis(BasisGates::heron())
            .build();
        assert_eq!(pm.pass_names(), vec!["BasisTranslation"]);
        assert!(props.basis_gates.is_some());
    }

    #[test]
    fn test_level_one_schedule() {
        let (pm, _) = PassManagerBuilder::new()
            .with_optimization_level(1)
            .with_basis(BasisGates::heron())
            .build();
        assert_eq!(
            pm.pass_names(),
            vec![
                "BasisTranslation",
                "CancelInverses",
                "MergeRotations",
                "RemoveIdentities",
                "BasisVerification"
            ]
        );
    }

    #[test]
    fn test_level_clamped() {
        let (pm, _) = PassManagerBuilder::new()
            .with_optimization_level(9)
            .build();
        assert_eq!(pm.pass_names(), vec!["FixedPoint"]);
    }

    #[test]
    fn test_level_two_fixpoint() {
        let mut circuit = CircuitDescription::new("opt", 2, 0).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.rz(0.3, QubitId(0)).unwrap();
        circuit.rz(-0.3, QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let (pm, mut props) = PassManagerBuilder::new()
            .with_optimization_level(2)
            .with_basis(BasisGates::universal())
            .build();
        pm.run(&mut circuit, &mut props).unwrap();

        assert_eq!(circuit.num_ops(), 1);
        assert_eq!(circuit.operations()[0].name(), "cx");
    }
}
