//! Lowering of circuit descriptions to a target gate basis.
//!
//! A circuit is lowered by running it through a [`PassManager`]: first a
//! basis translation that rewrites every non-native operation in place, then
//! optional peephole optimizations selected by the optimization level.
//!
//! ```text
//! CircuitDescription
//!       │
//!       ▼
//! PassManager ◄── PropertySet (basis gates, stats)
//!       ├── BasisTranslation
//!       ├── CancelInverses / MergeRotations / RemoveIdentities   (level ≥ 1)
//!       │      └── wrapped in FixedPoint                          (level ≥ 2)
//!       └── BasisVerification                                     (level ≥ 1)
//!       │
//!       ▼
//! CircuitDescription (native gates only)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qexp_compile::{BasisGates, lower};
//! use qexp_ir::CircuitDescription;
//!
//! let circuit = CircuitDescription::bell().unwrap();
//! let lowered = lower(&circuit, &BasisGates::heron(), 0).unwrap();
//!
//! assert!(lowered.operations().iter().all(|op| op.name() != "cx"));
//! assert_eq!(lowered.count_ops().get("cz"), Some(&1));
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes |
//! |-------|--------|
//! | 0 | Basis translation only. Native operations, `id` included, are kept as written. |
//! | 1 | + inverse cancellation, rotation merging, identity removal |
//! | 2 | level-1 passes repeated to a fixpoint |
//! | 3 | as 2, with a higher round bound |
//!
//! # Custom Passes
//!
//! ```rust
//! use qexp_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use qexp_ir::CircuitDescription;
//!
//! struct CountOnly;
//!
//! impl Pass for CountOnly {
//!     fn name(&self) -> &str { "count_only" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, circuit: &mut CircuitDescription, _props: &mut PropertySet) -> CompileResult<()> {
//!         println!("{} ops", circuit.num_ops());
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use property::{BasisGates, LoweringStats, PropertySet};

use qexp_ir::CircuitDescription;

/// Lower a circuit to `basis` at the given optimization level.
///
/// The input is left untouched. Returns the lowered circuit together with
/// the counters the passes collected.
pub fn lower_with_stats(
    circuit: &CircuitDescription,
    basis: &BasisGates,
    optimization_level: u8,
) -> CompileResult<(CircuitDescription, LoweringStats)> {
    let (pm, mut props) = PassManagerBuilder::new()
        .with_optimization_level(optimization_level)
        .with_basis(basis.clone())
        .build();
    let mut lowered = circuit.clone();
    pm.run(&mut lowered, &mut props)?;
    Ok((lowered, props.stats))
}

/// Lower a circuit to `basis` at the given optimization level.
pub fn lower(
    circuit: &CircuitDescription,
    basis: &BasisGates,
    optimization_level: u8,
) -> CompileResult<CircuitDescription> {
    lower_with_stats(circuit, basis, optimization_level).map(|(lowered, _)| lowered)
}
