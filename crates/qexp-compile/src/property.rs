//! Target description and state shared between passes.
//!
//! A [`PropertySet`] travels through every pass of a
//! [`PassManager`](crate::PassManager). It carries the target's
//! [`BasisGates`] and the [`LoweringStats`] that the rewriting passes
//! accumulate.
//!
//! ```
//! use qexp_compile::{BasisGates, PropertySet};
//!
//! let props = PropertySet::new().with_basis(BasisGates::heron());
//! let basis = props.basis_gates.as_ref().unwrap();
//! assert!(basis.contains("cz"));
//! assert!(!basis.contains("cx"));
//! assert_eq!(basis.name(), "heron");
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use qexp_ir::{BARRIER, StandardGate};

/// Gate names a target executes natively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisGates {
    /// Target name used in diagnostics.
    name: String,
    /// Native gate names.
    gates: FxHashSet<String>,
}

impl BasisGates {
    /// Create a basis from gate names. The target is named `custom`.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: "custom".into(),
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// Rename the target.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Target name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a gate name is native. Barriers are always accepted.
    pub fn contains(&self, gate: &str) -> bool {
        gate == BARRIER || self.gates.contains(gate)
    }

    /// Native gate names in sorted order.
    pub fn gates(&self) -> Vec<&str> {
        let mut gates: Vec<&str> = self.gates.iter().map(String::as_str).collect();
        gates.sort_unstable();
        gates
    }

    /// Every standard gate. Used for the local simulator.
    pub fn universal() -> Self {
        Self::new(
            StandardGate::ALL
                .iter()
                .map(|g| g.name())
                .chain(["measure", BARRIER]),
        )
        .with_name("universal")
    }

    /// IBM Heron devices (RZ + SX + X + CZ, with RX and RZZ).
    pub fn heron() -> Self {
        Self::new([
            "rz", "sx", "x", "cz", "id", "rx", "rzz", "measure", "barrier",
        ])
        .with_name("heron")
    }

    /// Older IBM Eagle devices (RZ + SX + X + CX).
    pub fn eagle() -> Self {
        Self::new(["rz", "sx", "x", "cx", "id", "measure", "barrier"]).with_name("eagle")
    }
}

/// Counters accumulated by the rewriting passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoweringStats {
    /// Operations replaced by a decomposition.
    pub decomposed: usize,
    /// Identity operations dropped.
    pub removed_identities: usize,
    /// Adjacent inverse pairs dropped.
    pub cancelled_pairs: usize,
    /// Rotations folded into their predecessor.
    pub merged_rotations: usize,
    /// Rounds taken by the last fixpoint loop.
    pub fixpoint_rounds: usize,
}

/// Properties shared between lowering passes.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    /// Target basis gates for decomposition.
    pub basis_gates: Option<BasisGates>,

    /// Counters written by the rewriting passes.
    pub stats: LoweringStats,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target basis.
    #[must_use]
    pub fn with_basis(mut self, basis_gates: BasisGates) -> Self {
        self.basis_gates = Some(basis_gates);
        self
    }
}
