//! Repetition of a pass group until it stops changing the circuit.

use tracing::debug;

use qexp_ir::CircuitDescription;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Runs a group of passes in order, round after round, until a round leaves
/// the operation list unchanged or `max_rounds` is reached.
pub struct FixedPoint {
    passes: Vec<Box<dyn Pass>>,
    max_rounds: usize,
}

impl FixedPoint {
    /// Create a loop over `passes` bounded by `max_rounds` (at least one).
    pub fn new(passes: Vec<Box<dyn Pass>>, max_rounds: usize) -> Self {
        Self {
            passes,
            max_rounds: max_rounds.max(1),
        }
    }

    /// Upper bound on rounds.
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }
}

impl Pass for FixedPoint {
    fn name(&self) -> &'static str {
        "FixedPoint"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: &mut CircuitDescription,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        for round in 1..=self.max_rounds {
            let before = circuit.operations().to_vec();
            for pass in &self.passes {
                if pass.should_run(circuit, properties) {
                    pass.run(circuit, properties)?;
                }
            }
            properties.stats.fixpoint_rounds = round;
            if circuit.operations() == before.as_slice() {
                debug!("Fixpoint reached after {} rounds", round);
                return Ok(());
            }
        }
        debug!("Fixpoint round limit {} reached", self.max_rounds);
        Ok(())
    }
}
