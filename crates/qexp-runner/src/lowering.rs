//! Lowering a circuit for the resolved executor.

use qexp_compile::{BasisGates, LoweringStats, lower_with_stats};
use qexp_hal::Capabilities;
use qexp_ir::CircuitDescription;
use tracing::{debug, instrument};

use crate::error::PipelineResult;
use crate::resolver::ExecutorHandle;

/// Target basis of an executor, taken from its native gate set.
pub fn basis_for(capabilities: &Capabilities) -> BasisGates {
    BasisGates::new(capabilities.gate_set.names()).with_name(capabilities.name.clone())
}

/// A lowered circuit and what lowering did to it.
#[derive(Debug, Clone)]
pub struct Lowered {
    pub circuit: CircuitDescription,
    pub stats: LoweringStats,
}

/// Lower `circuit` for the executor behind `handle`.
#[instrument(skip(circuit, handle), fields(circuit = %circuit.name(), target = %handle.backend().name()))]
pub fn lower_for(
    circuit: &CircuitDescription,
    handle: &ExecutorHandle,
    optimization_level: u8,
) -> PipelineResult<Lowered> {
    let basis = basis_for(handle.backend().capabilities());
    let (lowered, stats) = lower_with_stats(circuit, &basis, optimization_level)?;
    debug!(
        "lowered {} ops to {} ops ({} decomposed)",
        circuit.num_ops(),
        lowered.num_ops(),
        stats.decomposed
    );
    Ok(Lowered {
        circuit: lowered,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qexp_adapter_sim::SimulatorBackend;
    use qexp_hal::GateSet;
    use qexp_ir::{Operation, QubitId};

    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn test_simulator_basis_keeps_everything() {
        let handle = ExecutorHandle::local(Arc::new(SimulatorBackend::new()));
        let mut circuit = CircuitDescription::new("ghz_id", 3, 3).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(2))
            .unwrap()
            .id(QubitId(2))
            .unwrap()
            .measure_all()
            .unwrap();

        let lowered = lower_for(&circuit, &handle, 0).unwrap();
        assert_eq!(lowered.circuit.operations(), circuit.operations());
        assert_eq!(lowered.stats.decomposed, 0);
    }

    #[test]
    fn test_heron_basis_from_capabilities() {
        let caps = Capabilities::ibm("ibm_marrakesh", 156, GateSet::ibm_heron());
        let basis = basis_for(&caps);
        assert_eq!(basis.name(), "ibm_marrakesh");
        assert!(basis.contains("rzz"));
        assert!(!basis.contains("h"));
    }

    #[test]
    fn test_opaque_gate_unsupported() {
        let handle = ExecutorHandle::local(Arc::new(SimulatorBackend::new()));
        let mut circuit = CircuitDescription::new("opaque", 1, 1).unwrap();
        circuit
            .push(Operation::new("foo", [QubitId(0)], []))
            .unwrap();

        let err = lower_for(&circuit, &handle, 0).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedOperation(_)));
        assert!(err.to_string().contains("foo"));
    }
}
