//! Syntax tree to circuit description.

use std::f64::consts::FRAC_PI_2;

use qexp_ir::{CircuitDescription, ClbitId, Operation, QubitId, StandardGate};
use rustc_hash::FxHashMap;

use super::expression::evaluate;
use crate::ast::{BitRef, GateCall, Program, QubitRef, Statement};
use crate::error::{ParseError, ParseResult};

/// Lower a parsed program to a circuit description.
pub(crate) fn lower_to_circuit(name: &str, program: &Program) -> ParseResult<CircuitDescription> {
    let mut lowerer = Lowerer::default();
    lowerer.declare(program)?;

    let mut circuit =
        CircuitDescription::new(name, lowerer.num_qubits(), lowerer.next_clbit)?;
    for stmt in &program.statements {
        lowerer.lower_statement(&mut circuit, stmt)?;
    }
    Ok(circuit)
}

#[derive(Default)]
struct Lowerer {
    /// Qubit registers: name -> (`start_id`, size).
    qregs: FxHashMap<String, (u32, u32)>,
    /// Classical registers: name -> (`start_id`, size).
    cregs: FxHashMap<String, (u32, u32)>,
    next_qubit: u32,
    next_clbit: u32,
    /// Highest physical qubit index used, if any.
    max_physical: Option<u32>,
}

impl Lowerer {
    /// First pass: registers and physical qubit usage.
    fn declare(&mut self, program: &Program) -> ParseResult<()> {
        for stmt in &program.statements {
            match stmt {
                Statement::QubitDecl { name, size } => {
                    self.check_unique(name)?;
                    self.qregs.insert(name.clone(), (self.next_qubit, *size));
                    self.next_qubit += size;
                }
                Statement::BitDecl { name, size } => {
                    self.check_unique(name)?;
                    self.cregs.insert(name.clone(), (self.next_clbit, *size));
                    self.next_clbit += size;
                }
                Statement::Gate(GateCall { qubits, .. })
                | Statement::Measure { qubits, .. }
                | Statement::Barrier { qubits } => {
                    for q in qubits {
                        if let QubitRef::Physical(n) = q {
                            self.max_physical = Some(self.max_physical.map_or(*n, |m| m.max(*n)));
                        }
                    }
                }
                Statement::Include(_) => {}
            }
        }

        if self.max_physical.is_some() && !self.qregs.is_empty() {
            return Err(ParseError::MixedQubitAddressing);
        }
        if self.num_qubits() == 0 {
            return Err(ParseError::NoQubits);
        }
        Ok(())
    }

    fn check_unique(&self, name: &str) -> ParseResult<()> {
        if self.qregs.contains_key(name) || self.cregs.contains_key(name) {
            return Err(ParseError::DuplicateDeclaration(name.to_string()));
        }
        Ok(())
    }

    fn num_qubits(&self) -> u32 {
        match self.max_physical {
            Some(max) => max + 1,
            None => self.next_qubit,
        }
    }

    fn lower_statement(&self, circuit: &mut CircuitDescription, stmt: &Statement) -> ParseResult<()> {
        match stmt {
            Statement::QubitDecl { .. } | Statement::BitDecl { .. } | Statement::Include(_) => {
                Ok(())
            }

            Statement::Gate(call) => self.lower_gate_call(circuit, call),

            Statement::Measure { qubits, bits } => {
                if bits.is_empty() {
                    return Err(ParseError::Generic(
                        "measurement result must be stored in a classical bit".into(),
                    ));
                }
                let q_ids: Vec<QubitId> = self.resolve_qubit_args(qubits)?.concat();
                let c_ids = self.resolve_bits(bits)?;
                if q_ids.len() != c_ids.len() {
                    return Err(ParseError::BroadcastMismatch("measure".into()));
                }
                for (q, c) in q_ids.into_iter().zip(c_ids) {
                    circuit.measure(q, c)?;
                }
                Ok(())
            }

            Statement::Barrier { qubits } => {
                if qubits.is_empty() {
                    circuit.barrier_all()?;
                } else {
                    let mut targets: Vec<QubitId> = Vec::new();
                    for q in self.resolve_qubit_args(qubits)?.concat() {
                        if !targets.contains(&q) {
                            targets.push(q);
                        }
                    }
                    circuit.push(Operation::barrier(targets))?;
                }
                Ok(())
            }
        }
    }

    fn lower_gate_call(&self, circuit: &mut CircuitDescription, call: &GateCall) -> ParseResult<()> {
        let mut params: Vec<f64> = call
            .params
            .iter()
            .map(evaluate)
            .collect::<ParseResult<_>>()?;

        // QASM 2 `u2(φ, λ)` is `u(π/2, φ, λ)`.
        let gate = if call.name == "u2" {
            if params.len() != 2 {
                return Err(ParseError::WrongParameterCount {
                    gate: call.name.clone(),
                    expected: 2,
                    got: params.len(),
                });
            }
            params.insert(0, FRAC_PI_2);
            Some(StandardGate::U)
        } else {
            StandardGate::from_name(&call.name)
        };

        if let Some(gate) = gate {
            if call.qubits.len() != gate.num_qubits() as usize {
                return Err(ParseError::WrongQubitCount {
                    gate: call.name.clone(),
                    expected: gate.num_qubits() as usize,
                    got: call.qubits.len(),
                });
            }
            if params.len() != gate.num_params() as usize {
                return Err(ParseError::WrongParameterCount {
                    gate: call.name.clone(),
                    expected: gate.num_params() as usize,
                    got: params.len(),
                });
            }
        }

        let name = gate.map_or(call.name.as_str(), |g| g.name());
        for targets in broadcast(&call.name, self.resolve_qubit_args(&call.qubits)?)? {
            circuit.push(Operation::new(name, targets, params.iter().copied()))?;
        }
        Ok(())
    }

    /// Resolve each argument to its qubits: one for `q[i]` and `$i`, the
    /// whole register for `q`.
    fn resolve_qubit_args(&self, refs: &[QubitRef]) -> ParseResult<Vec<Vec<QubitId>>> {
        refs.iter()
            .map(|r| match r {
                QubitRef::Physical(n) => Ok(vec![QubitId(*n)]),
                QubitRef::Indexed { register, index } => {
                    let (start, size) = lookup(&self.qregs, register)?;
                    check_index(register, *index, size)?;
                    Ok(vec![QubitId(start + index)])
                }
                QubitRef::Register(register) => {
                    let (start, size) = lookup(&self.qregs, register)?;
                    Ok((start..start + size).map(QubitId).collect())
                }
            })
            .collect()
    }

    fn resolve_bits(&self, refs: &[BitRef]) -> ParseResult<Vec<ClbitId>> {
        let mut ids = Vec::new();
        for r in refs {
            match r {
                BitRef::Indexed { register, index } => {
                    let (start, size) = lookup(&self.cregs, register)?;
                    check_index(register, *index, size)?;
                    ids.push(ClbitId(start + index));
                }
                BitRef::Register(register) => {
                    let (start, size) = lookup(&self.cregs, register)?;
                    ids.extend((start..start + size).map(ClbitId));
                }
            }
        }
        Ok(ids)
    }
}

fn lookup(registers: &FxHashMap<String, (u32, u32)>, name: &str) -> ParseResult<(u32, u32)> {
    registers
        .get(name)
        .copied()
        .ok_or_else(|| ParseError::UndefinedIdentifier(name.to_string()))
}

fn check_index(register: &str, index: u32, size: u32) -> ParseResult<()> {
    if index >= size {
        return Err(ParseError::IndexOutOfBounds {
            register: register.to_string(),
            index: index as usize,
            size: size as usize,
        });
    }
    Ok(())
}

/// Expand register arguments into one target list per broadcast step.
///
/// Single-qubit arguments repeat in every step; register arguments must all
/// have the same length.
fn broadcast(gate: &str, args: Vec<Vec<QubitId>>) -> ParseResult<Vec<Vec<QubitId>>> {
    let width = args.iter().map(Vec::len).filter(|&n| n != 1).max().unwrap_or(1);
    if args.iter().any(|a| a.len() != 1 && a.len() != width) {
        return Err(ParseError::BroadcastMismatch(gate.to_string()));
    }

    Ok((0..width)
        .map(|step| {
            args.iter()
                .map(|a| if a.len() == 1 { a[0] } else { a[step] })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_broadcast_pairs_registers() {
        let steps = broadcast(
            "cx",
            vec![vec![QubitId(0), QubitId(1)], vec![QubitId(2), QubitId(3)]],
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![vec![QubitId(0), QubitId(2)], vec![QubitId(1), QubitId(3)]]
        );
    }

    #[test]
    fn test_broadcast_repeats_single_argument() {
        let steps = broadcast(
            "cx",
            vec![vec![QubitId(0)], vec![QubitId(1), QubitId(2)]],
        )
        .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1], vec![QubitId(0), QubitId(2)]);
    }

    #[test]
    fn test_broadcast_size_mismatch() {
        let err = parse("OPENQASM 2.0; qreg a[2]; qreg b[3]; cx a, b;").unwrap_err();
        assert!(matches!(err, ParseError::BroadcastMismatch(_)));
    }

    #[test]
    fn test_aliases_are_canonicalized() {
        let circuit = parse("OPENQASM 2.0; qreg q[2]; u1(0.1) q[0]; cnot q[0], q[1];").unwrap();
        assert_eq!(circuit.operations()[0].name(), "p");
        assert_eq!(circuit.operations()[1].name(), "cx");
    }

    #[test]
    fn test_u2_expands_to_u() {
        let circuit = parse("OPENQASM 2.0; qreg q[1]; u2(0, pi) q[0];").unwrap();
        let op = &circuit.operations()[0];
        assert_eq!(op.name(), "u");
        assert_eq!(op.params().len(), 3);
        assert!((op.params()[0] - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_counts() {
        assert!(matches!(
            parse("OPENQASM 2.0; qreg q[2]; cx q[0];"),
            Err(ParseError::WrongQubitCount { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            parse("OPENQASM 2.0; qreg q[2]; rz q[0];"),
            Err(ParseError::WrongParameterCount { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn test_index_out_of_bounds() {
        assert!(matches!(
            parse("OPENQASM 2.0; qreg q[2]; x q[2];"),
            Err(ParseError::IndexOutOfBounds { index: 2, size: 2, .. })
        ));
    }

    #[test]
    fn test_mixed_addressing_rejected() {
        assert!(matches!(
            parse("OPENQASM 3.0; qubit[2] q; x $0;"),
            Err(ParseError::MixedQubitAddressing)
        ));
    }

    #[test]
    fn test_duplicate_register() {
        assert!(matches!(
            parse("OPENQASM 2.0; qreg q[2]; creg q[2];"),
            Err(ParseError::DuplicateDeclaration(_))
        ));
    }

    #[test]
    fn test_gate_after_measure_is_rejected() {
        let err = parse("OPENQASM 2.0; qreg q[1]; creg c[1]; measure q[0] -> c[0]; x q[0];")
            .unwrap_err();
        assert!(matches!(err, ParseError::CircuitError(_)));
    }

    #[test]
    fn test_physical_register_grows_to_highest_index() {
        let circuit = parse("OPENQASM 3.0; bit[1] c; x $3; c[0] = measure $3;").unwrap();
        assert_eq!(circuit.num_qubits(), 4);
    }
}
