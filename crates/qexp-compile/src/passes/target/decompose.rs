//! Decomposition rules for standard gates.
//!
//! Each rule rewrites one gate into a short sequence, listed in circuit
//! order, that is equal to it up to a global phase. Rules may produce gates
//! that are themselves outside the basis; the translation pass recurses on
//! them.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use qexp_ir::{Operation, QubitId, StandardGate};

use crate::property::BasisGates;

fn rz(angle: f64, q: QubitId) -> Operation {
    Operation::rotation(StandardGate::Rz, angle, q)
}

fn p(angle: f64, q: QubitId) -> Operation {
    Operation::rotation(StandardGate::P, angle, q)
}

fn one(gate: StandardGate, q: QubitId) -> Operation {
    Operation::single(gate, q)
}

fn cx(control: QubitId, target: QubitId) -> Operation {
    Operation::two(StandardGate::CX, control, target)
}

/// Rewrite one standard gate application.
///
/// Returns `None` when the gate is primitive (no rule) or the operands do
/// not match the gate's arity.
pub(crate) fn decompose(
    gate: StandardGate,
    targets: &[QubitId],
    params: &[f64],
    basis: &BasisGates,
) -> Option<Vec<Operation>> {
    use StandardGate as G;

    let ops = match (gate, targets, params) {
        (G::I, [_], []) => vec![],
        (G::X, [q], []) => {
            if basis.contains("sx") {
                vec![one(G::SX, *q), one(G::SX, *q)]
            } else {
                vec![Operation::rotation(G::Rx, PI, *q)]
            }
        }
        (G::Y, [q], []) => vec![rz(PI, *q), one(G::X, *q)],
        (G::Z, [q], []) => vec![rz(PI, *q)],
        (G::S, [q], []) => vec![rz(FRAC_PI_2, *q)],
        (G::Sdg, [q], []) => vec![rz(-FRAC_PI_2, *q)],
        (G::T, [q], []) => vec![rz(FRAC_PI_4, *q)],
        (G::Tdg, [q], []) => vec![rz(-FRAC_PI_4, *q)],
        (G::P, [q], [lambda]) => vec![rz(*lambda, *q)],
        (G::H, [q], []) => vec![rz(FRAC_PI_2, *q), one(G::SX, *q), rz(FRAC_PI_2, *q)],
        (G::SX, [q], []) => vec![Operation::rotation(G::Rx, FRAC_PI_2, *q)],
        (G::SXdg, [q], []) => vec![rz(PI, *q), one(G::SX, *q), rz(PI, *q)],
        (G::Rx, [q], [theta]) => vec![one(G::H, *q), rz(*theta, *q), one(G::H, *q)],
        (G::Ry, [q], [theta]) => vec![
            rz(-FRAC_PI_2, *q),
            Operation::rotation(G::Rx, *theta, *q),
            rz(FRAC_PI_2, *q),
        ],
        (G::U, [q], [theta, phi, lambda]) => vec![
            rz(*lambda, *q),
            Operation::rotation(G::Ry, *theta, *q),
            rz(*phi, *q),
        ],
        (G::CX, [c, t], []) => vec![one(G::H, *t), Operation::two(G::CZ, *c, *t), one(G::H, *t)],
        (G::CZ, [c, t], []) => vec![one(G::H, *t), cx(*c, *t), one(G::H, *t)],
        (G::CY, [c, t], []) => vec![one(G::Sdg, *t), cx(*c, *t), one(G::S, *t)],
        (G::CH, [c, t], []) => vec![
            one(G::S, *t),
            one(G::H, *t),
            one(G::T, *t),
            cx(*c, *t),
            one(G::Tdg, *t),
            one(G::H, *t),
            one(G::Sdg, *t),
        ],
        (G::Swap, [a, b], []) => vec![cx(*a, *b), cx(*b, *a), cx(*a, *b)],
        (G::RZZ, [a, b], [theta]) => vec![cx(*a, *b), rz(*theta, *b), cx(*a, *b)],
        (G::CRz, [c, t], [theta]) => vec![
            rz(theta / 2.0, *t),
            cx(*c, *t),
            rz(-theta / 2.0, *t),
            cx(*c, *t),
        ],
        (G::CP, [c, t], [lambda]) => vec![
            p(lambda / 2.0, *c),
            cx(*c, *t),
            p(-lambda / 2.0, *t),
            cx(*c, *t),
            p(lambda / 2.0, *t),
        ],
        (G::CCX, [a, b, c], []) => vec![
            one(G::H, *c),
            cx(*b, *c),
            one(G::Tdg, *c),
            cx(*a, *c),
            one(G::T, *c),
            cx(*b, *c),
            one(G::Tdg, *c),
            cx(*a, *c),
            one(G::T, *b),
            one(G::T, *c),
            one(G::H, *c),
            cx(*a, *b),
            one(G::T, *a),
            one(G::Tdg, *b),
            cx(*a, *b),
        ],
        (G::CSwap, [c, a, b], []) => vec![
            cx(*b, *a),
            Operation::gate(G::CCX, [*c, *a, *b], []),
            cx(*b, *a),
        ],
        _ => return None,
    };
    Some(ops)
}
