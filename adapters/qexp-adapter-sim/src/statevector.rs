//! Statevector simulation engine.
//!
//! Basis index bit `k` holds qubit `k`, so qubit 0 is the least
//! significant bit of an amplitude index.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use num_complex::Complex64;
use rustc_hash::FxHashMap;

use qexp_hal::{HalError, HalResult};
use qexp_ir::{Operation, StandardGate};

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A pure state over `num_qubits` qubits.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Amplitude of a basis state.
    pub fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes.get(index).copied().unwrap_or(ZERO)
    }

    /// Apply one operation. Barriers leave the state untouched.
    pub fn apply(&mut self, op: &Operation) -> HalResult<()> {
        if op.is_barrier() {
            return Ok(());
        }
        let gate = op
            .standard()
            .ok_or_else(|| HalError::InvalidCircuit(format!("unknown gate '{}'", op.name())))?;
        let qubits: Vec<usize> = op.targets().iter().map(|q| q.index()).collect();
        if let Some(q) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(HalError::InvalidCircuit(format!(
                "qubit {q} outside a {}-qubit state",
                self.num_qubits
            )));
        }

        match (gate, qubits.as_slice()) {
            (StandardGate::Swap, [a, b]) => self.apply_swap(*a, *b),
            (StandardGate::CSwap, [c, a, b]) => self.apply_swap_masked(*a, *b, 1 << c),
            (StandardGate::RZZ, [a, b]) => {
                let theta = param(op, 0)?;
                self.apply_rzz(*a, *b, theta);
            }
            (StandardGate::CCX, [c1, c2, t]) => {
                let m = matrix(StandardGate::X, &[])?;
                self.apply_1q_masked(*t, &m, (1 << c1) | (1 << c2));
            }
            (StandardGate::CX | StandardGate::CY | StandardGate::CZ | StandardGate::CH, [c, t]) => {
                let base = match gate {
                    StandardGate::CX => StandardGate::X,
                    StandardGate::CY => StandardGate::Y,
                    StandardGate::CZ => StandardGate::Z,
                    _ => StandardGate::H,
                };
                let m = matrix(base, &[])?;
                self.apply_1q_masked(*t, &m, 1 << c);
            }
            (StandardGate::CRz | StandardGate::CP, [c, t]) => {
                let base = if gate == StandardGate::CRz {
                    StandardGate::Rz
                } else {
                    StandardGate::P
                };
                let m = matrix(base, op.params())?;
                self.apply_1q_masked(*t, &m, 1 << c);
            }
            (_, [q]) => {
                let m = matrix(gate, op.params())?;
                self.apply_1q_masked(*q, &m, 0);
            }
            _ => {
                return Err(HalError::InvalidCircuit(format!(
                    "gate '{}' applied to {} qubits",
                    op.name(),
                    qubits.len()
                )));
            }
        }
        Ok(())
    }

    /// Apply a 2x2 matrix to `target` on the subspace where every bit of
    /// `controls` is set.
    fn apply_1q_masked(&mut self, target: usize, m: &Matrix2, controls: usize) {
        let tgt = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt == 0 && i & controls == controls {
                let j = i | tgt;
                let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_swap(&mut self, a: usize, b: usize) {
        self.apply_swap_masked(a, b, 0);
    }

    fn apply_swap_masked(&mut self, a: usize, b: usize, controls: usize) {
        let (ma, mb) = (1 << a, 1 << b);
        for i in 0..self.amplitudes.len() {
            if i & ma != 0 && i & mb == 0 && i & controls == controls {
                self.amplitudes.swap(i, (i & !ma) | mb);
            }
        }
    }

    fn apply_rzz(&mut self, a: usize, b: usize, theta: f64) {
        let same = Complex64::from_polar(1.0, -theta / 2.0);
        let differ = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let parity = ((i >> a) ^ (i >> b)) & 1;
            *amp *= if parity == 0 { same } else { differ };
        }
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Distribution of the qubits selected by `mask`, keyed by
    /// `index & mask`. Zero-probability entries are dropped.
    pub fn marginal(&self, mask: usize) -> FxHashMap<usize, f64> {
        let mut dist: FxHashMap<usize, f64> = FxHashMap::default();
        for (i, p) in self.probabilities().into_iter().enumerate() {
            if p > 0.0 {
                *dist.entry(i & mask).or_insert(0.0) += p;
            }
        }
        dist
    }
}

fn param(op: &Operation, index: usize) -> HalResult<f64> {
    op.params().get(index).copied().ok_or_else(|| {
        HalError::InvalidCircuit(format!("gate '{}' is missing parameter {index}", op.name()))
    })
}

/// Unitary of a single-qubit standard gate.
fn matrix(gate: StandardGate, params: &[f64]) -> HalResult<Matrix2> {
    let rz = |theta: f64| {
        [
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ]
    };
    let phase = |lambda: f64| [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, lambda)]];
    let rx = |theta: f64| {
        let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
        [
            [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
            [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
        ]
    };
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    let half = |re: f64, im: f64| Complex64::new(re / 2.0, im / 2.0);

    let m = match (gate, params) {
        (StandardGate::I, []) => [[ONE, ZERO], [ZERO, ONE]],
        (StandardGate::X, []) => [[ZERO, ONE], [ONE, ZERO]],
        (StandardGate::Y, []) => [[ZERO, -I], [I, ZERO]],
        (StandardGate::Z, []) => [[ONE, ZERO], [ZERO, -ONE]],
        (StandardGate::H, []) => [[h, h], [h, -h]],
        (StandardGate::S, []) => phase(FRAC_PI_2),
        (StandardGate::Sdg, []) => phase(-FRAC_PI_2),
        (StandardGate::T, []) => phase(FRAC_PI_4),
        (StandardGate::Tdg, []) => phase(-FRAC_PI_4),
        (StandardGate::SX, []) => [[half(1.0, 1.0), half(1.0, -1.0)], [half(1.0, -1.0), half(1.0, 1.0)]],
        (StandardGate::SXdg, []) => [[half(1.0, -1.0), half(1.0, 1.0)], [half(1.0, 1.0), half(1.0, -1.0)]],
        (StandardGate::Rx, [theta]) => rx(*theta),
        (StandardGate::Ry, [theta]) => {
            let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
            [
                [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
            ]
        }
        (StandardGate::Rz, [theta]) => rz(*theta),
        (StandardGate::P, [lambda]) => phase(*lambda),
        (StandardGate::U, [theta, phi, lambda]) => {
            let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
            [
                [Complex64::new(c, 0.0), -Complex64::from_polar(s, *lambda)],
                [
                    Complex64::from_polar(s, *phi),
                    Complex64::from_polar(c, phi + lambda),
                ],
            ]
        }
        _ => {
            return Err(HalError::InvalidCircuit(format!(
                "gate '{gate}' with {} parameters is not a single-qubit gate",
                params.len()
            )));
        }
    };
    Ok(m)
}
