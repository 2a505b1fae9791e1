//! Standard gate table.
//!
//! Operations carry their gate by name. This table gives names their known
//! semantics: arity, parameter count, and the aliases accepted by the
//! OpenQASM 2 and 3 standard libraries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Phase gate.
    P,
    /// Universal single-qubit gate U(θ, φ, λ).
    U,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around Z.
    CRz,
    /// Controlled phase gate.
    CP,
    /// ZZ rotation gate.
    RZZ,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Every standard gate, in table order.
    pub const ALL: [StandardGate; 26] = [
        StandardGate::I,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
        StandardGate::SX,
        StandardGate::SXdg,
        StandardGate::Rx,
        StandardGate::Ry,
        StandardGate::Rz,
        StandardGate::P,
        StandardGate::U,
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::CRz,
        StandardGate::CP,
        StandardGate::RZZ,
        StandardGate::CCX,
        StandardGate::CSwap,
    ];

    /// Canonical (OpenQASM 3 `stdgates.inc`) name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx => "rx",
            StandardGate::Ry => "ry",
            StandardGate::Rz => "rz",
            StandardGate::P => "p",
            StandardGate::U => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRz => "crz",
            StandardGate::CP => "cp",
            StandardGate::RZZ => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Look up a gate by canonical name or by a QASM 2 / QASM 3 alias.
    pub fn from_name(name: &str) -> Option<Self> {
        let gate = match name {
            "id" | "i" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "sx" => StandardGate::SX,
            "sxdg" => StandardGate::SXdg,
            "rx" => StandardGate::Rx,
            "ry" => StandardGate::Ry,
            "rz" => StandardGate::Rz,
            "p" | "phase" | "u1" => StandardGate::P,
            "u" | "u3" | "U" => StandardGate::U,
            "cx" | "cnot" | "CX" => StandardGate::CX,
            "cy" => StandardGate::CY,
            "cz" => StandardGate::CZ,
            "ch" => StandardGate::CH,
            "swap" => StandardGate::Swap,
            "crz" => StandardGate::CRz,
            "cp" | "cphase" | "cu1" => StandardGate::CP,
            "rzz" => StandardGate::RZZ,
            "ccx" | "toffoli" => StandardGate::CCX,
            "cswap" | "fredkin" => StandardGate::CSwap,
            _ => return None,
        };
        Some(gate)
    }

    /// Number of qubits this gate acts on.
    #[inline]
    pub fn num_qubits(self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::P
            | StandardGate::U => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRz
            | StandardGate::CP
            | StandardGate::RZZ => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Number of real parameters this gate takes.
    #[inline]
    pub fn num_params(self) -> u32 {
        match self {
            StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::P
            | StandardGate::CRz
            | StandardGate::CP
            | StandardGate::RZZ => 1,
            StandardGate::U => 3,
            _ => 0,
        }
    }

    /// Whether applying this gate twice in a row is the identity.
    pub fn is_self_inverse(self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CX
                | StandardGate::CY
                | StandardGate::CZ
                | StandardGate::CH
                | StandardGate::Swap
                | StandardGate::CCX
                | StandardGate::CSwap
        )
    }

    /// The gate that undoes this one when it is parameter-free, if any.
    pub fn inverse(self) -> Option<Self> {
        match self {
            StandardGate::S => Some(StandardGate::Sdg),
            StandardGate::Sdg => Some(StandardGate::S),
            StandardGate::T => Some(StandardGate::Tdg),
            StandardGate::Tdg => Some(StandardGate::T),
            StandardGate::SX => Some(StandardGate::SXdg),
            StandardGate::SXdg => Some(StandardGate::SX),
            g if g.is_self_inverse() => Some(g),
            _ => None,
        }
    }

    /// Whether this gate is a single-parameter rotation whose angles add up
    /// when two instances follow each other on the same qubits.
    pub fn is_additive_rotation(self) -> bool {
        matches!(
            self,
            StandardGate::Rx
                | StandardGate::Ry
                | StandardGate::Rz
                | StandardGate::P
                | StandardGate::CRz
                | StandardGate::CP
                | StandardGate::RZZ
        )
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
