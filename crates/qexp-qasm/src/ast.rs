//! Abstract syntax tree for the `OpenQASM` subset.

use serde::{Deserialize, Serialize};

/// A parsed program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Major language version (2 or 3).
    pub version: u32,
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

/// A statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    /// Include statement. The standard libraries are built in.
    Include(String),

    /// Qubit register: `qubit[n] q;`, `qubit q;` or `qreg q[n];`
    QubitDecl { name: String, size: u32 },

    /// Classical register: `bit[n] c;`, `bit c;` or `creg c[n];`
    BitDecl { name: String, size: u32 },

    /// Gate application.
    Gate(GateCall),

    /// Measurement: `measure q -> c;` or `c = measure q;`
    Measure {
        qubits: Vec<QubitRef>,
        bits: Vec<BitRef>,
    },

    /// Barrier: `barrier q;` or `barrier;`
    Barrier { qubits: Vec<QubitRef> },
}

/// A gate call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCall {
    /// Gate name as written.
    pub name: String,
    /// Gate parameters.
    pub params: Vec<Expression>,
    /// Qubit arguments.
    pub qubits: Vec<QubitRef>,
    /// Source line, for diagnostics.
    pub line: usize,
}

/// Reference to a qubit, a whole register, or a physical qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QubitRef {
    /// `q[i]`
    Indexed { register: String, index: u32 },
    /// `q`
    Register(String),
    /// `$i`
    Physical(u32),
}

/// Reference to a classical bit or a whole classical register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BitRef {
    /// `c[i]`
    Indexed { register: String, index: u32 },
    /// `c`
    Register(String),
}

/// Parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Int(u64),
    Float(f64),
    Pi,
    Tau,
    Euler,
    Identifier(String),
    Neg(Box<Expression>),
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    FnCall {
        name: String,
        args: Vec<Expression>,
    },
}

/// Binary operators allowed in parameter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}
