//! `OpenQASM` parser and emitter for qexp
//!
//! Reads the OpenQASM 2.0 and 3.0 subset that hand-written experiment
//! circuits use and turns it into a [`qexp_ir::CircuitDescription`]. The
//! transcription is faithful: operations keep their source order, and
//! explicit `id` gates and barriers stay in the operation list.
//!
//! # Supported Features
//!
//! | Feature | Example |
//! |---------|---------|
//! | Version declaration | `OPENQASM 2.0;`, `OPENQASM 3.0;` |
//! | QASM 2 registers | `qreg q[2]; creg c[2];` |
//! | QASM 3 registers | `qubit[2] q; bit[2] c;` |
//! | Physical qubits | `cz $0, $1;` |
//! | Parameterized gates | `rz(-3*pi/5) q[0];` |
//! | Measurements | `measure q[0] -> c[0];`, `c[0] = measure $0;` |
//! | Barriers | `barrier q;`, `barrier;` |
//!
//! # Example
//!
//! ```rust
//! use qexp_qasm::{emit, parse};
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     id q[1];
//!     measure q[0] -> c[0];
//!     measure q[1] -> c[1];
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_ops(), 3);
//!
//! let emitted = emit(&circuit);
//! assert!(emitted.contains("id q[1];"));
//! ```
//!
//! Gate names outside the standard library are kept as opaque operations;
//! whether a backend can run them is decided during lowering.

mod ast;
mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_ast, parse_named};

/// Syntax tree types, for callers that inspect a program before lowering.
pub mod syntax {
    pub use crate::ast::*;
}
