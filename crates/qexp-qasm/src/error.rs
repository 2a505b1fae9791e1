//! Parse failures.

use thiserror::Error;

/// Why a program was rejected. Line numbers are 1-based.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("line {line}: {message}")]
    LexerError { line: usize, message: String },

    #[error("line {line}: expected {expected} but found `{found}`")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("input ended early: {0}")]
    UnexpectedEof(String),

    #[error("unsupported OPENQASM version {0}")]
    InvalidVersion(String),

    #[error("`{0}` is not declared")]
    UndefinedIdentifier(String),

    #[error("`{0}` is declared twice")]
    DuplicateDeclaration(String),

    /// The program declares no qubits and uses no physical qubits.
    #[error("register size unknown: the program names no qubits")]
    NoQubits,

    /// Physical (`$n`) and declared qubits used in one program.
    #[error("physical qubits ($n) and declared registers cannot be mixed")]
    MixedQubitAddressing,

    #[error("`{gate}` acts on {expected} qubit(s), {got} given")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    #[error("`{gate}` takes {expected} parameter(s), {got} given")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Register arguments of different sizes in one broadcast.
    #[error("`{0}` broadcasts over registers of different sizes")]
    BroadcastMismatch(String),

    #[error("{register}[{index}] is out of range (size {size})")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// Language feature outside the supported subset.
    #[error("`{0}` is outside the supported subset")]
    Unsupported(String),

    /// The parsed program breaks a circuit invariant.
    #[error(transparent)]
    CircuitError(#[from] qexp_ir::IrError),

    #[error("{0}")]
    Generic(String),
}

/// Result alias for parsing.
pub type ParseResult<T> = Result<T, ParseError>;
