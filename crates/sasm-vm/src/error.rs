use thiserror::Error;

use crate::opcode::Opcode;
use crate::stack::StackError;

/// Fatal errors raised during program execution.
///
/// Every variant aborts the run immediately; the engine never retries or
/// continues past a failed instruction. The caller may still inspect the
/// machine's partial stack and register state for diagnostics.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// First token of a line is neither a known mnemonic nor a label
    /// declaration.
    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),

    /// A jump referenced a name absent from the label table.
    #[error("unknown label: {0}")]
    UnknownLabel(String),

    /// An operation required more stack elements than were present.
    #[error(transparent)]
    Stack(#[from] StackError),

    /// DIV or MOD with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// SQRT of a negative value.
    #[error("square root of negative value: {0}")]
    Domain(f64),

    /// MOV/PUSH referenced a name outside the fixed register set.
    #[error("unknown register: {0}")]
    UnknownRegister(String),

    /// PUSH operand is neither a register name nor an integer literal.
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),

    /// Arithmetic or comparison applied to a non-numeric value.
    #[error("{op} is not defined for {got} values")]
    TypeMismatch { op: Opcode, got: &'static str },

    /// An opcode that requires an operand received none.
    #[error("{opcode} requires an operand")]
    MissingOperand { opcode: Opcode },

    /// Failure emitting PRN output.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
