//! SASM Virtual Machine
//!
//! This crate provides the execution engine for SASM, a minimal line-based
//! stack-machine language: each program line is either an instruction
//! (`OPCODE [operand ...]`) or a label declaration (`NAME:`).
//!
//! # Architecture
//!
//! The engine handles:
//! - Operand stack management with explicit underflow checks
//! - A fixed four-register file (AX, BX, CX, DX)
//! - Label resolution at load time
//! - The fetch-decode-execute loop, bounded by a cycle limit
//!
//! Programs are supplied as plain text lines; after a run the caller
//! inspects the operand stack and any text printed by `PRN`.
//!
//! # Example
//!
//! ```
//! use sasm_vm::{Machine, Outcome, Value};
//!
//! let mut machine = Machine::new();
//! machine.load_program(["PUSH 2", "PUSH 3", "MUL"]);
//! let outcome = machine.run().unwrap();
//!
//! assert_eq!(outcome, Outcome::Completed);
//! assert_eq!(machine.stack(), &[Value::Int(6)]);
//! ```

mod error;
mod execute;
mod machine;
mod opcode;
mod parse;
mod register;
mod stack;
mod value;

// Re-export public types
pub use error::RuntimeError;
pub use execute::Outcome;
pub use machine::{Machine, CYCLE_LIMIT};
pub use opcode::Opcode;
pub use parse::{parse_line, Instruction, Operands};
pub use register::{Register, RegisterFile};
pub use stack::{Stack, StackError};
pub use value::Value;
