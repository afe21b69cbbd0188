use std::fmt;

use crate::value::Value;

/// One of the four fixed registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    Ax,
    Bx,
    Cx,
    Dx,
}

impl Register {
    /// Parse a register name. Matching is exact membership in the fixed
    /// set, never a substring test, so a literal that merely contains an
    /// `X` is not misread as a register.
    pub fn parse(token: &str) -> Option<Register> {
        match token {
            "AX" => Some(Register::Ax),
            "BX" => Some(Register::Bx),
            "CX" => Some(Register::Cx),
            "DX" => Some(Register::Dx),
            _ => None,
        }
    }

    /// The source-text register name.
    pub fn as_str(self) -> &'static str {
        match self {
            Register::Ax => "AX",
            Register::Bx => "BX",
            Register::Cx => "CX",
            Register::Dx => "DX",
        }
    }

    fn index(self) -> usize {
        match self {
            Register::Ax => 0,
            Register::Bx => 1,
            Register::Cx => 2,
            Register::Dx => 3,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four-slot register file.
///
/// Register contents persist across `load_program` calls; only an explicit
/// `MOV` overwrites a slot. All slots start at integer zero.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterFile {
    slots: [Value; 4],
}

impl RegisterFile {
    /// Create a register file with all slots set to `Int(0)`.
    pub fn new() -> Self {
        Self {
            slots: [Value::Int(0), Value::Int(0), Value::Int(0), Value::Int(0)],
        }
    }

    /// Read a register.
    pub fn get(&self, reg: Register) -> &Value {
        &self.slots[reg.index()]
    }

    /// Overwrite a register.
    pub fn set(&mut self, reg: Register, value: Value) {
        self.slots[reg.index()] = value;
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
