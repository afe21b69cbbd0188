//! Instruction parser.
//!
//! Each program line is parsed independently: the first whitespace-delimited
//! token names the opcode and the remaining tokens are its raw operands. A
//! first token ending in `:` is a label declaration and parses to the
//! synthetic `LABEL` opcode with the stripped name as its sole operand.

use smallvec::SmallVec;

use crate::error::RuntimeError;
use crate::opcode::Opcode;

/// Operand tokens of a single instruction. Almost every instruction has
/// zero or one operand; `STR` is the only multi-token consumer.
pub type Operands = SmallVec<[String; 2]>;

/// A decoded program line: an opcode plus its raw operand tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Operands,
}

impl Instruction {
    /// Get an operand token by position.
    pub fn operand(&self, index: usize) -> Option<&str> {
        self.operands.get(index).map(String::as_str)
    }

    /// Get a required operand, or the error for its absence.
    pub fn required_operand(&self, index: usize) -> Result<&str, RuntimeError> {
        self.operand(index).ok_or(RuntimeError::MissingOperand {
            opcode: self.opcode,
        })
    }
}

/// Parse one raw program line.
///
/// Pure function of the line text. Blank lines parse as `NOP` so that line
/// indices, and with them label targets, stay stable.
pub fn parse_line(line: &str) -> Result<Instruction, RuntimeError> {
    let mut tokens = line.split_whitespace();

    let Some(first) = tokens.next() else {
        return Ok(Instruction {
            opcode: Opcode::Nop,
            operands: Operands::new(),
        });
    };

    if let Some(opcode) = Opcode::parse(first) {
        return Ok(Instruction {
            opcode,
            operands: tokens.map(String::from).collect(),
        });
    }

    if let Some(name) = first.strip_suffix(':') {
        let mut operands = Operands::new();
        operands.push(name.to_string());
        return Ok(Instruction {
            opcode: Opcode::Label,
            operands,
        });
    }

    Err(RuntimeError::UnknownOpcode(first.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_with_operand() {
        let instr = parse_line("PUSH 10").unwrap();
        assert_eq!(instr.opcode, Opcode::Push);
        assert_eq!(instr.operand(0), Some("10"));
        assert_eq!(instr.operand(1), None);
    }

    #[test]
    fn instruction_without_operand() {
        let instr = parse_line("ADD").unwrap();
        assert_eq!(instr.opcode, Opcode::Add);
        assert!(instr.operands.is_empty());
    }

    #[test]
    fn multi_token_operands() {
        let instr = parse_line("STR \"HELLO\" WORLD").unwrap();
        assert_eq!(instr.opcode, Opcode::Str);
        assert_eq!(instr.operands.as_slice(), ["\"HELLO\"", "WORLD"]);
    }

    #[test]
    fn label_declaration() {
        let instr = parse_line("LOOP:").unwrap();
        assert_eq!(instr.opcode, Opcode::Label);
        assert_eq!(instr.operand(0), Some("LOOP"));
    }

    #[test]
    fn unknown_opcode() {
        let err = parse_line("FROB 1").unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownOpcode(ref t) if t == "FROB"));
    }

    #[test]
    fn blank_line_is_nop() {
        let instr = parse_line("   ").unwrap();
        assert_eq!(instr.opcode, Opcode::Nop);
        assert!(instr.operands.is_empty());
    }

    #[test]
    fn extra_whitespace_is_tolerated() {
        let instr = parse_line("  PUSH    42  ").unwrap();
        assert_eq!(instr.opcode, Opcode::Push);
        assert_eq!(instr.operand(0), Some("42"));
    }

    #[test]
    fn required_operand_error_names_opcode() {
        let instr = parse_line("JMP").unwrap();
        let err = instr.required_operand(0).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::MissingOperand {
                opcode: Opcode::Jmp
            }
        ));
    }
}
