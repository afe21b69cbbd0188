//! Fetch-decode-execute loop and opcode handlers.
//!
//! Each step parses the line at the instruction pointer, dispatches on the
//! opcode, then unconditionally advances the instruction pointer and the
//! cycle counter. Jump handlers overwrite the instruction pointer directly;
//! the increment that follows means a jump to label index L resumes at line
//! L+1, skipping the label-declaration line itself.
//!
//! `HALT` is a no-op: programs terminate only by running off the end of the
//! program or by exhausting the cycle bound.

use std::cmp::Ordering;
use std::io::Write;

use crate::error::RuntimeError;
use crate::machine::Machine;
use crate::opcode::Opcode;
use crate::parse::{parse_line, Instruction};
use crate::register::Register;
use crate::value::Value;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The instruction pointer ran past the end of the program.
    Completed,
    /// The cycle bound was exhausted first.
    CycleLimit,
}

/// A numeric operand. `pop_number` rejects strings before handlers see one.
#[derive(Clone, Copy, Debug)]
enum Num {
    Int(i64),
    Real(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(v) => v as f64,
            Num::Real(v) => v,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(v) => v == 0,
            Num::Real(v) => v == 0.0,
        }
    }
}

impl<W: Write> Machine<W> {
    /// Run the loaded program to completion or to the cycle bound.
    ///
    /// Any handler failure is fatal: the run stops at the failed
    /// instruction and the machine keeps its partial state for inspection.
    pub fn run(&mut self) -> Result<Outcome, RuntimeError> {
        while self.cycle < self.cycle_limit {
            if self.ip >= self.program.len() {
                log::debug!("completed after {} cycles", self.cycle);
                return Ok(Outcome::Completed);
            }
            let instr = parse_line(&self.program[self.ip])?;
            log::trace!(
                "cycle {} ip {}: {} {:?}",
                self.cycle,
                self.ip,
                instr.opcode,
                instr.operands
            );
            self.execute(&instr)?;
            self.ip += 1;
            self.cycle += 1;
        }
        log::debug!("cycle bound of {} exhausted", self.cycle_limit);
        Ok(Outcome::CycleLimit)
    }

    fn execute(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        match instr.opcode {
            Opcode::Add => self.binary_numeric(Opcode::Add, i64::wrapping_add, |x, y| x + y),
            Opcode::Sub => self.binary_numeric(Opcode::Sub, i64::wrapping_sub, |x, y| x - y),
            Opcode::Mul => self.binary_numeric(Opcode::Mul, i64::wrapping_mul, |x, y| x * y),
            Opcode::Div => self.binary_division(Opcode::Div, floor_div, |x, y| (x / y).floor()),
            Opcode::Mod => self.binary_division(Opcode::Mod, floor_mod, |x, y| {
                x - y * (x / y).floor()
            }),
            Opcode::Cmp => self.compare(),
            Opcode::Inc => self.unary_numeric(Opcode::Inc, |x| x.wrapping_add(1), |x| x + 1.0),
            Opcode::Dec => self.unary_numeric(Opcode::Dec, |x| x.wrapping_sub(1), |x| x - 1.0),
            Opcode::Sqrt => self.sqrt(),
            Opcode::Dup => self.stack.dup().map_err(RuntimeError::from),
            Opcode::Swap => self.stack.swap().map_err(RuntimeError::from),
            Opcode::Pop => {
                self.stack.pop()?;
                Ok(())
            }
            Opcode::Cycle => {
                self.stack.push(Value::Int(self.cycle as i64));
                Ok(())
            }
            Opcode::Push => self.push_operand(instr),
            Opcode::Mov => self.mov(instr),
            Opcode::Str => self.make_string(instr),
            Opcode::Print => self.print(instr),
            Opcode::Jmp => {
                self.ip = self.resolve_label(instr)?;
                Ok(())
            }
            Opcode::Jg => self.conditional_jump(instr, |n| n == 1.0),
            Opcode::Jl => self.conditional_jump(instr, |n| n == -1.0),
            Opcode::Jz => self.conditional_jump(instr, |n| n == 0.0),
            Opcode::Jnz => self.conditional_jump(instr, |n| n != 0.0),
            Opcode::Label | Opcode::Nop | Opcode::Halt => Ok(()),
        }
    }

    /// Pop a value that must be numeric.
    fn pop_number(&mut self, op: Opcode) -> Result<Num, RuntimeError> {
        match self.stack.pop()? {
            Value::Int(v) => Ok(Num::Int(v)),
            Value::Real(v) => Ok(Num::Real(v)),
            other => Err(RuntimeError::TypeMismatch {
                op,
                got: other.type_name(),
            }),
        }
    }

    /// Binary arithmetic: pop b, then a, push `a OP b`. Integer pairs stay
    /// integer; any real operand promotes the operation to reals.
    fn binary_numeric<Fi, Fr>(&mut self, op: Opcode, int_op: Fi, real_op: Fr) -> Result<(), RuntimeError>
    where
        Fi: FnOnce(i64, i64) -> i64,
        Fr: FnOnce(f64, f64) -> f64,
    {
        let b = self.pop_number(op)?;
        let a = self.pop_number(op)?;
        let result = match (a, b) {
            (Num::Int(x), Num::Int(y)) => Value::Int(int_op(x, y)),
            (a, b) => Value::Real(real_op(a.as_f64(), b.as_f64())),
        };
        self.stack.push(result);
        Ok(())
    }

    /// DIV and MOD share the divisor-of-zero check and floor semantics.
    fn binary_division<Fi, Fr>(&mut self, op: Opcode, int_op: Fi, real_op: Fr) -> Result<(), RuntimeError>
    where
        Fi: FnOnce(i64, i64) -> i64,
        Fr: FnOnce(f64, f64) -> f64,
    {
        let b = self.pop_number(op)?;
        let a = self.pop_number(op)?;
        if b.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        let result = match (a, b) {
            (Num::Int(x), Num::Int(y)) => Value::Int(int_op(x, y)),
            (a, b) => Value::Real(real_op(a.as_f64(), b.as_f64())),
        };
        self.stack.push(result);
        Ok(())
    }

    /// CMP: push the sign of `a - b` as -1, 0, or 1.
    fn compare(&mut self) -> Result<(), RuntimeError> {
        let b = self.pop_number(Opcode::Cmp)?;
        let a = self.pop_number(Opcode::Cmp)?;
        let ordering = match (a, b) {
            (Num::Int(x), Num::Int(y)) => x.cmp(&y),
            (a, b) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
        };
        let sentinel = match ordering {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
        self.stack.push(Value::Int(sentinel));
        Ok(())
    }

    fn unary_numeric<Fi, Fr>(&mut self, op: Opcode, int_op: Fi, real_op: Fr) -> Result<(), RuntimeError>
    where
        Fi: FnOnce(i64) -> i64,
        Fr: FnOnce(f64) -> f64,
    {
        let result = match self.pop_number(op)? {
            Num::Int(x) => Value::Int(int_op(x)),
            Num::Real(x) => Value::Real(real_op(x)),
        };
        self.stack.push(result);
        Ok(())
    }

    fn sqrt(&mut self) -> Result<(), RuntimeError> {
        let n = self.pop_number(Opcode::Sqrt)?.as_f64();
        if n < 0.0 {
            return Err(RuntimeError::Domain(n));
        }
        self.stack.push(Value::Real(n.sqrt()));
        Ok(())
    }

    /// PUSH: a register name pushes that register's current value, anything
    /// else must be an integer literal.
    fn push_operand(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let token = instr.required_operand(0)?;
        let value = match Register::parse(token) {
            Some(reg) => self.registers.get(reg).clone(),
            None => {
                let literal: i64 = token
                    .parse()
                    .map_err(|_| RuntimeError::InvalidLiteral(token.to_string()))?;
                Value::Int(literal)
            }
        };
        self.stack.push(value);
        Ok(())
    }

    /// MOV: copy (not pop) the stack top into a register. The register name
    /// is validated before the stack is read.
    fn mov(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let name = instr.required_operand(0)?;
        let reg = Register::parse(name)
            .ok_or_else(|| RuntimeError::UnknownRegister(name.to_string()))?;
        let value = self.stack.top()?.clone();
        self.registers.set(reg, value);
        Ok(())
    }

    /// STR: join the operand tokens with single spaces; an outer pair of
    /// double quotes around the joined text is removed.
    fn make_string(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let joined = instr.operands.join(" ");
        let text = joined
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(&joined);
        self.stack.push(Value::string(text));
        Ok(())
    }

    /// PRN: pop and emit. No operand ends the line; a `,` operand appends a
    /// single space instead; a `;` operand appends nothing.
    fn print(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let value = self.stack.pop()?;
        match instr.operand(0) {
            Some(sep) if sep.contains(',') => write!(self.out, "{} ", value)?,
            Some(sep) if sep.contains(';') => write!(self.out, "{}", value)?,
            _ => writeln!(self.out, "{}", value)?,
        }
        Ok(())
    }

    fn resolve_label(&self, instr: &Instruction) -> Result<usize, RuntimeError> {
        let name = instr.required_operand(0)?;
        self.label(name)
            .ok_or_else(|| RuntimeError::UnknownLabel(name.to_string()))
    }

    /// Conditional jumps always pop the test value; the label is resolved
    /// only when the jump is taken. The tests match the exact sentinels
    /// produced by CMP, not general sign ranges.
    fn conditional_jump<F>(&mut self, instr: &Instruction, test: F) -> Result<(), RuntimeError>
    where
        F: FnOnce(f64) -> bool,
    {
        let n = self.pop_number(instr.opcode)?.as_f64();
        if test(n) {
            self.ip = self.resolve_label(instr)?;
        }
        Ok(())
    }
}

/// Integer division truncating toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Remainder with the sign convention of floor division (sign of divisor).
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::StackError;

    fn machine_with(lines: &[&str]) -> Machine<Vec<u8>> {
        let mut machine = Machine::with_output(Vec::new());
        machine.load_program(lines.iter().copied());
        machine
    }

    fn run(lines: &[&str]) -> Machine<Vec<u8>> {
        let mut machine = machine_with(lines);
        machine.run().unwrap();
        machine
    }

    fn run_err(lines: &[&str]) -> RuntimeError {
        let mut machine = machine_with(lines);
        machine.run().unwrap_err()
    }

    #[test]
    fn floor_div_truncates_toward_negative_infinity() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(floor_div(6, 3), 2);
        assert_eq!(floor_div(-6, 3), -2);
    }

    #[test]
    fn floor_mod_takes_divisor_sign() {
        assert_eq!(floor_mod(7, 3), 1);
        assert_eq!(floor_mod(-7, 3), 2);
        assert_eq!(floor_mod(7, -3), -2);
        assert_eq!(floor_mod(-7, -3), -1);
        assert_eq!(floor_mod(6, 3), 0);
    }

    #[test]
    fn floor_identity_holds() {
        for a in -20i64..=20 {
            for b in [-7i64, -3, -1, 1, 2, 5] {
                assert_eq!(floor_div(a, b) * b + floor_mod(a, b), a, "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn operands_pop_b_then_a() {
        let machine = run(&["PUSH 10", "PUSH 3", "SUB"]);
        assert_eq!(machine.stack(), &[Value::Int(7)]);
    }

    #[test]
    fn mixed_arithmetic_promotes_to_real() {
        let machine = run(&["PUSH 9", "SQRT", "PUSH 1", "ADD"]);
        assert_eq!(machine.stack(), &[Value::Real(4.0)]);
    }

    #[test]
    fn div_by_zero() {
        assert!(matches!(
            run_err(&["PUSH 10", "PUSH 0", "DIV"]),
            RuntimeError::DivisionByZero
        ));
        assert!(matches!(
            run_err(&["PUSH 10", "PUSH 0", "MOD"]),
            RuntimeError::DivisionByZero
        ));
    }

    #[test]
    fn cmp_pushes_sentinel() {
        assert_eq!(run(&["PUSH 1", "PUSH 2", "CMP"]).stack(), &[Value::Int(-1)]);
        assert_eq!(run(&["PUSH 2", "PUSH 2", "CMP"]).stack(), &[Value::Int(0)]);
        assert_eq!(run(&["PUSH 3", "PUSH 2", "CMP"]).stack(), &[Value::Int(1)]);
    }

    #[test]
    fn inc_dec() {
        assert_eq!(run(&["PUSH 5", "INC"]).stack(), &[Value::Int(6)]);
        assert_eq!(run(&["PUSH 5", "DEC"]).stack(), &[Value::Int(4)]);
    }

    #[test]
    fn sqrt_pushes_real() {
        let machine = run(&["PUSH 144", "SQRT"]);
        assert_eq!(machine.stack(), &[Value::Real(12.0)]);
    }

    #[test]
    fn sqrt_of_negative_is_domain_error() {
        assert!(matches!(
            run_err(&["PUSH 0", "PUSH 4", "SUB", "SQRT"]),
            RuntimeError::Domain(n) if n == -4.0
        ));
    }

    #[test]
    fn arithmetic_rejects_strings() {
        let err = run_err(&["PUSH 1", "STR X", "ADD"]);
        assert!(matches!(
            err,
            RuntimeError::TypeMismatch {
                op: Opcode::Add,
                got: "string"
            }
        ));
    }

    #[test]
    fn cycle_pushes_completed_count() {
        // CYCLE is the third instruction; two cycles completed before it.
        let machine = run(&["NOP", "NOP", "CYCLE"]);
        assert_eq!(machine.stack(), &[Value::Int(2)]);
    }

    #[test]
    fn push_register_and_literal() {
        let machine = run(&["PUSH -42", "MOV DX", "POP", "PUSH DX"]);
        assert_eq!(machine.stack(), &[Value::Int(-42)]);
    }

    #[test]
    fn push_invalid_literal() {
        assert!(matches!(
            run_err(&["PUSH 1X2"]),
            RuntimeError::InvalidLiteral(ref t) if t == "1X2"
        ));
    }

    #[test]
    fn push_without_operand() {
        assert!(matches!(
            run_err(&["PUSH"]),
            RuntimeError::MissingOperand {
                opcode: Opcode::Push
            }
        ));
    }

    #[test]
    fn mov_keeps_stack_top() {
        let machine = run(&["PUSH 9", "MOV CX"]);
        assert_eq!(machine.stack(), &[Value::Int(9)]);
        assert_eq!(machine.register(Register::Cx), &Value::Int(9));
    }

    #[test]
    fn mov_unknown_register_beats_underflow() {
        assert!(matches!(
            run_err(&["MOV EX"]),
            RuntimeError::UnknownRegister(ref n) if n == "EX"
        ));
        assert!(matches!(
            run_err(&["MOV AX"]),
            RuntimeError::Stack(StackError::Underflow)
        ));
    }

    #[test]
    fn str_joins_and_strips_quotes() {
        let machine = run(&["STR \"HELLO WORLD\""]);
        assert_eq!(machine.stack(), &[Value::string("HELLO WORLD")]);

        let machine = run(&["STR BARE TOKENS"]);
        assert_eq!(machine.stack(), &[Value::string("BARE TOKENS")]);
    }

    #[test]
    fn print_modes() {
        let machine = run(&["PUSH 1", "PRN"]);
        assert_eq!(machine.output(), b"1\n");

        let machine = run(&["PUSH 1", "PRN ,"]);
        assert_eq!(machine.output(), b"1 ");

        let machine = run(&["PUSH 1", "PRN ;"]);
        assert_eq!(machine.output(), b"1");
    }

    #[test]
    fn print_pops() {
        let machine = run(&["PUSH 1", "PUSH 2", "PRN"]);
        assert_eq!(machine.stack(), &[Value::Int(1)]);
    }

    #[test]
    fn jmp_lands_after_label() {
        // The jump target line (index 1) is skipped; execution resumes at
        // index 2, so only one PUSH runs.
        let machine = run(&["JMP SKIP", "SKIP:", "PUSH 1"]);
        assert_eq!(machine.stack(), &[Value::Int(1)]);
        assert_eq!(machine.cycle(), 2);
    }

    #[test]
    fn conditional_jumps_test_exact_sentinels() {
        // JG on 2 does not jump even though 2 > 0.
        let machine = run(&["PUSH 2", "JG END", "PUSH 7", "END:"]);
        assert_eq!(machine.stack(), &[Value::Int(7)]);

        let machine = run(&["PUSH 1", "JG END", "PUSH 7", "END:"]);
        assert_eq!(machine.stack(), &[] as &[Value]);

        let machine = run(&["PUSH -1", "JL END", "PUSH 7", "END:"]);
        assert_eq!(machine.stack(), &[] as &[Value]);

        let machine = run(&["PUSH 0", "JZ END", "PUSH 7", "END:"]);
        assert_eq!(machine.stack(), &[] as &[Value]);

        let machine = run(&["PUSH 5", "JNZ END", "PUSH 7", "END:"]);
        assert_eq!(machine.stack(), &[] as &[Value]);
    }

    #[test]
    fn conditional_jump_always_pops() {
        let machine = run(&["PUSH 0", "JG END", "END:"]);
        assert_eq!(machine.stack(), &[] as &[Value]);
    }

    #[test]
    fn untaken_jump_ignores_missing_label() {
        // Matches the label-resolution-on-demand semantics: the name is
        // looked up only when the jump fires.
        let machine = run(&["PUSH 0", "JG NOWHERE"]);
        assert_eq!(machine.stack(), &[] as &[Value]);
    }

    #[test]
    fn taken_jump_to_missing_label_fails() {
        assert!(matches!(
            run_err(&["JMP NOPE"]),
            RuntimeError::UnknownLabel(ref n) if n == "NOPE"
        ));
    }

    #[test]
    fn halt_is_a_no_op() {
        let machine = run(&["HALT", "PUSH 3"]);
        assert_eq!(machine.stack(), &[Value::Int(3)]);
        assert_eq!(machine.cycle(), 2);
    }

    #[test]
    fn cycle_limit_reported_distinctly() {
        let mut machine = machine_with(&["LOOP:", "JMP LOOP"]).with_cycle_limit(100);
        assert_eq!(machine.run().unwrap(), Outcome::CycleLimit);
        assert_eq!(machine.cycle(), 100);
    }
}
