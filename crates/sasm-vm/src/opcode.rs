use std::fmt;

/// Instruction mnemonics recognized by the engine.
///
/// Mnemonic matching is case-sensitive and exact. `Label` never appears in
/// source text as a mnemonic; the parser synthesizes it for lines of the
/// form `NAME:`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Cmp,
    Cycle,
    Dec,
    Div,
    Dup,
    Halt,
    Inc,
    Jmp,
    Jg,
    Jl,
    Jnz,
    Jz,
    Label,
    Mod,
    Mov,
    Mul,
    Nop,
    Pop,
    Print,
    Push,
    Sqrt,
    Str,
    Sub,
    Swap,
}

impl Opcode {
    /// Every opcode, in mnemonic order (for catalogue listings).
    pub const ALL: [Opcode; 25] = [
        Opcode::Add,
        Opcode::Cmp,
        Opcode::Cycle,
        Opcode::Dec,
        Opcode::Div,
        Opcode::Dup,
        Opcode::Halt,
        Opcode::Inc,
        Opcode::Jmp,
        Opcode::Jg,
        Opcode::Jl,
        Opcode::Jnz,
        Opcode::Jz,
        Opcode::Label,
        Opcode::Mod,
        Opcode::Mov,
        Opcode::Mul,
        Opcode::Nop,
        Opcode::Pop,
        Opcode::Print,
        Opcode::Push,
        Opcode::Sqrt,
        Opcode::Str,
        Opcode::Sub,
        Opcode::Swap,
    ];

    /// Parse a mnemonic token. Returns `None` for anything outside the
    /// fixed vocabulary.
    pub fn parse(token: &str) -> Option<Opcode> {
        let op = match token {
            "ADD" => Opcode::Add,
            "CMP" => Opcode::Cmp,
            "CYCLE" => Opcode::Cycle,
            "DEC" => Opcode::Dec,
            "DIV" => Opcode::Div,
            "DUP" => Opcode::Dup,
            "HALT" => Opcode::Halt,
            "INC" => Opcode::Inc,
            "JMP" => Opcode::Jmp,
            "JG" => Opcode::Jg,
            "JL" => Opcode::Jl,
            "JNZ" => Opcode::Jnz,
            "JZ" => Opcode::Jz,
            "LABEL" => Opcode::Label,
            "MOD" => Opcode::Mod,
            "MOV" => Opcode::Mov,
            "MUL" => Opcode::Mul,
            "NOP" => Opcode::Nop,
            "POP" => Opcode::Pop,
            "PRN" => Opcode::Print,
            "PUSH" => Opcode::Push,
            "SQRT" => Opcode::Sqrt,
            "STR" => Opcode::Str,
            "SUB" => Opcode::Sub,
            "SWAP" => Opcode::Swap,
            _ => return None,
        };
        Some(op)
    }

    /// The source-text mnemonic.
    pub fn as_str(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Cmp => "CMP",
            Opcode::Cycle => "CYCLE",
            Opcode::Dec => "DEC",
            Opcode::Div => "DIV",
            Opcode::Dup => "DUP",
            Opcode::Halt => "HALT",
            Opcode::Inc => "INC",
            Opcode::Jmp => "JMP",
            Opcode::Jg => "JG",
            Opcode::Jl => "JL",
            Opcode::Jnz => "JNZ",
            Opcode::Jz => "JZ",
            Opcode::Label => "LABEL",
            Opcode::Mod => "MOD",
            Opcode::Mov => "MOV",
            Opcode::Mul => "MUL",
            Opcode::Nop => "NOP",
            Opcode::Pop => "POP",
            Opcode::Print => "PRN",
            Opcode::Push => "PUSH",
            Opcode::Sqrt => "SQRT",
            Opcode::Str => "STR",
            Opcode::Sub => "SUB",
            Opcode::Swap => "SWAP",
        }
    }

    /// One-line description for catalogue listings.
    pub fn description(self) -> &'static str {
        match self {
            Opcode::Add => "Add the top two values on the stack",
            Opcode::Cmp => "Compare the top two values on the stack",
            Opcode::Cycle => "Push the current cycle counter",
            Opcode::Dec => "Decrement the top value on the stack",
            Opcode::Div => "Divide the top two values on the stack",
            Opcode::Dup => "Duplicate the top value on the stack",
            Opcode::Halt => "Halt program execution",
            Opcode::Inc => "Increment the top value on the stack",
            Opcode::Jmp => "Unconditionally jump to a label",
            Opcode::Jg => "Jump to a label if the top value is 1",
            Opcode::Jl => "Jump to a label if the top value is -1",
            Opcode::Jnz => "Jump to a label if the top value is not zero",
            Opcode::Jz => "Jump to a label if the top value is zero",
            Opcode::Label => "Define a label in the program",
            Opcode::Mod => "Calculate the remainder of the top two values on the stack",
            Opcode::Mov => "Copy the top value on the stack to a register",
            Opcode::Mul => "Multiply the top two values on the stack",
            Opcode::Nop => "Do nothing",
            Opcode::Pop => "Remove the top value from the stack",
            Opcode::Print => "Print the top value from the stack",
            Opcode::Push => "Push a value or register onto the stack",
            Opcode::Sqrt => "Calculate the square root of the top value on the stack",
            Opcode::Str => "Push a string onto the stack",
            Opcode::Sub => "Subtract the top two values on the stack",
            Opcode::Swap => "Swap the top two values on the stack",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
