use std::collections::HashMap;
use std::io;

use crate::register::{Register, RegisterFile};
use crate::stack::Stack;
use crate::value::Value;

/// Upper bound on executed instructions per run. A safety valve against
/// unbounded looping, not a performance feature.
pub const CYCLE_LIMIT: usize = 20_000;

/// The stack machine: operand stack, register file, loaded program with its
/// label table, and the run state (instruction pointer and cycle counter).
///
/// `W` is the sink for `PRN` output; the default machine writes to stdout
/// and tests capture output in a `Vec<u8>`.
///
/// Register contents deliberately survive `load_program`, so one machine
/// can run a sequence of programs that hand values to each other through
/// AX..DX. Only the stack, instruction pointer, and cycle counter are reset
/// on load.
#[derive(Debug)]
pub struct Machine<W = io::Stdout> {
    pub(crate) stack: Stack,
    pub(crate) registers: RegisterFile,
    pub(crate) program: Vec<String>,
    pub(crate) labels: HashMap<String, usize>,
    pub(crate) ip: usize,
    pub(crate) cycle: usize,
    pub(crate) cycle_limit: usize,
    pub(crate) out: W,
}

impl Machine<io::Stdout> {
    /// Create a machine that prints to stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Machine<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Machine<W> {
    /// Create a machine with a custom `PRN` output sink.
    pub fn with_output(out: W) -> Self {
        Self {
            stack: Stack::new(),
            registers: RegisterFile::new(),
            program: Vec::new(),
            labels: HashMap::new(),
            ip: 0,
            cycle: 0,
            cycle_limit: CYCLE_LIMIT,
            out,
        }
    }

    /// Override the cycle bound (mainly for tests).
    pub fn with_cycle_limit(mut self, limit: usize) -> Self {
        self.cycle_limit = limit;
        self
    }

    /// Load a program, replacing any previous one.
    ///
    /// Clears the operand stack, rebuilds the label table from every line
    /// whose last character is a colon, and resets the instruction pointer
    /// and cycle counter. Registers are left untouched.
    pub fn load_program<S, I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = lines.into_iter().map(Into::into).collect();
        self.labels = self
            .program
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                line.trim()
                    .strip_suffix(':')
                    .map(|name| (name.to_string(), index))
            })
            .collect();
        self.stack.clear();
        self.ip = 0;
        self.cycle = 0;
        log::debug!(
            "loaded program: {} lines, {} labels",
            self.program.len(),
            self.labels.len()
        );
    }

    /// The operand stack, bottom to top.
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    /// Read a register.
    pub fn register(&self, reg: Register) -> &Value {
        self.registers.get(reg)
    }

    /// The instruction pointer (index of the next line to execute).
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Instructions executed so far in the current run.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Look up a label's program line index.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Borrow the output sink (for inspecting captured output).
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the machine and return the output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}
