//! Built-in sample programs.

/// Multiply the integers 1 through 10, leaving 3628800 on the stack.
///
/// The counter lives on the stack top and is mirrored through AX so that
/// MUL can consume the product/counter pair.
pub const PRODUCT: &[&str] = &[
    "PUSH 1",
    "PUSH 1",
    "LOOP:",
    "DUP",
    "PUSH 10",
    "CMP",
    "JG END_LOOP",
    "MOV AX",
    "MUL",
    "PUSH AX",
    "PUSH 1",
    "ADD",
    "JMP LOOP",
    "END_LOOP:",
    "POP",
    "HALT",
];

/// Sum the integers 1 through 1000, leaving 500500 on the stack.
pub const SUM: &[&str] = &[
    "PUSH 0",
    "MOV AX",
    "POP",
    "PUSH 1",
    "MOV BX",
    "POP",
    "LOOP:",
    "PUSH BX",
    "PUSH 1000",
    "CMP",
    "JG DONE",
    "PUSH AX",
    "PUSH BX",
    "ADD",
    "MOV AX",
    "POP",
    "PUSH BX",
    "INC",
    "MOV BX",
    "POP",
    "JMP LOOP",
    "DONE:",
    "PUSH AX",
];

/// Print `RESULT: 12.0` by composing one line across two PRN calls.
pub const SQRT: &[&str] = &[
    "PUSH 144",
    "SQRT",
    "STR \"RESULT:\"",
    "PRN ,",
    "PRN",
];

/// Look up a demo program by name.
pub fn by_name(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "product" => Some(PRODUCT),
        "sum" => Some(SUM),
        "sqrt" => Some(SQRT),
        _ => None,
    }
}

/// Names of all demo programs.
pub const NAMES: &[&str] = &["product", "sum", "sqrt"];
