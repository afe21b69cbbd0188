//! Operand stack.
//!
//! The stack holds `Value` objects and provides the push/pop primitives
//! plus the in-place `DUP` and `SWAP` operations.

use thiserror::Error;

use crate::value::Value;

/// Error type for stack operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// Tried to consume more elements than the stack holds.
    #[error("stack underflow")]
    Underflow,
}

/// The operand stack. Values are pushed and popped at the tail; the final
/// contents after a run are the program's observable result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stack {
    items: Vec<Value>,
}

impl Stack {
    /// Create a new empty stack.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Get the number of items on the stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push a value onto the stack.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Pop a value from the stack.
    pub fn pop(&mut self) -> Result<Value, StackError> {
        self.items.pop().ok_or(StackError::Underflow)
    }

    /// Peek at the top of stack without removing it.
    pub fn top(&self) -> Result<&Value, StackError> {
        self.items.last().ok_or(StackError::Underflow)
    }

    /// Duplicate the top item (DUP).
    pub fn dup(&mut self) -> Result<(), StackError> {
        let top = self.top()?.clone();
        self.items.push(top);
        Ok(())
    }

    /// Exchange the two topmost items (SWAP).
    pub fn swap(&mut self) -> Result<(), StackError> {
        let len = self.items.len();
        if len < 2 {
            return Err(StackError::Underflow);
        }
        self.items.swap(len - 1, len - 2);
        Ok(())
    }

    /// Clear the stack.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get a slice of all items (bottom to top).
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}
