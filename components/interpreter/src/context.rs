//! Execution context for the machine

use crate::instruction::{Instruction, Program};

/// Position within a program being executed
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext<'p> {
    /// Index of the next instruction
    pub instruction_pointer: usize,
    /// The program being executed
    pub program: &'p Program,
}

impl<'p> ExecutionContext<'p> {
    /// Create a context positioned at the first instruction
    pub fn new(program: &'p Program) -> Self {
        Self {
            instruction_pointer: 0,
            program,
        }
    }

    /// Advance instruction pointer and return current instruction
    pub fn fetch(&mut self) -> Option<Instruction> {
        let inst = self.program.instructions.get(self.instruction_pointer)?;
        self.instruction_pointer += 1;
        Some(*inst)
    }

    /// Look up a literal
    pub fn literal(&self, index: usize) -> Option<&'p str> {
        self.program.literals.get(index).map(String::as_str)
    }
}
