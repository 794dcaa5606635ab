//! Instruction set and programs

/// Index of a general register
pub type Reg = usize;

/// A single machine instruction
///
/// Arithmetic instructions read signed integers from their source registers
/// and write a fresh integer to the destination. Sources and destination may
/// be the same register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Parse literal `literal` of the program into `dst`
    LoadInt {
        /// Destination register
        dst: Reg,
        /// Index into [`Program::literals`]
        literal: usize,
    },
    /// Store a raw, unmanaged value
    LoadImm {
        /// Destination register
        dst: Reg,
        /// Raw value
        value: u64,
    },
    /// Copy a register, raw or managed
    Move {
        /// Destination register
        dst: Reg,
        /// Source register
        src: Reg,
    },
    /// `dst = lhs + rhs`
    Add {
        /// Destination register
        dst: Reg,
        /// Left operand
        lhs: Reg,
        /// Right operand
        rhs: Reg,
    },
    /// `dst = lhs - rhs`
    Sub {
        /// Destination register
        dst: Reg,
        /// Left operand
        lhs: Reg,
        /// Right operand
        rhs: Reg,
    },
    /// `dst = lhs * rhs`
    Mul {
        /// Destination register
        dst: Reg,
        /// Left operand
        lhs: Reg,
        /// Right operand
        rhs: Reg,
    },
    /// `dst = lhs / rhs`, truncating
    Div {
        /// Destination register
        dst: Reg,
        /// Left operand
        lhs: Reg,
        /// Right operand
        rhs: Reg,
    },
    /// `dst = lhs % rhs`, with the sign of `lhs`
    Rem {
        /// Destination register
        dst: Reg,
        /// Left operand
        lhs: Reg,
        /// Right operand
        rhs: Reg,
    },
    /// Quotient and remainder in one division. If both destinations name
    /// the same register it receives the remainder.
    DivRem {
        /// Destination of the quotient
        quotient: Reg,
        /// Destination of the remainder
        remainder: Reg,
        /// Dividend
        lhs: Reg,
        /// Divisor
        rhs: Reg,
    },
    /// `dst = -src`
    Neg {
        /// Destination register
        dst: Reg,
        /// Source register
        src: Reg,
    },
    /// `reg = reg + 1`
    Inc {
        /// Register updated in place
        reg: Reg,
    },
    /// `reg = reg - 1`
    Dec {
        /// Register updated in place
        reg: Reg,
    },
    /// Stores -1, 0 or 1 as a raw value, by the order of `lhs` and `rhs`
    Cmp {
        /// Destination register
        dst: Reg,
        /// Left operand
        lhs: Reg,
        /// Right operand
        rhs: Reg,
    },
    /// Force a garbage collection
    Collect,
    /// Stop execution
    Halt,
}

/// An instruction stream plus the decimal literals it loads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
    /// Decimal text referenced by [`Instruction::LoadInt`]
    pub literals: Vec<String>,
}

impl Program {
    /// Create an empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its position
    pub fn emit(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    /// Add a literal and return its index
    pub fn add_literal(&mut self, text: impl Into<String>) -> usize {
        self.literals.push(text.into());
        self.literals.len() - 1
    }

    /// Number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Number of literals
    pub fn literal_count(&self) -> usize {
        self.literals.len()
    }
}
