//! Register machine for the Corten numeric runtime.
//!
//! The machine executes a small instruction set over arbitrary-precision
//! integers. Its register file is registered with the heap as a root, so
//! numbers held in registers survive collections and are relocated in place.
//!
//! # Overview
//!
//! - [`Machine`] - Owns the heap and register set, runs programs
//! - [`Program`] - Instructions plus decimal literals
//! - [`Instruction`] - The instruction set
//! - [`VmError`] - Malformed-program errors
//!
//! # Examples
//!
//! ```
//! use interpreter::{Instruction, Machine, Program};
//!
//! let mut program = Program::new();
//! let a = program.add_literal("-7");
//! let b = program.add_literal("2");
//! program.emit(Instruction::LoadInt { dst: 0, literal: a });
//! program.emit(Instruction::LoadInt { dst: 1, literal: b });
//! program.emit(Instruction::DivRem { quotient: 2, remainder: 3, lhs: 0, rhs: 1 });
//!
//! let mut machine = Machine::new();
//! machine.run(&program).unwrap();
//! assert_eq!(machine.render(2).unwrap(), "-3");
//! assert_eq!(machine.render(3).unwrap(), "-1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod context;
pub mod dispatch;
mod error;
mod instruction;
mod vm;

pub use context::ExecutionContext;
pub use dispatch::Dispatcher;
pub use error::VmError;
pub use instruction::{Instruction, Program, Reg};
pub use vm::Machine;
