//! Recoverable machine errors

use bignum::ParseNumError;
use thiserror::Error;

use crate::instruction::Reg;

/// An error raised by a malformed program.
///
/// Arithmetic faults such as division by zero are not `VmError`s: they are
/// fatal and terminate the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// A register operand past the register file
    #[error("register r{0} out of range")]
    RegisterOutOfRange(Reg),

    /// An arithmetic operand holding a raw value
    #[error("register r{0} does not hold a number")]
    NotAnObject(Reg),

    /// A literal index past the literal table
    #[error("literal #{0} out of range")]
    LiteralOutOfRange(usize),

    /// A literal that is not decimal integer text
    #[error("literal #{index}: {source}")]
    Literal {
        /// Index into the literal table
        index: usize,
        /// Why parsing failed
        #[source]
        source: ParseNumError,
    },
}
