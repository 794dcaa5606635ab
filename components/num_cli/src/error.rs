//! Error types for the CLI

use bignum::ParseNumError;
use interpreter::VmError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// An operand is not a decimal number
    #[error("invalid operand {text:?}: {source}")]
    Operand {
        /// The operand as given
        text: String,
        /// Why parsing failed
        #[source]
        source: ParseNumError,
    },

    /// The machine rejected the generated program
    #[error("machine error: {0}")]
    Machine(#[from] VmError),

    /// A binary operation without a right operand
    #[error("'{0}' needs a right operand")]
    MissingOperand(&'static str),

    /// A unary operation given a right operand
    #[error("'{0}' takes no right operand")]
    UnexpectedOperand(&'static str),

    /// The operation has no meaning in the chosen mode
    #[error("'{0}' is not defined on natural numbers")]
    Unsupported(&'static str),

    /// A zero divisor
    #[error("division by zero")]
    DivisionByZero,

    /// A natural result below zero
    #[error("result would be negative in natural mode")]
    NaturalUnderflow,

    /// The heap options describe no usable heap
    #[error("invalid heap configuration: {0}")]
    Config(String),

    /// The operation could outgrow a semispace
    #[error("heap of {capacity} words is too small: operation may need {needed}")]
    HeapTooSmall {
        /// Worst-case words live at once
        needed: usize,
        /// Words in each semispace
        capacity: usize,
    },

    /// Statistics could not be serialized
    #[error("statistics: {0}")]
    Stats(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
