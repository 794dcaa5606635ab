//! Recoverable errors of the numeric engine

use thiserror::Error;

/// Decimal text that does not follow the numeric grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNumError {
    /// No digits at all (empty text or a lone sign)
    #[error("no digits in numeric literal")]
    Empty,

    /// A character that is not a decimal digit
    #[error("invalid digit {found:?} at index {index}")]
    InvalidDigit {
        /// Byte index of the offending character
        index: usize,
        /// The offending character
        found: char,
    },

    /// A sign in front of a natural number
    #[error("natural numbers take no sign")]
    UnexpectedSign,
}
