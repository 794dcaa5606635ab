//! Command-line arguments

use clap::{Parser, ValueEnum};
use memory_manager::DEFAULT_SPACE_WORDS;

/// Arbitrary-precision calculator on a garbage-collected heap
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "corten-num", version, about, allow_negative_numbers = true)]
pub struct Cli {
    /// Use natural numbers instead of signed integers
    #[arg(long)]
    pub natural: bool,

    /// Capacity of each semispace in words
    #[arg(long, value_name = "N", default_value_t = DEFAULT_SPACE_WORDS)]
    pub heap_words: usize,

    /// Validate the whole heap around every collection
    #[arg(long)]
    pub verify_heap: bool,

    /// Print heap statistics as JSON after the result
    #[arg(long)]
    pub stats: bool,

    /// Left operand, decimal
    pub lhs: String,

    /// Operation
    #[arg(value_enum)]
    pub op: Op,

    /// Right operand, decimal; binary operations only
    pub rhs: Option<String>,
}

/// Operation to perform
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Op {
    /// Sum
    #[value(name = "+")]
    Add,
    /// Difference
    #[value(name = "-")]
    Sub,
    /// Product
    #[value(name = "*")]
    Mul,
    /// Truncating quotient
    #[value(name = "/")]
    Div,
    /// Remainder, with the sign of the dividend
    #[value(name = "%")]
    Rem,
    /// Quotient and remainder, one per line
    #[value(name = "divrem")]
    DivRem,
    /// -1, 0 or 1
    #[value(name = "cmp")]
    Cmp,
    /// Add one
    #[value(name = "inc")]
    Inc,
    /// Subtract one
    #[value(name = "dec")]
    Dec,
    /// Negate; signed mode only
    #[value(name = "neg")]
    Neg,
}

impl Op {
    /// Whether the operation takes a right operand
    pub fn is_binary(self) -> bool {
        !matches!(self, Op::Inc | Op::Dec | Op::Neg)
    }

    /// Whether the right operand is a divisor
    pub fn divides(self) -> bool {
        matches!(self, Op::Div | Op::Rem | Op::DivRem)
    }

    /// The spelling used on the command line
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Rem => "%",
            Op::DivRem => "divrem",
            Op::Cmp => "cmp",
            Op::Inc => "inc",
            Op::Dec => "dec",
            Op::Neg => "neg",
        }
    }
}
