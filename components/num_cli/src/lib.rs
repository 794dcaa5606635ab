//! Numeric runtime CLI library
//!
//! Provides the argument parser and the [`Runtime`] behind the `corten-num`
//! binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod runtime;

pub use cli::{Cli, Op};
pub use error::{CliError, CliResult};
pub use runtime::{Outcome, Runtime};
