//! Shared fault types for the Corten numeric runtime.
//!
//! This crate defines the fatal conditions every other component can detect
//! and the single path through which they are reported.
//!
//! # Overview
//!
//! - [`Fault`] - A fatal invariant violation
//! - [`FaultKind`] - Diagnostic class of a fault
//! - [`fatal`] - Report a fault and terminate
//!
//! # Examples
//!
//! ```
//! use core_types::{Fault, FaultKind};
//!
//! let fault = Fault::HeapExhausted { requested: 64 };
//! assert_eq!(fault.kind(), FaultKind::Exhaustion);
//! assert!(fault.to_string().contains("64"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;

pub use error::{fatal, Fault, FaultKind};
