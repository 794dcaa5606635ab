//! Fatal runtime faults and the abort path.
//!
//! Every invariant violation detected by the heap, the collector, the root
//! registry or the numeric engine is a [`Fault`]. Faults are never returned to
//! callers: they are handed to [`fatal`], which reports them and terminates.

use std::fmt;

use thiserror::Error;

/// Diagnostic class of a [`Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// A caller broke the heap or rooting protocol
    Protocol,
    /// The heap is full even after a collection
    Exhaustion,
    /// An arithmetic operation has no defined result
    Arithmetic,
    /// A guard word or handle does not describe a live object
    Corruption,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultKind::Protocol => "protocol",
            FaultKind::Exhaustion => "exhaustion",
            FaultKind::Arithmetic => "arithmetic",
            FaultKind::Corruption => "corruption",
        };
        f.write_str(name)
    }
}

/// A fatal condition detected by the runtime core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Zero-length objects are not allocatable; use the token object instead
    #[error("zero-sized allocation requested")]
    ZeroSizedAllocation,

    /// The request is larger than a whole semispace
    #[error("allocation of {requested} words can never fit a space of {capacity} words")]
    NeverFits {
        /// Total words requested, including header and footer
        requested: usize,
        /// Capacity of one semispace in words
        capacity: usize,
    },

    /// The active space is still full after a collection
    #[error("heap exhausted: {requested} words requested after collection")]
    HeapExhausted {
        /// Total words requested, including header and footer
        requested: usize,
    },

    /// The heap configuration cannot describe a usable heap
    #[error("invalid heap configuration: {0}")]
    InvalidConfig(String),

    /// More stack roots than the root stack can hold
    #[error("root stack overflow (capacity {capacity})")]
    RootStackOverflow {
        /// Fixed capacity of the root stack
        capacity: usize,
    },

    /// A pop with no matching push
    #[error("root stack underflow")]
    RootStackUnderflow,

    /// A pop that is not the most recent push
    #[error("root popped out of order: expected depth {expected}, got depth {actual}")]
    RootOrder {
        /// Depth of the most recently pushed root
        expected: usize,
        /// Depth of the root handed to pop
        actual: usize,
    },

    /// No array root is registered under this id
    #[error("unknown array root #{0}")]
    UnknownArrayRoot(usize),

    /// No register set is registered under this id
    #[error("unknown register set #{0}")]
    UnknownRegisterSet(usize),

    /// Metadata names a location class the collector does not implement
    #[error("unsupported location class bits {0:#x}")]
    UnsupportedLocation(u32),

    /// Metadata names a pointee classification the collector does not implement
    #[error("unsupported pointee classification bits {0:#x}")]
    UnsupportedPointees(u32),

    /// Header or footer guard does not hold its magic value
    #[error(
        "guard mismatch at word {offset}: header {header:#010x}, footer {footer:#010x}, word count {word_count}"
    )]
    GuardMismatch {
        /// Word offset of the object header
        offset: usize,
        /// Header guard word as found
        header: u32,
        /// Footer guard word as found (0 when the word count is unusable)
        footer: u32,
        /// Word count as found
        word_count: u32,
    },

    /// A handle points outside the live part of its region
    #[error("dangling reference to word {offset}")]
    DanglingReference {
        /// Word offset named by the handle
        offset: usize,
    },

    /// An evacuated object did not fit into the destination space
    #[error("to-space overflow: {requested} words requested, {available} available")]
    ToSpaceOverflow {
        /// Words of the object being copied
        requested: usize,
        /// Words left in the destination space
        available: usize,
    },

    /// A null handle was dereferenced
    #[error("null handle dereferenced")]
    NullDereference,

    /// A mutable payload borrow that bump allocation cannot make disjoint
    #[error("payload borrow at word {offset} overlaps an earlier allocation")]
    OverlappingBorrow {
        /// Word offset of the offending output object
        offset: usize,
    },

    /// Division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// A natural-number operation would go below zero
    #[error("natural underflow in {operation}")]
    NaturalUnderflow {
        /// Name of the operation that underflowed
        operation: &'static str,
    },

    /// A stored value is not a valid encoding for its field
    #[error("malformed {what}: {value:#x}")]
    Malformed {
        /// The field being decoded
        what: &'static str,
        /// The value found
        value: u32,
    },
}

impl Fault {
    /// Returns the diagnostic class of this fault.
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::ZeroSizedAllocation
            | Fault::InvalidConfig(_)
            | Fault::RootStackOverflow { .. }
            | Fault::RootStackUnderflow
            | Fault::RootOrder { .. }
            | Fault::UnknownArrayRoot(_)
            | Fault::UnknownRegisterSet(_)
            | Fault::UnsupportedLocation(_)
            | Fault::UnsupportedPointees(_)
            | Fault::NullDereference
            | Fault::OverlappingBorrow { .. } => FaultKind::Protocol,
            Fault::NeverFits { .. } | Fault::HeapExhausted { .. } => FaultKind::Exhaustion,
            Fault::DivisionByZero | Fault::NaturalUnderflow { .. } => FaultKind::Arithmetic,
            Fault::GuardMismatch { .. }
            | Fault::DanglingReference { .. }
            | Fault::ToSpaceOverflow { .. }
            | Fault::Malformed { .. } => FaultKind::Corruption,
        }
    }
}

/// Reports `fault` and terminates.
///
/// The report is a `tracing` error event followed by a panic whose message
/// starts with `fatal <class> fault:`. Release builds abort on panic, so this
/// never returns control to the caller; test builds observe the panic.
#[cold]
#[track_caller]
pub fn fatal(fault: Fault) -> ! {
    let kind = fault.kind();
    if kind == FaultKind::Arithmetic {
        tracing::error!(target: "corten::fault", signal = "arithmetic", "arithmetic fault raised");
    }
    tracing::error!(target: "corten::fault", %kind, "{fault}");
    panic!("fatal {kind} fault: {fault}");
}
