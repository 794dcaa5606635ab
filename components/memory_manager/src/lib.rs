//! Memory Manager - Managed heap and copying garbage collector
//!
//! This component provides:
//! - Guarded object layout with header and footer magic words
//! - Semispace heap with bump-pointer allocation
//! - Cheney copying collection with a forwarding table
//! - Root registry: stack roots, array roots and register sets
//! - Shallow and whole-heap validation
//!
//! Objects are named by [`ObjRef`] handles, never by address. Any allocation
//! may move every heap object, so a handle held across an allocation must be
//! reachable from a root.
//!
//! # Example
//!
//! ```
//! use memory_manager::Heap;
//!
//! let mut heap = Heap::new();
//! let obj = heap.allocate_words(2);
//! heap.payload_mut(obj).copy_from_slice(&[1, 2]);
//!
//! let root = heap.push_root(obj);
//! heap.collect();
//! let obj = heap.pop_root(root);
//! assert_eq!(heap.payload(obj), &[1, 2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod gc;
pub mod heap;
pub mod object;
pub mod registers;
pub mod roots;

// Re-export main types
pub use config::{HeapConfig, DEFAULT_SPACE_WORDS, MAX_SPACE_WORDS};
pub use gc::CollectionReason;
pub use heap::{GcStats, Heap};
pub use object::{
    Location, Metadata, ObjRef, Pointees, Word, FOOTER_MAGIC, FOOTER_WORDS, HEADER_MAGIC,
    HEADER_WORDS, OVERHEAD_WORDS,
};
pub use registers::{RegisterSet, Scratch, GENERAL_REGISTERS, SCRATCH_SLOTS};
pub use roots::{ArrayRootId, RegisterSetId, StackRoot, ROOT_STACK_CAPACITY};
