//! Bignum - Arbitrary-precision numbers on the managed heap
//!
//! This component provides:
//! - [`Nat`]: natural numbers as normalized little-endian `u32` limbs
//! - [`Int`]: signed integers with a separate sign word and no negative zero
//! - Decimal parsing and rendering in nine-digit blocks
//! - Schoolbook multiplication and Knuth Algorithm D division
//!
//! Numbers are immutable heap objects. Every operation allocates a fresh
//! result, so any number held across an operation must be rooted:
//!
//! ```
//! use bignum::Nat;
//! use memory_manager::Heap;
//!
//! let mut heap = Heap::new();
//! let a = Nat::parse(&mut heap, "340282366920938463463374607431768211456").unwrap();
//! let product = heap.with_roots([a.obj()], |heap, [a]| {
//!     let two = Nat::from_u64(heap, 2);
//!     let a = Nat::from_obj(heap.root(a));
//!     Nat::mul(heap, a, two)
//! });
//! assert_eq!(
//!     product.render(&heap),
//!     "680564733841876926926749214863536422912"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod decimal;
mod error;
mod int;
mod layout;
pub mod limbs;
mod magnitude;
mod nat;

pub use decimal::limbs_for_digits;
pub use error::ParseNumError;
pub use int::Int;
pub use layout::Sign;
pub use nat::Nat;
