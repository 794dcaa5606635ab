//! Natural numbers.

use std::cmp::Ordering;

use core_types::{fatal, Fault};
use memory_manager::{Heap, ObjRef, Word, OVERHEAD_WORDS};

use crate::decimal;
use crate::error::ParseNumError;
use crate::layout::{build, read, Operand, Output, Shape, Sign};
use crate::magnitude;

const NAT: (Shape, Sign) = (Shape::Nat, Sign::Positive);

/// An arbitrary-precision natural number on the managed heap.
///
/// A `Nat` is a plain handle: it is only valid until the next allocation
/// unless it is reachable from a root. Every operation allocates a fresh
/// result and roots its own operands while it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nat(ObjRef);

impl Nat {
    /// Rewraps a handle, typically one read back from a root.
    pub fn from_obj(obj: ObjRef) -> Nat {
        Nat(obj)
    }

    /// The underlying heap handle, for rooting.
    pub fn obj(self) -> ObjRef {
        self.0
    }

    pub(crate) fn operand(self) -> Operand {
        Operand {
            obj: self.0,
            shape: Shape::Nat,
        }
    }

    /// Heap words taken by a natural number object with `limbs` limb slots
    pub fn object_words(limbs: usize) -> usize {
        OVERHEAD_WORDS + Shape::Nat.prefix() + limbs
    }

    /// Zero
    pub fn zero(heap: &mut Heap) -> Nat {
        Self::from_u64(heap, 0)
    }

    /// Converts a machine integer.
    pub fn from_u64(heap: &mut Heap, value: u64) -> Nat {
        let output = Output {
            shape: Shape::Nat,
            sign: Sign::Positive,
            capacity: 2,
        };
        let [obj] = build(heap, [], [output], |[], [out]| {
            out[0] = value as Word;
            out[1] = (value >> 32) as Word;
        });
        Nat(obj)
    }

    /// Parses unsigned decimal text.
    ///
    /// ```
    /// use bignum::Nat;
    /// use memory_manager::Heap;
    ///
    /// let mut heap = Heap::new();
    /// let n = Nat::parse(&mut heap, "00042").unwrap();
    /// assert_eq!(n.render(&heap), "42");
    /// ```
    pub fn parse(heap: &mut Heap, text: &str) -> Result<Nat, ParseNumError> {
        decimal::parse(heap, text, Shape::Nat).map(Nat)
    }

    /// Canonical decimal text
    pub fn render(self, heap: &Heap) -> String {
        decimal::render(heap, self.operand())
    }

    /// The value as a `u64`, if it fits
    pub fn to_u64(self, heap: &Heap) -> Option<u64> {
        match *read(heap, self.operand()) {
            [] => Some(0),
            [low] => Some(u64::from(low)),
            [low, high] => Some(u64::from(low) | (u64::from(high) << 32)),
            _ => None,
        }
    }

    /// Significant limbs, least-significant first
    pub fn limbs(self, heap: &Heap) -> Vec<Word> {
        read(heap, self.operand()).to_vec()
    }

    /// Whether the value is zero
    pub fn is_zero(self, heap: &Heap) -> bool {
        magnitude::is_zero(heap, self.operand())
    }

    /// Numeric ordering
    pub fn compare(heap: &Heap, a: Nat, b: Nat) -> Ordering {
        magnitude::cmp(heap, a.operand(), b.operand())
    }

    /// `a + b`
    pub fn add(heap: &mut Heap, a: Nat, b: Nat) -> Nat {
        Nat(magnitude::add(heap, a.operand(), b.operand(), Shape::Nat, Sign::Positive))
    }

    /// `a - b`. Fatal when `a < b`.
    pub fn sub(heap: &mut Heap, a: Nat, b: Nat) -> Nat {
        if Nat::compare(heap, a, b) == Ordering::Less {
            fatal(Fault::NaturalUnderflow {
                operation: "subtraction",
            });
        }
        Nat(magnitude::sub(heap, a.operand(), b.operand(), Shape::Nat, Sign::Positive))
    }

    /// `a * b`
    pub fn mul(heap: &mut Heap, a: Nat, b: Nat) -> Nat {
        Nat(magnitude::mul(heap, a.operand(), b.operand(), Shape::Nat, Sign::Positive))
    }

    /// `(a / b, a % b)`. Fatal when `b` is zero.
    pub fn div_rem(heap: &mut Heap, a: Nat, b: Nat) -> (Nat, Nat) {
        let (q, r) = magnitude::div_rem(heap, a.operand(), b.operand(), NAT, NAT);
        (Nat(q), Nat(r))
    }

    /// `a / b`. Fatal when `b` is zero.
    pub fn div(heap: &mut Heap, a: Nat, b: Nat) -> Nat {
        Nat::div_rem(heap, a, b).0
    }

    /// `a % b`. Fatal when `b` is zero.
    pub fn rem(heap: &mut Heap, a: Nat, b: Nat) -> Nat {
        Nat::div_rem(heap, a, b).1
    }

    /// `a + 1`
    pub fn inc(heap: &mut Heap, a: Nat) -> Nat {
        Nat(magnitude::inc(heap, a.operand(), Shape::Nat, Sign::Positive))
    }

    /// `a - 1`. Fatal when `a` is zero.
    pub fn dec(heap: &mut Heap, a: Nat) -> Nat {
        if a.is_zero(heap) {
            fatal(Fault::NaturalUnderflow {
                operation: "decrement",
            });
        }
        Nat(magnitude::dec(heap, a.operand(), Shape::Nat, Sign::Positive))
    }
}
