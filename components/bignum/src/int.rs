//! Signed integers.
//!
//! An `Int` is a magnitude plus a separate sign word. Arithmetic picks a
//! magnitude operation and a result sign from the operand signs; results with
//! zero magnitude are always positive.

use std::cmp::Ordering;

use memory_manager::{Heap, ObjRef, Word, OVERHEAD_WORDS};

use crate::decimal;
use crate::error::ParseNumError;
use crate::layout::{build, read, read_sign, Operand, Output, Shape, Sign};
use crate::magnitude;
use crate::nat::Nat;

/// An arbitrary-precision signed integer on the managed heap.
///
/// Like [`Nat`], an `Int` is a plain handle that must be rooted to survive an
/// allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int(ObjRef);

impl Int {
    /// Rewraps a handle, typically one read back from a root.
    pub fn from_obj(obj: ObjRef) -> Int {
        Int(obj)
    }

    /// The underlying heap handle, for rooting.
    pub fn obj(self) -> ObjRef {
        self.0
    }

    fn operand(self) -> Operand {
        Operand {
            obj: self.0,
            shape: Shape::Int,
        }
    }

    /// Heap words taken by an integer object with `limbs` limb slots
    pub fn object_words(limbs: usize) -> usize {
        OVERHEAD_WORDS + Shape::Int.prefix() + limbs
    }

    /// Zero
    pub fn zero(heap: &mut Heap) -> Int {
        Self::from_i64(heap, 0)
    }

    /// Converts a machine integer.
    pub fn from_i64(heap: &mut Heap, value: i64) -> Int {
        let sign = if value < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };
        let magnitude = value.unsigned_abs();
        let output = Output {
            shape: Shape::Int,
            sign,
            capacity: 2,
        };
        let [obj] = build(heap, [], [output], |[], [out]| {
            out[0] = magnitude as Word;
            out[1] = (magnitude >> 32) as Word;
        });
        Int(obj)
    }

    /// The non-negative integer with the value of `n`
    pub fn from_nat(heap: &mut Heap, n: Nat) -> Int {
        Int(magnitude::copy(heap, n.operand(), Shape::Int, Sign::Positive))
    }

    /// `|a|` as a natural number
    pub fn magnitude(heap: &mut Heap, a: Int) -> Nat {
        Nat::from_obj(magnitude::copy(heap, a.operand(), Shape::Nat, Sign::Positive))
    }

    /// Parses optionally signed decimal text.
    ///
    /// ```
    /// use bignum::Int;
    /// use memory_manager::Heap;
    ///
    /// let mut heap = Heap::new();
    /// let n = Int::parse(&mut heap, "-0042").unwrap();
    /// assert_eq!(n.render(&heap), "-42");
    /// ```
    pub fn parse(heap: &mut Heap, text: &str) -> Result<Int, ParseNumError> {
        decimal::parse(heap, text, Shape::Int).map(Int)
    }

    /// Canonical decimal text
    pub fn render(self, heap: &Heap) -> String {
        decimal::render(heap, self.operand())
    }

    /// The sign; zero is positive
    pub fn sign(self, heap: &Heap) -> Sign {
        read_sign(heap, self.operand())
    }

    /// Whether the value is zero
    pub fn is_zero(self, heap: &Heap) -> bool {
        magnitude::is_zero(heap, self.operand())
    }

    /// The value as an `i64`, if it fits
    pub fn to_i64(self, heap: &Heap) -> Option<i64> {
        let magnitude = match *read(heap, self.operand()) {
            [] => 0,
            [low] => u64::from(low),
            [low, high] => u64::from(low) | (u64::from(high) << 32),
            _ => return None,
        };
        match self.sign(heap) {
            Sign::Positive => i64::try_from(magnitude).ok(),
            Sign::Negative => 0i64.checked_sub_unsigned(magnitude),
        }
    }

    /// Numeric ordering
    pub fn compare(heap: &Heap, a: Int, b: Int) -> Ordering {
        match (a.sign(heap), b.sign(heap)) {
            (Sign::Negative, Sign::Positive) => Ordering::Less,
            (Sign::Positive, Sign::Negative) => Ordering::Greater,
            (Sign::Positive, Sign::Positive) => magnitude::cmp(heap, a.operand(), b.operand()),
            (Sign::Negative, Sign::Negative) => magnitude::cmp(heap, b.operand(), a.operand()),
        }
    }

    /// `a + b`
    pub fn add(heap: &mut Heap, a: Int, b: Int) -> Int {
        let b_sign = b.sign(heap);
        Int::add_signed(heap, a, b, b_sign)
    }

    /// `a - b`
    pub fn sub(heap: &mut Heap, a: Int, b: Int) -> Int {
        let b_sign = b.sign(heap).negate();
        Int::add_signed(heap, a, b, b_sign)
    }

    /// `a + (b_sign * |b|)`
    fn add_signed(heap: &mut Heap, a: Int, b: Int, b_sign: Sign) -> Int {
        let a_sign = a.sign(heap);
        let (a, b) = (a.operand(), b.operand());
        let result = if a_sign == b_sign {
            magnitude::add(heap, a, b, Shape::Int, a_sign)
        } else if magnitude::cmp(heap, a, b) == Ordering::Less {
            magnitude::sub(heap, b, a, Shape::Int, b_sign)
        } else {
            magnitude::sub(heap, a, b, Shape::Int, a_sign)
        };
        Int(result)
    }

    /// `a * b`
    pub fn mul(heap: &mut Heap, a: Int, b: Int) -> Int {
        let sign = a.sign(heap).product(b.sign(heap));
        Int(magnitude::mul(heap, a.operand(), b.operand(), Shape::Int, sign))
    }

    /// Truncating `(a / b, a % b)`: the quotient rounds toward zero and the
    /// remainder takes the sign of `a`. Fatal when `b` is zero.
    pub fn div_rem(heap: &mut Heap, a: Int, b: Int) -> (Int, Int) {
        let (a_sign, b_sign) = (a.sign(heap), b.sign(heap));
        let (q, r) = magnitude::div_rem(
            heap,
            a.operand(),
            b.operand(),
            (Shape::Int, a_sign.product(b_sign)),
            (Shape::Int, a_sign),
        );
        (Int(q), Int(r))
    }

    /// Truncating `a / b`. Fatal when `b` is zero.
    pub fn div(heap: &mut Heap, a: Int, b: Int) -> Int {
        Int::div_rem(heap, a, b).0
    }

    /// Truncating `a % b`. Fatal when `b` is zero.
    pub fn rem(heap: &mut Heap, a: Int, b: Int) -> Int {
        Int::div_rem(heap, a, b).1
    }

    /// `a + 1`
    pub fn inc(heap: &mut Heap, a: Int) -> Int {
        let result = match a.sign(heap) {
            Sign::Positive => magnitude::inc(heap, a.operand(), Shape::Int, Sign::Positive),
            Sign::Negative => magnitude::dec(heap, a.operand(), Shape::Int, Sign::Negative),
        };
        Int(result)
    }

    /// `a - 1`
    pub fn dec(heap: &mut Heap, a: Int) -> Int {
        let result = if a.sign(heap) == Sign::Negative || a.is_zero(heap) {
            magnitude::inc(heap, a.operand(), Shape::Int, Sign::Negative)
        } else {
            magnitude::dec(heap, a.operand(), Shape::Int, Sign::Positive)
        };
        Int(result)
    }

    /// `-a`
    pub fn neg(heap: &mut Heap, a: Int) -> Int {
        let sign = a.sign(heap).negate();
        Int(magnitude::copy(heap, a.operand(), Shape::Int, sign))
    }

    /// `|a|`
    pub fn abs(heap: &mut Heap, a: Int) -> Int {
        Int(magnitude::copy(heap, a.operand(), Shape::Int, Sign::Positive))
    }
}
