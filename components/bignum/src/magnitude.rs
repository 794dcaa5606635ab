//! Magnitude arithmetic on heap objects.
//!
//! Every operation reads its operands, sizes its result, and runs one limb
//! kernel through [`build`]. The output layout and sign are chosen by the
//! caller, so `Nat` and `Int` share these paths.

use std::cmp::Ordering;

use core_types::{fatal, Fault};
use memory_manager::{Heap, ObjRef};

use crate::layout::{build, read, Operand, Output, Shape, Sign};
use crate::limbs;

/// Magnitude comparison
pub(crate) fn cmp(heap: &Heap, a: Operand, b: Operand) -> Ordering {
    limbs::cmp(read(heap, a), read(heap, b))
}

/// Whether the magnitude is zero
pub(crate) fn is_zero(heap: &Heap, a: Operand) -> bool {
    read(heap, a).is_empty()
}

/// `|a|` with a new layout and sign
pub(crate) fn copy(heap: &mut Heap, a: Operand, shape: Shape, sign: Sign) -> ObjRef {
    let capacity = read(heap, a).len();
    let [result] = build(heap, [a], [Output { shape, sign, capacity }], |[a], [out]| {
        out.copy_from_slice(a);
    });
    result
}

/// `|a| + |b|`
pub(crate) fn add(heap: &mut Heap, a: Operand, b: Operand, shape: Shape, sign: Sign) -> ObjRef {
    let (x, y) = (read(heap, a), read(heap, b));
    let capacity = x.len().max(y.len()) + usize::from(limbs::add_may_carry(x, y));
    let [result] = build(heap, [a, b], [Output { shape, sign, capacity }], |[a, b], [out]| {
        limbs::add(a, b, out);
    });
    result
}

/// `|a| - |b|`, requiring `|a| >= |b|`
pub(crate) fn sub(heap: &mut Heap, a: Operand, b: Operand, shape: Shape, sign: Sign) -> ObjRef {
    debug_assert!(cmp(heap, a, b) != Ordering::Less);
    let capacity = read(heap, a).len();
    let [result] = build(heap, [a, b], [Output { shape, sign, capacity }], |[a, b], [out]| {
        limbs::sub(a, b, out);
    });
    result
}

/// `|a| + 1`
pub(crate) fn inc(heap: &mut Heap, a: Operand, shape: Shape, sign: Sign) -> ObjRef {
    let x = read(heap, a);
    let capacity = x.len() + usize::from(limbs::inc_may_carry(x));
    let [result] = build(heap, [a], [Output { shape, sign, capacity }], |[a], [out]| {
        limbs::inc(a, out);
    });
    result
}

/// `|a| - 1`, requiring `|a| > 0`
pub(crate) fn dec(heap: &mut Heap, a: Operand, shape: Shape, sign: Sign) -> ObjRef {
    debug_assert!(!is_zero(heap, a));
    let capacity = read(heap, a).len();
    let [result] = build(heap, [a], [Output { shape, sign, capacity }], |[a], [out]| {
        limbs::dec(a, out);
    });
    result
}

/// `|a| * |b|`
pub(crate) fn mul(heap: &mut Heap, a: Operand, b: Operand, shape: Shape, sign: Sign) -> ObjRef {
    let (x, y) = (read(heap, a), read(heap, b));
    let capacity = if x.is_empty() || y.is_empty() {
        0
    } else {
        x.len() + y.len()
    };
    let [result] = build(heap, [a, b], [Output { shape, sign, capacity }], |[a, b], [out]| {
        limbs::mul(a, b, out);
    });
    result
}

/// Truncating `(|a| / |b|, |a| % |b|)`. A zero divisor is fatal.
///
/// The quotient is allocated first and stays rooted while the remainder is
/// allocated.
pub(crate) fn div_rem(
    heap: &mut Heap,
    a: Operand,
    b: Operand,
    quotient: (Shape, Sign),
    remainder: (Shape, Sign),
) -> (ObjRef, ObjRef) {
    let (x, y) = (read(heap, a), read(heap, b));
    let (la, lb) = (x.len(), y.len());
    if lb == 0 {
        fatal(Fault::DivisionByZero);
    }
    let output = |(shape, sign): (Shape, Sign), capacity| Output {
        shape,
        sign,
        capacity,
    };

    let [q, r] = if limbs::cmp(x, y) == Ordering::Less {
        build(
            heap,
            [a],
            [output(quotient, 0), output(remainder, la)],
            |[a], [_, r]| r.copy_from_slice(a),
        )
    } else if lb == 1 {
        build(
            heap,
            [a, b],
            [output(quotient, la), output(remainder, 1)],
            |[a, b], [q, r]| r[0] = limbs::div_rem_limb(a, b[0], q),
        )
    } else {
        build(
            heap,
            [a, b],
            [output(quotient, la - lb + 1), output(remainder, lb)],
            |[a, b], [q, r]| limbs::div_rem(a, b, q, r),
        )
    };
    (q, r)
}
