//! Heap representation of numbers.
//!
//! Both kinds are pointer-free objects. A `Nat` payload is its limb count
//! followed by limb storage; an `Int` payload puts the sign word first:
//!
//! ```text
//! Nat: [len, limb0, limb1, ..]
//! Int: [sign, len, limb0, limb1, ..]
//! ```
//!
//! Storage may be longer than `len`; unused limbs are zero. The top stored
//! limb is never zero, so zero is `len == 0`, and a zero `Int` is positive.

use core_types::{fatal, Fault};
use memory_manager::{Heap, ObjRef, StackRoot, Word};

use crate::limbs;

const POSITIVE: Word = 1;
const NEGATIVE: Word = Word::MAX;

/// Sign of an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Zero or greater
    Positive,
    /// Less than zero
    Negative,
}

impl Sign {
    /// The opposite sign
    pub fn negate(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }

    /// Sign of a product or quotient of values with signs `self` and `other`
    pub fn product(self, other: Sign) -> Sign {
        if self == other {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    fn to_word(self) -> Word {
        match self {
            Sign::Positive => POSITIVE,
            Sign::Negative => NEGATIVE,
        }
    }

    fn from_word(word: Word) -> Sign {
        match word {
            POSITIVE => Sign::Positive,
            NEGATIVE => Sign::Negative,
            other => fatal(Fault::Malformed {
                what: "sign word",
                value: other,
            }),
        }
    }
}

/// Which payload layout an object uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Nat,
    Int,
}

impl Shape {
    /// Words before the first limb
    pub(crate) fn prefix(self) -> usize {
        match self {
            Shape::Nat => 1,
            Shape::Int => 2,
        }
    }

    fn len_slot(self) -> usize {
        self.prefix() - 1
    }
}

/// A number object together with its layout
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operand {
    pub(crate) obj: ObjRef,
    pub(crate) shape: Shape,
}

/// A result to allocate: layout, sign and limb storage
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pub(crate) shape: Shape,
    pub(crate) sign: Sign,
    pub(crate) capacity: usize,
}

/// The significant limbs of a payload.
pub(crate) fn limbs(payload: &[Word], shape: Shape) -> &[Word] {
    let len = payload[shape.len_slot()];
    let storage = &payload[shape.prefix()..];
    match storage.get(..len as usize) {
        Some(limbs) if limbs.last() != Some(&0) => limbs,
        _ => fatal(Fault::Malformed {
            what: "limb count",
            value: len,
        }),
    }
}

/// The sign of a payload; `Nat` is always positive.
pub(crate) fn sign(payload: &[Word], shape: Shape) -> Sign {
    match shape {
        Shape::Nat => Sign::Positive,
        Shape::Int => Sign::from_word(payload[0]),
    }
}

/// Significant limbs of a live operand
pub(crate) fn read(heap: &Heap, op: Operand) -> &[Word] {
    limbs(heap.payload(op.obj), op.shape)
}

/// Sign of a live operand
pub(crate) fn read_sign(heap: &Heap, op: Operand) -> Sign {
    sign(heap.payload(op.obj), op.shape)
}

/// Writes the header of a freshly computed result, trimming leading zero
/// limbs and giving zero the positive sign.
fn seal(header: &mut [Word], storage: &[Word], shape: Shape, sign: Sign) {
    let len = limbs::normalized_len(storage);
    let sign = if len == 0 { Sign::Positive } else { sign };
    if shape == Shape::Int {
        header[0] = sign.to_word();
    }
    header[shape.len_slot()] = len as Word;
}

/// Allocates the results described by `outputs`, then runs `kernel` over the
/// significant limbs of `inputs` and the limb storage of each result.
///
/// Inputs and results are kept on the root stack while later results are
/// allocated, so the caller's handles may move; the returned handles are
/// current. Results are sealed after the kernel runs.
pub(crate) fn build<const N: usize, const M: usize>(
    heap: &mut Heap,
    inputs: [Operand; N],
    outputs: [Output; M],
    kernel: impl FnOnce([&[Word]; N], [&mut [Word]; M]),
) -> [ObjRef; M] {
    heap.with_roots(inputs.map(|op| op.obj), |heap, input_roots| {
        let mut output_roots: Vec<StackRoot> = Vec::with_capacity(M);
        for output in &outputs {
            let obj = heap.allocate_words(output.shape.prefix() + output.capacity);
            output_roots.push(heap.push_root(obj));
        }
        let sources: [ObjRef; N] = std::array::from_fn(|i| heap.root(&input_roots[i]));
        let results: [ObjRef; M] = std::array::from_fn(|i| heap.root(&output_roots[i]));

        heap.with_payloads(sources, results, |payloads, dsts| {
            let mut index = 0;
            let mut parts = dsts.map(|dst| {
                let split = dst.split_at_mut(outputs[index].shape.prefix());
                index += 1;
                split
            });
            let operands: [&[Word]; N] =
                std::array::from_fn(|i| limbs(payloads[i], inputs[i].shape));
            kernel(operands, parts.each_mut().map(|(_, storage)| &mut **storage));
            for ((header, storage), output) in parts.iter_mut().zip(&outputs) {
                seal(header, storage, output.shape, output.sign);
            }
        });

        for root in output_roots.into_iter().rev() {
            heap.pop_root(root);
        }
        results
    })
}
