//! Decimal text conversion.
//!
//! Both directions work in blocks of nine digits, the largest power of ten
//! that fits a limb.

use memory_manager::{Heap, ObjRef, Word};

use crate::error::ParseNumError;
use crate::layout::{build, read, read_sign, Operand, Output, Shape, Sign};
use crate::limbs;

/// Digits per block
const BLOCK_DIGITS: usize = 9;
/// 10^BLOCK_DIGITS
const BLOCK: Word = 1_000_000_000;

const POW10: [Word; BLOCK_DIGITS + 1] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Limb slots parsing reserves for `digits` decimal digits:
/// `digits / log10(2^32)`, rounded up with room to spare.
pub fn limbs_for_digits(digits: usize) -> usize {
    digits * 100_000 / 963_295 + 2
}

/// Decimal digits needed for `limbs` limbs: `limbs * 32 * log10(2)`, rounded up
/// plus one.
fn digits_for_limbs(limbs: usize) -> usize {
    limbs * 9_633 / 1_000 + 2
}

/// Parses `text` into a fresh object of the given layout.
///
/// Accepts an optional `+`/`-` (signed layout only) followed by one or more
/// ASCII digits. Leading zeros are allowed.
pub(crate) fn parse(heap: &mut Heap, text: &str, shape: Shape) -> Result<ObjRef, ParseNumError> {
    let (sign, digits, offset) = match text.as_bytes().first() {
        Some(b'+') => (Sign::Positive, &text[1..], 1),
        Some(b'-') => (Sign::Negative, &text[1..], 1),
        _ => (Sign::Positive, text, 0),
    };
    if offset == 1 && shape == Shape::Nat {
        return Err(ParseNumError::UnexpectedSign);
    }
    if digits.is_empty() {
        return Err(ParseNumError::Empty);
    }
    if let Some((index, found)) = digits.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(ParseNumError::InvalidDigit {
            index: index + offset,
            found,
        });
    }

    let digits = digits.as_bytes();
    let capacity = limbs_for_digits(digits.len());
    let [obj] = build(heap, [], [Output { shape, sign, capacity }], |[], [out]| {
        let lead = digits.len() % BLOCK_DIGITS;
        let blocks = (lead > 0)
            .then(|| &digits[..lead])
            .into_iter()
            .chain(digits[lead..].chunks(BLOCK_DIGITS));

        let mut len = 0;
        for block in blocks {
            let value = block
                .iter()
                .fold(0, |acc, &digit| acc * 10 + Word::from(digit - b'0'));
            let carry = limbs::mul_limb_add_in_place(&mut out[..len], POW10[block.len()], value);
            if carry != 0 {
                out[len] = carry;
                len += 1;
            }
        }
    });
    Ok(obj)
}

/// Renders a number as canonical decimal text: no leading zeros except for a
/// lone `0`, and a `-` only in front of negative values.
pub(crate) fn render(heap: &Heap, op: Operand) -> String {
    let magnitude = read(heap, op);
    let negative = read_sign(heap, op) == Sign::Negative;

    // least-significant block first
    let mut scratch = magnitude.to_vec();
    let mut blocks = Vec::with_capacity(digits_for_limbs(scratch.len()) / BLOCK_DIGITS + 1);
    let mut len = scratch.len();
    while len > 0 {
        blocks.push(limbs::div_rem_limb_in_place(&mut scratch[..len], BLOCK));
        len = limbs::normalized_len(&scratch[..len]);
    }

    let mut text = String::with_capacity(digits_for_limbs(magnitude.len()) + 1);
    if negative {
        text.push('-');
    }
    match blocks.split_last() {
        None => text.push('0'),
        Some((top, rest)) => {
            text.push_str(&top.to_string());
            for block in rest.iter().rev() {
                text.push_str(&format!("{block:09}"));
            }
        }
    }
    text
}
