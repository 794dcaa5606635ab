//! Limb kernels.
//!
//! Pure multi-precision routines over little-endian `u32` limb slices. None of
//! them allocate on the managed heap; callers size the output slices and the
//! heap layer trims the result afterwards. Outputs are expected to start
//! zeroed, which is how fresh heap payloads arrive.

use std::cmp::Ordering;

use memory_manager::Word;

/// Bits per limb
pub const LIMB_BITS: u32 = Word::BITS;

const LIMB_MASK: u64 = Word::MAX as u64;

/// Length of `limbs` without its most-significant zero limbs.
pub fn normalized_len(limbs: &[Word]) -> usize {
    limbs.iter().rposition(|&limb| limb != 0).map_or(0, |top| top + 1)
}

/// Compares two normalized magnitudes: by length, then from the
/// most-significant limb down.
pub fn cmp(a: &[Word], b: &[Word]) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

/// Whether `a + b` can carry out of the longer operand.
pub fn add_may_carry(a: &[Word], b: &[Word]) -> bool {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    long.len() == short.len() || long.last() == Some(&Word::MAX)
}

/// `out = a + b`. `out` must hold `max(len) + 1` limbs when
/// [`add_may_carry`] holds, `max(len)` otherwise.
pub fn add(a: &[Word], b: &[Word], out: &mut [Word]) {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut carry = 0u64;
    for (i, &x) in long.iter().enumerate() {
        let y = short.get(i).copied().unwrap_or(0);
        let sum = u64::from(x) + u64::from(y) + carry;
        out[i] = sum as Word;
        carry = sum >> LIMB_BITS;
    }
    if carry != 0 {
        out[long.len()] = carry as Word;
    }
}

/// `out = a - b`, requiring `a >= b`. `out` must hold `a.len()` limbs.
pub fn sub(a: &[Word], b: &[Word], out: &mut [Word]) {
    debug_assert!(cmp(&a[..normalized_len(a)], &b[..normalized_len(b)]) != Ordering::Less);
    let mut borrow = false;
    for (i, &x) in a.iter().enumerate() {
        let y = b.get(i).copied().unwrap_or(0);
        let (diff, under1) = x.overflowing_sub(y);
        let (diff, under2) = diff.overflowing_sub(Word::from(borrow));
        out[i] = diff;
        borrow = under1 || under2;
    }
    debug_assert!(!borrow);
}

/// Whether `a + 1` needs one more limb than `a` (true for zero too).
pub fn inc_may_carry(a: &[Word]) -> bool {
    a.iter().all(|&limb| limb == Word::MAX)
}

/// `out = a + 1`, rippling the carry.
pub fn inc(a: &[Word], out: &mut [Word]) {
    let mut carry = true;
    for (i, &x) in a.iter().enumerate() {
        let (sum, overflow) = x.overflowing_add(Word::from(carry));
        out[i] = sum;
        carry = overflow;
    }
    if carry {
        out[a.len()] = 1;
    }
}

/// `out = a - 1`, rippling the borrow. `a` must be nonzero.
pub fn dec(a: &[Word], out: &mut [Word]) {
    debug_assert!(normalized_len(a) != 0);
    let mut borrow = true;
    for (i, &x) in a.iter().enumerate() {
        let (diff, under) = x.overflowing_sub(Word::from(borrow));
        out[i] = diff;
        borrow = under;
    }
}

/// `out = a * m`. `out` must hold `a.len() + 1` limbs.
pub fn mul_limb(a: &[Word], m: Word, out: &mut [Word]) {
    let mut carry = 0u64;
    for (i, &x) in a.iter().enumerate() {
        let product = u64::from(x) * u64::from(m) + carry;
        out[i] = product as Word;
        carry = product >> LIMB_BITS;
    }
    out[a.len()] = carry as Word;
}

/// `x = x * m + add` in place; returns the limb carried out of the top.
pub fn mul_limb_add_in_place(x: &mut [Word], m: Word, add: Word) -> Word {
    let mut carry = u64::from(add);
    for limb in x.iter_mut() {
        let product = u64::from(*limb) * u64::from(m) + carry;
        *limb = product as Word;
        carry = product >> LIMB_BITS;
    }
    carry as Word
}

/// `out = a * b`, schoolbook. `out` must be zeroed and hold
/// `a.len() + b.len()` limbs.
pub fn mul(a: &[Word], b: &[Word], out: &mut [Word]) {
    match (a.len(), b.len()) {
        (0, _) | (_, 0) => {}
        (_, 1) => mul_limb(a, b[0], out),
        (1, _) => mul_limb(b, a[0], out),
        _ => {
            for (i, &x) in a.iter().enumerate() {
                let mut carry = 0u64;
                for (j, &y) in b.iter().enumerate() {
                    let t = u64::from(x) * u64::from(y) + u64::from(out[i + j]) + carry;
                    out[i + j] = t as Word;
                    carry = t >> LIMB_BITS;
                }
                out[i + b.len()] = carry as Word;
            }
        }
    }
}

/// `q = a / d`, returning `a % d`. `q` must hold `a.len()` limbs.
pub fn div_rem_limb(a: &[Word], d: Word, q: &mut [Word]) -> Word {
    debug_assert!(d != 0);
    let d = u64::from(d);
    let mut rem = 0u64;
    for i in (0..a.len()).rev() {
        let cur = (rem << LIMB_BITS) | u64::from(a[i]);
        q[i] = (cur / d) as Word;
        rem = cur % d;
    }
    rem as Word
}

/// `x = x / d` in place, returning `x % d`.
pub fn div_rem_limb_in_place(x: &mut [Word], d: Word) -> Word {
    debug_assert!(d != 0);
    let d = u64::from(d);
    let mut rem = 0u64;
    for limb in x.iter_mut().rev() {
        let cur = (rem << LIMB_BITS) | u64::from(*limb);
        *limb = (cur / d) as Word;
        rem = cur % d;
    }
    rem as Word
}

/// Knuth's Algorithm D: `q = u / v`, `r = u % v`.
///
/// `v` must be normalized with at least two limbs and `u.len() >= v.len()`.
/// `q` must hold `u.len() - v.len() + 1` limbs and `r` must hold `v.len()`.
pub fn div_rem(u: &[Word], v: &[Word], q: &mut [Word], r: &mut [Word]) {
    let m = u.len();
    let n = v.len();
    debug_assert!(n >= 2 && m >= n && v[n - 1] != 0);

    // D1: normalize so the divisor's top bit is set; the dividend gains a limb
    let shift = v[n - 1].leading_zeros();
    let mut vn = vec![0; n];
    shift_left(v, shift, &mut vn);
    let mut un = vec![0; m + 1];
    let overflow = shift_left(u, shift, &mut un[..m]);
    un[m] = overflow;

    let top = u64::from(vn[n - 1]);
    let next = u64::from(vn[n - 2]);
    for j in (0..=m - n).rev() {
        // D3: estimate from the top two limbs, then refine
        let num = (u64::from(un[j + n]) << LIMB_BITS) | u64::from(un[j + n - 1]);
        let mut qhat = num / top;
        let mut rhat = num % top;
        while qhat > LIMB_MASK
            || qhat * next > ((rhat << LIMB_BITS) | u64::from(un[j + n - 2]))
        {
            qhat -= 1;
            rhat += top;
            if rhat > LIMB_MASK {
                break;
            }
        }

        // D4: multiply and subtract
        let mut carry = 0u64;
        let mut borrow = 0u64;
        for i in 0..n {
            let product = qhat * u64::from(vn[i]) + carry;
            carry = product >> LIMB_BITS;
            let (diff, under) = u64::from(un[i + j]).overflowing_sub((product & LIMB_MASK) + borrow);
            un[i + j] = diff as Word;
            borrow = u64::from(under);
        }
        let (diff, under) = u64::from(un[j + n]).overflowing_sub(carry + borrow);
        un[j + n] = diff as Word;

        // D6: the estimate was one too large; add the divisor back
        if under {
            tracing::trace!(limb = j, "long division add-back");
            qhat -= 1;
            let mut carry = 0u64;
            for i in 0..n {
                let sum = u64::from(un[i + j]) + u64::from(vn[i]) + carry;
                un[i + j] = sum as Word;
                carry = sum >> LIMB_BITS;
            }
            un[j + n] = un[j + n].wrapping_add(carry as Word);
        }
        q[j] = qhat as Word;
    }

    // D8: unnormalize the remainder
    shift_right(&un[..n], shift, &mut r[..n]);
}

/// `out = src << shift` for `shift < LIMB_BITS`; returns the bits shifted out.
fn shift_left(src: &[Word], shift: u32, out: &mut [Word]) -> Word {
    if shift == 0 {
        out[..src.len()].copy_from_slice(src);
        return 0;
    }
    let mut carry = 0;
    for (i, &limb) in src.iter().enumerate() {
        out[i] = (limb << shift) | carry;
        carry = limb >> (LIMB_BITS - shift);
    }
    carry
}

/// `out = src >> shift` for `shift < LIMB_BITS`.
fn shift_right(src: &[Word], shift: u32, out: &mut [Word]) {
    if shift == 0 {
        out.copy_from_slice(src);
        return;
    }
    for i in 0..src.len() {
        let high = src.get(i + 1).map_or(0, |&next| next << (LIMB_BITS - shift));
        out[i] = (src[i] >> shift) | high;
    }
}
