use bignum::{Int, Nat};
use num_bigint::BigUint;
use memory_manager::{Heap, HeapConfig};
use proptest::prelude::*;

/// A heap small enough that arithmetic collects often, with every
/// collection fully validated.
pub fn test_heap(space_words: usize) -> Heap {
    Heap::with_config(
        HeapConfig::default()
            .with_space_words(space_words)
            .with_verify_collections(true),
    )
}

/// Unsigned decimal text, leading zeros included
pub fn digits() -> impl Strategy<Value = String> {
    "[0-9]{1,60}"
}

/// Optionally signed decimal text
pub fn signed_digits() -> impl Strategy<Value = String> {
    ("[+-]?", digits()).prop_map(|(sign, digits)| format!("{sign}{digits}"))
}

/// Limb values at the normalization and quotient-correction boundaries
const EDGE_LIMBS: [u32; 6] = [0, 1, 0x7FFF_FFFF, 0x8000_0000, 0xFFFF_FFFE, 0xFFFF_FFFF];

/// Decimal text of a number built mostly from boundary limbs, one to eight
/// limbs long
pub fn edge_digits() -> impl Strategy<Value = String> {
    let limb = prop_oneof![
        3 => proptest::sample::select(&EDGE_LIMBS[..]),
        1 => any::<u32>(),
    ];
    proptest::collection::vec(limb, 1..=8)
        .prop_map(|limbs| BigUint::from_slice(&limbs).to_string())
}

/// Optionally negated [`edge_digits`]
pub fn signed_edge_digits() -> impl Strategy<Value = String> {
    (any::<bool>(), edge_digits())
        .prop_map(|(negative, digits)| if negative { format!("-{digits}") } else { digits })
}

/// Parses both operands and applies `op`, keeping the first rooted while the
/// second is parsed.
pub fn nat_binary<R>(
    heap: &mut Heap,
    lhs: &str,
    rhs: &str,
    op: impl FnOnce(&mut Heap, Nat, Nat) -> R,
) -> R {
    let a = Nat::parse(heap, lhs).unwrap();
    heap.with_roots([a.obj()], |heap, [a]| {
        let b = Nat::parse(heap, rhs).unwrap();
        let a = Nat::from_obj(heap.root(a));
        op(heap, a, b)
    })
}

/// Signed counterpart of [`nat_binary`]
pub fn int_binary<R>(
    heap: &mut Heap,
    lhs: &str,
    rhs: &str,
    op: impl FnOnce(&mut Heap, Int, Int) -> R,
) -> R {
    let a = Int::parse(heap, lhs).unwrap();
    heap.with_roots([a.obj()], |heap, [a]| {
        let b = Int::parse(heap, rhs).unwrap();
        let a = Int::from_obj(heap.root(a));
        op(heap, a, b)
    })
}
