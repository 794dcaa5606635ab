use bignum::{Int, Sign};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use proptest::prelude::*;

use crate::common::{int_binary, signed_digits, signed_edge_digits, test_heap};

fn oracle(text: &str) -> BigInt {
    text.parse().unwrap()
}

#[test]
fn test_truncating_division_scenario() {
    let mut heap = test_heap(256);
    let (q, r) = int_binary(&mut heap, "-7", "2", |heap, a, b| {
        let (q, r) = Int::div_rem(heap, a, b);
        (q.render(heap), r.render(heap))
    });
    assert_eq!(q, "-3");
    assert_eq!(r, "-1");
}

proptest! {
    #[test]
    fn prop_render_is_canonical(text in signed_digits()) {
        let mut heap = test_heap(512);
        let n = Int::parse(&mut heap, &text).unwrap();
        prop_assert_eq!(n.render(&heap), oracle(&text).to_string());
    }

    #[test]
    fn prop_add_sub_match_oracle(a in signed_digits(), b in signed_digits()) {
        let mut heap = test_heap(512);
        let sum = int_binary(&mut heap, &a, &b, |heap, a, b| Int::add(heap, a, b).render(heap));
        prop_assert_eq!(sum, (oracle(&a) + oracle(&b)).to_string());
        let diff = int_binary(&mut heap, &a, &b, |heap, a, b| Int::sub(heap, a, b).render(heap));
        prop_assert_eq!(diff, (oracle(&a) - oracle(&b)).to_string());
    }

    #[test]
    fn prop_mul_matches_oracle(a in signed_digits(), b in signed_digits()) {
        let mut heap = test_heap(512);
        let product = int_binary(&mut heap, &a, &b, |heap, a, b| Int::mul(heap, a, b).render(heap));
        prop_assert_eq!(product, (oracle(&a) * oracle(&b)).to_string());
    }

    #[test]
    fn prop_truncating_division(a in signed_digits(), b in signed_digits()) {
        prop_assume!(!oracle(&b).is_zero());
        let mut heap = test_heap(512);
        let (q, r) = int_binary(&mut heap, &a, &b, |heap, a, b| {
            let (q, r) = Int::div_rem(heap, a, b);
            (q.render(heap), r.render(heap))
        });
        let (x, y) = (oracle(&a), oracle(&b));
        let (q, r) = (oracle(&q), oracle(&r));
        prop_assert_eq!(&y * &q + &r, x.clone());
        prop_assert!(r.abs() < y.abs());
        prop_assert!(r.is_zero() || r.sign() == x.sign());
        prop_assert_eq!(q, &x / &y);
    }

    #[test]
    fn prop_compare_matches_oracle(a in signed_digits(), b in signed_digits()) {
        let mut heap = test_heap(512);
        let ordering = int_binary(&mut heap, &a, &b, |heap, a, b| Int::compare(heap, a, b));
        prop_assert_eq!(ordering, oracle(&a).cmp(&oracle(&b)));
    }

    #[test]
    fn prop_zero_is_positive(text in signed_digits()) {
        let mut heap = test_heap(512);
        let signs = int_binary(&mut heap, &text, &text, |heap, a, b| {
            let diff = Int::sub(heap, a, b);
            let diff_sign = diff.sign(heap);
            (diff.is_zero(heap), diff_sign)
        });
        prop_assert_eq!(signs, (true, Sign::Positive));

        let negated = int_binary(&mut heap, &text, "0", |heap, a, zero| {
            let product = Int::mul(heap, a, zero);
            let product = Int::neg(heap, product);
            product.sign(heap)
        });
        prop_assert_eq!(negated, Sign::Positive);
    }

    #[test]
    fn prop_inc_dec_match_oracle(text in signed_digits()) {
        let mut heap = test_heap(512);
        let n = Int::parse(&mut heap, &text).unwrap();
        let up = heap.with_roots([n.obj()], |heap, [n]| {
            let value = Int::from_obj(heap.root(n));
            let up = Int::inc(heap, value).render(heap);
            let value = Int::from_obj(heap.root(n));
            let down = Int::dec(heap, value).render(heap);
            (up, down)
        });
        prop_assert_eq!(up.0, (oracle(&text) + 1i32).to_string());
        prop_assert_eq!(up.1, (oracle(&text) - 1i32).to_string());
    }

    #[test]
    fn prop_boundary_limb_arithmetic(a in signed_edge_digits(), b in signed_edge_digits()) {
        let mut heap = test_heap(64);
        let diff = int_binary(&mut heap, &a, &b, |heap, a, b| Int::sub(heap, a, b).render(heap));
        prop_assert_eq!(diff, (oracle(&a) - oracle(&b)).to_string());
        let product = int_binary(&mut heap, &a, &b, |heap, a, b| Int::mul(heap, a, b).render(heap));
        prop_assert_eq!(product, (oracle(&a) * oracle(&b)).to_string());
        let n = Int::parse(&mut heap, &a).unwrap();
        prop_assert_eq!(Int::dec(&mut heap, n).render(&heap), (oracle(&a) - 1i32).to_string());
        if !oracle(&b).is_zero() {
            let (q, r) = int_binary(&mut heap, &a, &b, |heap, a, b| {
                let (q, r) = Int::div_rem(heap, a, b);
                (q.render(heap), r.render(heap))
            });
            prop_assert_eq!(q, (oracle(&a) / oracle(&b)).to_string());
            prop_assert_eq!(r, (oracle(&a) % oracle(&b)).to_string());
        }
    }
}
