use bignum::{Int, Nat};
use proptest::prelude::*;

use crate::common::{digits, test_heap};

#[test]
fn test_rooted_nat_survives_forced_collection() {
    let text = "123456789012345678901234567890";
    let mut heap = test_heap(256);
    let n = Nat::parse(&mut heap, text).unwrap();
    let unforced = n.render(&heap);

    let rendered = heap.with_roots([n.obj()], |heap, [n]| {
        heap.collect();
        Nat::from_obj(heap.root(n)).render(heap)
    });
    assert_eq!(rendered, unforced);
    assert_eq!(rendered, text);
}

#[test]
fn test_factorial_under_pressure() {
    // 30! needs 4 limbs; a 128-word space forces many collections
    let mut heap = test_heap(128);
    let acc = heap.register_array_root();
    let one = Nat::from_u64(&mut heap, 1);
    heap.array_root_mut(acc).push(one.obj());

    for k in 2..=30u64 {
        let factor = Nat::from_u64(&mut heap, k);
        let current = Nat::from_obj(heap.array_root(acc)[0]);
        let next = Nat::mul(&mut heap, current, factor);
        heap.array_root_mut(acc)[0] = next.obj();
    }

    let result = Nat::from_obj(heap.array_root(acc)[0]);
    assert_eq!(result.render(&heap), "265252859812191058636308480000000");
    assert!(heap.stats().collections > 0);
    heap.deregister_array_root(acc);
}

#[test]
fn test_signed_accumulation_under_pressure() {
    let mut heap = test_heap(128);
    let acc = heap.register_array_root();
    let zero = Int::zero(&mut heap);
    heap.array_root_mut(acc).push(zero.obj());

    for k in 1..=200i64 {
        let term = Int::from_i64(&mut heap, if k % 2 == 0 { k } else { -k });
        let current = Int::from_obj(heap.array_root(acc)[0]);
        let next = Int::add(&mut heap, current, term);
        heap.array_root_mut(acc)[0] = next.obj();
    }

    let total = Int::from_obj(heap.array_root(acc)[0]);
    assert_eq!(total.render(&heap), "100");
    assert!(heap.stats().collections > 0);
}

proptest! {
    #[test]
    fn prop_values_survive_collection(texts in prop::collection::vec(digits(), 1..6)) {
        let mut heap = test_heap(1024);
        let roots = heap.register_array_root();
        let mut before = Vec::new();
        for text in &texts {
            let n = Nat::parse(&mut heap, text).unwrap();
            before.push(n.render(&heap));
            heap.array_root_mut(roots).push(n.obj());
            // garbage between the survivors
            Nat::parse(&mut heap, text).unwrap();
        }

        heap.collect();

        let after: Vec<String> = heap
            .array_root(roots)
            .iter()
            .map(|&obj| Nat::from_obj(obj).render(&heap))
            .collect();
        prop_assert_eq!(after, before);
        prop_assert!(heap.idle_space_is_zeroed());
    }
}
