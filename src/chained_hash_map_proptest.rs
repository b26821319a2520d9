#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket placement, which is not part of the public API.

use crate::chained_hash_map::{bucket_index, ChainedHashMap};
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    Has(String),
    Mutate(usize, i32),
    Clear,
    Enumerate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let has_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![has_pool.prop_map(|s: String| s), "[a-z]{0,5}".prop_map(|s| s)]
                .prop_map(OpI::Has),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Enumerate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = (usize, f64)> {
    (1usize..=8, prop_oneof![Just(0.25), Just(0.5), Just(0.75), Just(1.0)])
}

/// Structural invariants that must hold between any two operations.
fn check_structure(sut: &ChainedHashMap<i32>) -> Result<(), TestCaseError> {
    let keys = sut.keys();
    prop_assert_eq!(keys.len(), sut.len());

    // Every ordered key is reachable in the bucket its hash names.
    for k in keys {
        prop_assert_eq!(sut.hash(k), bucket_index(k, sut.capacity()));
        prop_assert!(sut.has(k), "ordered key {:?} not reachable", k);
    }

    // No duplicates in the key order.
    let mut sorted: Vec<&String> = keys.iter().collect();
    sorted.sort();
    sorted.dedup();
    prop_assert_eq!(sorted.len(), keys.len());

    prop_assert!(sut.occupied_buckets() <= sut.len().min(sut.capacity()));
    prop_assert!((sut.len() as f64) / (sut.capacity() as f64) < sut.load_factor());
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap plus
// a Vec modelling insertion order.
// Invariants exercised across random operation sequences:
// - `set` on an existing key overwrites without growing `len` or moving it
//   in the key order.
// - `get`/`has` parity with the model, also across resizes.
// - `remove` reports presence and keeps key order compact.
// - `clear` returns to the initial capacity with nothing stored.
// - Enumeration yields `(k, get(k))` in insertion order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, load_factor) in arb_config(), (pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<i32> =
            ChainedHashMap::with_capacity_and_load_factor(capacity, load_factor).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for op in ops {
            match op {
                OpI::Set(i, v) => {
                    let k = pool[i].clone();
                    let before = sut.len();
                    sut.set(k.as_str(), v);
                    if model.insert(k.clone(), v).is_none() {
                        order.push(k.clone());
                        prop_assert_eq!(sut.len(), before + 1);
                    } else {
                        prop_assert_eq!(sut.len(), before, "overwrite must not grow len");
                    }
                    prop_assert_eq!(sut.get(&k), Some(&v));
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    let expected = model.remove(k).is_some();
                    prop_assert_eq!(sut.remove(k), expected);
                    order.retain(|o| o != k);
                    prop_assert!(!sut.has(k));
                    prop_assert_eq!(sut.get(k), None);
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k));
                    prop_assert_eq!(sut.has(k), model.contains_key(k));
                }
                OpI::Has(s) => {
                    prop_assert_eq!(sut.has(&s), model.contains_key(&s));
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    match (sut.get_mut(k), model.get_mut(k)) {
                        (Some(sv), Some(mv)) => {
                            *sv = sv.saturating_add(d);
                            *mv = mv.saturating_add(d);
                        }
                        (None, None) => {}
                        (s, m) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m),
                    }
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                    order.clear();
                    prop_assert_eq!(sut.capacity(), capacity);
                    prop_assert_eq!(sut.occupied_buckets(), 0);
                }
                OpI::Enumerate => {
                    let entries = sut.entries();
                    let values = sut.values();
                    prop_assert_eq!(entries.len(), sut.len());
                    prop_assert_eq!(values.len(), sut.len());
                    for ((k, v), vv) in entries.iter().zip(values.iter()) {
                        prop_assert_eq!(Some(*v), sut.get(k));
                        prop_assert_eq!(*v, *vv);
                    }
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.keys(), order.as_slice());
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            check_structure(&sut)?;
        }
    }
}

// Property: the bucket index is always in range and depends only on the key
// and the capacity.
proptest! {
    #[test]
    fn prop_bucket_index_in_range(key in "\\PC{0,16}", capacity in 1usize..=4096) {
        let a = bucket_index(&key, capacity);
        prop_assert!(a < capacity);
        prop_assert_eq!(a, bucket_index(&key, capacity));
    }
}
