#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check the
// chain structure, not only the public surface.

use crate::error::TableError;
use crate::hash::bucket_index;
use crate::policy::{MAX_LOAD_FACTOR, MIN_BUCKET_COUNT};
use crate::table::HashTable;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations so failures shrink toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Get(usize),
    Delete(usize),
    Contains(String),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z0-9]{0,6}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => prop_oneof![contains_pool, "[a-z0-9]{0,6}"].prop_map(OpI::Contains),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_structure(t: &HashTable<String, i32>) -> Result<(), TestCaseError> {
    prop_assert!(t.bucket_count() >= MIN_BUCKET_COUNT);
    prop_assert_eq!(t.reachable(), t.len());
    for b in 0..t.bucket_count() {
        for k in t.chain_keys(b) {
            prop_assert_eq!(bucket_index(k, t.bucket_count()), b);
        }
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Insert succeeds iff the key is absent; a duplicate leaves len, value
//   and bucket count untouched.
// - get/contains_key agree with the model.
// - delete returns the model's value or KeyNotFound; a failed delete leaves
//   the bucket count untouched.
// - After each insert the load factor is at most MAX_LOAD_FACTOR.
// - Every entry is reachable from exactly the bucket its hash selects.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: HashTable<String, i32> = HashTable::new();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    let buckets_before = sut.bucket_count();
                    match sut.insert(k.clone(), v) {
                        Ok(()) => {
                            prop_assert!(!model.contains_key(&k), "insert must fail on duplicate");
                            model.insert(k, v);
                            prop_assert!(sut.load_factor() <= MAX_LOAD_FACTOR);
                        }
                        Err(TableError::DuplicateKey { key }) => {
                            prop_assert_eq!(&key, &k);
                            prop_assert!(model.contains_key(&k), "duplicate error only when key exists");
                            prop_assert_eq!(sut.bucket_count(), buckets_before);
                            prop_assert_eq!(sut.get(&k).ok(), model.get(&k));
                        }
                        Err(e) => prop_assert!(false, "unexpected error: {}", e),
                    }
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    match model.get(k) {
                        Some(v) => prop_assert_eq!(sut.get(k), Ok(v)),
                        None => prop_assert_eq!(sut.get(k), Err(TableError::not_found(k))),
                    }
                }
                OpI::Delete(i) => {
                    let k = &pool[i];
                    let buckets_before = sut.bucket_count();
                    match model.remove(k) {
                        Some(v) => prop_assert_eq!(sut.delete(k), Ok(v)),
                        None => {
                            prop_assert_eq!(sut.delete(k), Err(TableError::not_found(k)));
                            prop_assert_eq!(sut.bucket_count(), buckets_before);
                        }
                    }
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            check_structure(&sut)?;
        }

        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Ok(v));
        }
    }
}

// Property: inserting n distinct keys and deleting them all, in any order,
// walks the bucket count up by doubling and back down to one.
proptest! {
    #[test]
    fn prop_fill_then_drain(n in 0usize..300, seed in any::<u64>()) {
        let mut t: HashTable<usize, usize> = HashTable::new();
        let mut prev_buckets = t.bucket_count();
        for i in 0..n {
            t.insert(i, i).unwrap();
            let b = t.bucket_count();
            prop_assert!(b == prev_buckets || b == prev_buckets * 2);
            prev_buckets = b;
        }
        check_len_and_floor(&t, n)?;

        // Deterministic shuffle of the delete order.
        let mut order: Vec<usize> = (0..n).collect();
        let mut s = seed | 1;
        for i in (1..order.len()).rev() {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            order.swap(i, (s >> 33) as usize % (i + 1));
        }
        for (removed, k) in order.into_iter().enumerate() {
            prop_assert_eq!(t.delete(&k), Ok(k));
            let b = t.bucket_count();
            prop_assert!(b == prev_buckets || b * 2 == prev_buckets);
            prev_buckets = b;
            check_len_and_floor(&t, n - removed - 1)?;
        }
        prop_assert_eq!(t.bucket_count(), 1);
    }
}

fn check_len_and_floor(t: &HashTable<usize, usize>, expected: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(t.len(), expected);
    prop_assert_eq!(t.reachable(), expected);
    prop_assert!(t.bucket_count() >= MIN_BUCKET_COUNT);
    Ok(())
}
