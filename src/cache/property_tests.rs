//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple reference model.

use proptest::prelude::*;
use std::collections::VecDeque;

use crate::cache::{CacheStore, InsertOutcome, MAX_OBJECT_SIZE};
use crate::error::CacheError;

// == Test Configuration ==
const TEST_CAPACITY: usize = 1000;
const TEST_MAX_OBJECT: usize = 300;

// == Strategies ==
/// Small key space so lookups and duplicate inserts actually collide
fn key_strategy() -> impl Strategy<Value = String> {
    "http://h/[a-h]".prop_map(|s| s)
}

/// Payloads straddling the object limit
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=TEST_MAX_OBJECT + 20)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: String, payload: Vec<u8> },
    Lookup { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), payload_strategy())
            .prop_map(|(key, payload)| CacheOp::Insert { key, payload }),
        key_strategy().prop_map(|key| CacheOp::Lookup { key }),
    ]
}

// == Reference Model ==
/// Front = most recently used.
#[derive(Default)]
struct Model {
    order: VecDeque<(String, Vec<u8>)>,
}

impl Model {
    fn total(&self) -> usize {
        self.order.iter().map(|(_, p)| p.len()).sum()
    }

    fn touch(&mut self, key: &str) -> Option<Vec<u8>> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        let item = self.order.remove(pos)?;
        let payload = item.1.clone();
        self.order.push_front(item);
        Some(payload)
    }

    fn insert(&mut self, key: String, payload: Vec<u8>) {
        if payload.len() > TEST_MAX_OBJECT || self.touch(&key).is_some() {
            return;
        }
        if self.total() + payload.len() > TEST_CAPACITY {
            let mut freed = 0;
            while freed < payload.len() {
                match self.order.pop_back() {
                    Some((_, p)) => freed += p.len(),
                    None => break,
                }
            }
        }
        self.order.push_front((key, payload));
    }

    fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(k, _)| k.clone()).collect()
    }
}

fn store_keys(store: &CacheStore) -> Vec<String> {
    store.entries().map(|e| e.key().to_string()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // **Property: Recency Order and Eviction Correctness**
    // *For any* sequence of lookups and inserts, the store's entries read
    // head-to-tail SHALL match a reference LRU model exactly, so eviction
    // removes only the least recently used entries.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::with_limits(TEST_CAPACITY, TEST_MAX_OBJECT);
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Insert { key, payload } => {
                    let _ = store.insert(key.clone(), payload.clone());
                    model.insert(key, payload);
                }
                CacheOp::Lookup { key } => {
                    let got = store.lookup(&key).map(<[u8]>::to_vec);
                    let expected = model.touch(&key);
                    prop_assert_eq!(got, expected, "Lookup result mismatch for {}", key);
                }
            }
            prop_assert_eq!(store_keys(&store), model.keys(), "Recency order mismatch");
            prop_assert_eq!(store.current_size(), model.total(), "Byte total mismatch");
        }
    }

    // **Property: Capacity Enforcement**
    // *For any* sequence of inserts, the sum of cached payload sizes SHALL
    // never exceed the cache capacity, and keys SHALL stay unique.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), payload_strategy()), 1..120)
    ) {
        let mut store = CacheStore::with_limits(TEST_CAPACITY, TEST_MAX_OBJECT);

        for (key, payload) in entries {
            let _ = store.insert(key, payload);

            let total: usize = store.entries().map(|e| e.size()).sum();
            prop_assert!(total <= TEST_CAPACITY, "Cache size {} exceeds {}", total, TEST_CAPACITY);
            prop_assert_eq!(total, store.current_size());

            let mut keys = store_keys(&store);
            let len = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), len, "Duplicate live keys");
        }
    }

    // **Property: Eviction Stops at Target**
    // *For any* full store, inserting a new object SHALL evict tail entries
    // only until the freed total first reaches the object's size.
    #[test]
    fn prop_eviction_stops_at_target(
        sizes in prop::collection::vec(1usize..=TEST_MAX_OBJECT, 4..12),
        new_size in 1usize..=TEST_MAX_OBJECT
    ) {
        let mut store = CacheStore::with_limits(TEST_CAPACITY, TEST_MAX_OBJECT);
        for (i, size) in sizes.iter().enumerate() {
            let _ = store.insert(format!("k{}", i), vec![0u8; *size]);
        }

        let before: Vec<(String, usize)> = store
            .entries()
            .map(|e| (e.key().to_string(), e.size()))
            .collect();
        let needs_eviction = store.current_size() + new_size > TEST_CAPACITY;

        let outcome = store.insert("new", vec![1u8; new_size]).unwrap();

        let mut expected_evicted = 0;
        let mut survivors = before.clone();
        if needs_eviction {
            while expected_evicted < new_size {
                match survivors.pop() {
                    Some((_, size)) => expected_evicted += size,
                    None => break,
                }
            }
        }
        prop_assert_eq!(outcome, InsertOutcome::Inserted { evicted_bytes: expected_evicted });

        let mut expected_keys = vec!["new".to_string()];
        expected_keys.extend(survivors.into_iter().map(|(k, _)| k));
        prop_assert_eq!(store_keys(&store), expected_keys);
    }

    // **Property: Cache Fidelity**
    // *For any* cacheable payload, a later lookup SHALL return the identical
    // byte sequence.
    #[test]
    fn prop_cache_fidelity(key in key_strategy(), payload in prop::collection::vec(any::<u8>(), 0..2048)) {
        let mut store = CacheStore::new();

        store.insert(key.clone(), payload.clone()).unwrap();

        prop_assert_eq!(store.lookup(&key), Some(payload.as_slice()));
    }

    // **Property: Eligibility Boundary**
    // *For any* store state, objects above the object limit SHALL never be cached.
    #[test]
    fn prop_oversized_never_cached(extra in 1usize..64, filler in 0usize..4) {
        let mut store = CacheStore::new();
        for i in 0..filler {
            store.insert(format!("f{}", i), vec![0u8; 10]).unwrap();
        }

        let result = store.insert("big", vec![0u8; MAX_OBJECT_SIZE + extra]);

        prop_assert!(
            matches!(result, Err(CacheError::ObjectTooLarge { .. })),
            "Oversized object was not rejected"
        );
        prop_assert!(store.lookup("big").is_none());
        prop_assert_eq!(store.len(), filler);
    }
}
