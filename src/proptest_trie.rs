use crate::{ByteTrie, WILDCARD};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn key_value_pairs(
    min_pairs: usize,
    max_pairs: usize,
) -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::vec(
        (
            "[a-zA-Z0-9]{1,10}".prop_map(String::from),
            proptest::num::i32::ANY,
        ),
        min_pairs..max_pairs,
    )
}

/// Keys over a tiny alphabet, so prefix sharing and collisions are frequent.
fn clustered_pairs(
    min_pairs: usize,
    max_pairs: usize,
) -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::vec(
        ("[abc]{0,6}".prop_map(String::from), proptest::num::i32::ANY),
        min_pairs..max_pairs,
    )
}

fn binary_key_value_pairs(
    min_pairs: usize,
    max_pairs: usize,
) -> impl Strategy<Value = Vec<(Vec<u8>, i32)>> {
    proptest::collection::vec(
        (
            proptest::collection::vec(any::<u8>(), 0..20),
            proptest::num::i32::ANY,
        ),
        min_pairs..max_pairs,
    )
}

fn naive_longest_prefix<'q>(model: &BTreeMap<Vec<u8>, i32>, query: &'q [u8]) -> &'q [u8] {
    let best = model
        .keys()
        .filter(|k| query.starts_with(k))
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    &query[..best]
}

fn naive_match(model: &BTreeMap<Vec<u8>, i32>, pattern: &[u8]) -> Vec<Vec<u8>> {
    model
        .keys()
        .filter(|k| {
            k.len() == pattern.len()
                && k.iter()
                    .zip(pattern)
                    .all(|(&kb, &pb)| pb == WILDCARD || pb == kb)
        })
        .cloned()
        .collect()
}

proptest! {
    #[test]
    fn trie_matches_model_after_inserts(pairs in key_value_pairs(1, 100)) {
        let mut trie = ByteTrie::new();
        let mut model = BTreeMap::new();

        for (key, value) in &pairs {
            trie.insert(key, *value);
            model.insert(key.as_bytes().to_vec(), *value);
        }

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.get(key.as_slice()), Some(value));
            prop_assert!(trie.contains_key(key.as_slice()));
        }
    }

    #[test]
    fn trie_matches_model_with_binary_keys(pairs in binary_key_value_pairs(1, 100)) {
        let mut trie = ByteTrie::new();
        let mut model = BTreeMap::new();

        for (key, value) in &pairs {
            trie.insert(key.as_slice(), *value);
            model.insert(key.clone(), *value);
        }

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.get(key.as_slice()), Some(value));
        }
    }

    #[test]
    fn keys_enumerate_in_lexicographic_order(pairs in binary_key_value_pairs(1, 100)) {
        let mut trie = ByteTrie::new();
        let mut model = BTreeMap::new();

        for (key, value) in &pairs {
            trie.insert(key.as_slice(), *value);
            model.insert(key.clone(), *value);
        }

        // BTreeMap iterates in ascending byte order, which is exactly the
        // trie's enumeration contract.
        let trie_keys: Vec<_> = trie.keys().collect();
        let model_keys: Vec<_> = model.keys().cloned().collect();
        prop_assert_eq!(trie_keys, model_keys);

        let trie_pairs: Vec<(Vec<u8>, i32)> = trie.iter().map(|(k, &v)| (k, v)).collect();
        let model_pairs: Vec<(Vec<u8>, i32)> = model.iter().map(|(k, &v)| (k.clone(), v)).collect();
        prop_assert_eq!(trie_pairs, model_pairs);
    }

    #[test]
    fn interleaved_inserts_and_removes_match_model(
        ops in proptest::collection::vec(
            ("[abc]{0,5}".prop_map(String::from), proptest::num::i32::ANY, any::<bool>()),
            1..200,
        )
    ) {
        let mut trie = ByteTrie::new();
        let mut model: BTreeMap<Vec<u8>, i32> = BTreeMap::new();

        for (key, value, is_insert) in &ops {
            let bytes = key.as_bytes().to_vec();
            if *is_insert {
                trie.insert(key, *value);
                model.insert(bytes, *value);
            } else {
                let removed = trie.remove(key);
                prop_assert_eq!(removed, model.remove(&bytes));
            }
            prop_assert_eq!(trie.len(), model.len());
        }

        let trie_keys: Vec<_> = trie.keys().collect();
        let model_keys: Vec<_> = model.keys().cloned().collect();
        prop_assert_eq!(trie_keys, model_keys);
    }

    #[test]
    fn removing_every_key_prunes_everything(pairs in binary_key_value_pairs(1, 60)) {
        let mut trie = ByteTrie::new();
        for (key, value) in &pairs {
            trie.insert(key.as_slice(), *value);
        }

        for (key, _) in &pairs {
            trie.remove(key.as_slice());
        }

        prop_assert!(trie.is_empty());
        prop_assert_eq!(trie.len(), 0);
        prop_assert!(trie.keys().next().is_none());
        // Only the root node may survive a full teardown.
        prop_assert_eq!(trie.live_node_count(), 1);
    }

    #[test]
    fn longest_prefix_agrees_with_naive_scan(
        pairs in clustered_pairs(1, 60),
        query in "[abc]{0,10}".prop_map(String::from),
    ) {
        let mut trie = ByteTrie::new();
        let mut model = BTreeMap::new();

        for (key, value) in &pairs {
            trie.insert(key, *value);
            model.insert(key.as_bytes().to_vec(), *value);
        }

        prop_assert_eq!(
            trie.longest_prefix_of(query.as_str()),
            naive_longest_prefix(&model, query.as_bytes())
        );
    }

    #[test]
    fn wildcard_match_agrees_with_naive_filter(
        pairs in clustered_pairs(1, 60),
        pattern in "[abc.]{0,6}".prop_map(String::from),
    ) {
        let mut trie = ByteTrie::new();
        let mut model = BTreeMap::new();

        for (key, value) in &pairs {
            trie.insert(key, *value);
            model.insert(key.as_bytes().to_vec(), *value);
        }

        let matched: Vec<_> = trie.match_keys(pattern.as_str()).collect();
        prop_assert_eq!(matched, naive_match(&model, pattern.as_bytes()));
    }

    #[test]
    fn prefix_enumeration_agrees_with_naive_filter(
        pairs in clustered_pairs(1, 60),
        prefix in "[abc]{0,4}".prop_map(String::from),
    ) {
        let mut trie = ByteTrie::new();
        let mut model = BTreeMap::new();

        for (key, value) in &pairs {
            trie.insert(key, *value);
            model.insert(key.as_bytes().to_vec(), *value);
        }

        let trie_keys: Vec<_> = trie.prefix_keys(prefix.as_str()).collect();
        let model_keys: Vec<_> = model
            .keys()
            .filter(|k| k.starts_with(prefix.as_bytes()))
            .cloned()
            .collect();
        prop_assert_eq!(trie_keys, model_keys);
    }

    #[test]
    fn round_trip_through_serialization(pairs in key_value_pairs(1, 100)) {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Snapshot {
            data: Vec<(String, i32)>,
        }

        let mut trie = ByteTrie::new();
        for (key, value) in &pairs {
            trie.insert(key, *value);
        }

        let data: Vec<(String, i32)> = trie
            .iter()
            .map(|(k, &v)| (String::from_utf8(k).unwrap(), v))
            .collect();
        let snapshot = Snapshot { data };

        let serialized = serde_json::to_string(&snapshot).unwrap();
        let deserialized: Snapshot = serde_json::from_str(&serialized).unwrap();

        let mut restored = ByteTrie::new();
        for (key, value) in &deserialized.data {
            restored.insert(key, *value);
        }

        prop_assert_eq!(&trie, &restored);
        for (key, value) in trie.iter() {
            prop_assert_eq!(restored.get(key.as_slice()), Some(value));
        }
    }
}
