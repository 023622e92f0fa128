//! Property-based tests for flattening and the document codec.
//!
//! These tests use proptest to generate random nested documents and verify
//! that flattening invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::flatten::{flatten, lookup, parse_document, to_document, unflatten};
    use crate::merge::parse_path;
    use crate::merge::yaml::get_path;
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value as YamlValue};
    use std::path::Path;

    // ============================================================================
    // Strategies
    // ============================================================================

    fn leaf() -> impl Strategy<Value = YamlValue> {
        prop_oneof![
            any::<i64>().prop_map(YamlValue::from),
            any::<bool>().prop_map(YamlValue::from),
            "v[a-z0-9_-]{0,8}".prop_map(YamlValue::from),
            Just(YamlValue::Null),
            prop::collection::vec(any::<i32>().prop_map(YamlValue::from), 0..3)
                .prop_map(YamlValue::Sequence),
        ]
    }

    fn node() -> impl Strategy<Value = YamlValue> {
        leaf().prop_recursive(4, 32, 4, |inner| {
            prop::collection::btree_map("k[a-z]{0,4}", inner, 1..4).prop_map(|entries| {
                YamlValue::Mapping(
                    entries
                        .into_iter()
                        .map(|(k, v)| (YamlValue::from(k), v))
                        .collect(),
                )
            })
        })
    }

    fn document() -> impl Strategy<Value = Mapping> {
        prop::collection::btree_map("k[a-z]{0,4}", node(), 0..5).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (YamlValue::from(k), v))
                .collect()
        })
    }

    fn count_leaves(value: &YamlValue) -> usize {
        match value {
            YamlValue::Mapping(map) => map.values().map(count_leaves).sum(),
            _ => 1,
        }
    }

    // ============================================================================
    // flatten / unflatten
    // ============================================================================

    proptest! {
        /// Property: flatten produces exactly one entry per leaf
        #[test]
        fn flatten_one_entry_per_leaf(doc in document()) {
            let expected: usize = doc.values().map(count_leaves).sum();
            prop_assert_eq!(flatten(&doc).len(), expected);
        }

        /// Property: every flattened key addresses its leaf in the nested document
        #[test]
        fn flatten_keys_address_leaves(doc in document()) {
            let root = YamlValue::Mapping(doc.clone());
            for (key, value) in flatten(&doc) {
                prop_assert_eq!(get_path(&root, &parse_path(&key)), Some(&value));
            }
        }

        /// Property: unflatten restores a document that flattens identically
        #[test]
        fn unflatten_is_stable(doc in document()) {
            let flat = flatten(&doc);
            prop_assert_eq!(flatten(&unflatten(&flat)), flat);
        }

        /// Property: lookup of a top-level key returns its whole subtree
        #[test]
        fn lookup_returns_subtrees(doc in document()) {
            let flat = flatten(&doc);
            for (key, value) in &doc {
                let key = key.as_str().unwrap_or_default();
                prop_assert_eq!(lookup(&flat, key), Some(value.clone()));
            }
        }
    }

    // ============================================================================
    // Document codec
    // ============================================================================

    proptest! {
        /// Property: a serialized flat map parses back to the same map
        #[test]
        fn document_round_trip(doc in document()) {
            let flat = flatten(&doc);
            let text = to_document(&flat).unwrap();
            let parsed = parse_document(&text, Path::new("state.yaml")).unwrap();
            prop_assert_eq!(parsed, flat);
        }

        /// Property: serialized keys appear in sorted order
        #[test]
        fn document_keys_sorted(doc in document()) {
            let flat = flatten(&doc);
            let text = to_document(&flat).unwrap();
            let keys: Vec<&str> = text
                .lines()
                .filter(|line| !line.starts_with(' ') && !line.starts_with('-'))
                .filter_map(|line| line.split_once(':').map(|(k, _)| k))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }
    }
}
