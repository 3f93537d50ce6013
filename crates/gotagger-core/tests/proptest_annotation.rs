//! Property-based tests for tag parsing and merging
//!
//! Tests that printing a parsed tag set and parsing it again is lossless, and
//! that merging never lets fallback data override explicit data.

use gotagger_core::{AnnotationEntry, AnnotationSet};
use proptest::prelude::*;

// Strategy: Generate namespaces the way Go tag keys usually look
fn arb_namespace() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,11}"
}

// Strategy: Generate values without commas (commas separate options)
fn arb_value() -> impl Strategy<Value = String> {
    "[^,]{0,16}"
}

// Strategy: Generate option names
fn arb_options() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z=0-9]{0,8}", 0..4)
}

fn arb_entry() -> impl Strategy<Value = AnnotationEntry> {
    (arb_namespace(), arb_value(), arb_options()).prop_map(|(namespace, value, options)| {
        options
            .into_iter()
            .fold(AnnotationEntry::new(namespace, value), AnnotationEntry::with_option)
    })
}

fn arb_set() -> impl Strategy<Value = AnnotationSet> {
    prop::collection::vec(arb_entry(), 0..6).prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    /// Property: Parse(Serialize(Parse(A))) == Parse(A)
    #[test]
    fn proptest_display_parse_roundtrip(set in arb_set()) {
        let printed = set.to_string();

        let parsed = AnnotationSet::parse(&printed)
            .expect("printed tag sets should always parse");
        let reprinted = AnnotationSet::parse(&parsed.to_string())
            .expect("reprinted tag sets should always parse");

        prop_assert_eq!(&parsed, &set);
        prop_assert_eq!(reprinted, parsed);
    }

    /// Property: Merge(A, A) == A
    #[test]
    fn proptest_merge_with_self_is_identity(set in arb_set()) {
        prop_assert_eq!(set.merge(&set), set);
    }

    /// Property: explicit primary data survives any fallback
    #[test]
    fn proptest_merge_primary_never_loses_data(primary in arb_set(), fallback in arb_set()) {
        let merged = primary.merge(&fallback);

        for entry in primary.iter() {
            let out = merged.get(entry.namespace()).expect("primary namespace kept");
            if !entry.value().is_empty() {
                prop_assert_eq!(out.value(), entry.value());
            }
            if !entry.options().is_empty() {
                prop_assert_eq!(out.options(), entry.options());
            }
        }
    }

    /// Property: merged namespaces are unique and cover both inputs
    #[test]
    fn proptest_merge_namespaces_unique(primary in arb_set(), fallback in arb_set()) {
        let merged = primary.merge(&fallback);

        let mut seen = std::collections::HashSet::new();
        for entry in merged.iter() {
            prop_assert!(seen.insert(entry.namespace().to_string()));
        }
        for entry in primary.iter().chain(fallback.iter()) {
            prop_assert!(merged.contains(entry.namespace()));
        }
    }
}
