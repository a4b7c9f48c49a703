//! Property-based tests for payload normalization
//!
//! Tests invariants:
//! - Normalizers are total over arbitrary JSON
//! - Every kept document has a non-empty id
//! - Keyword arrays keep their length
//! - Keyword counts are non-negative and percents fall in 0..=100

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::core::normalize::{
    decode_payload, normalize_keyword, normalize_keyword_payload, normalize_list,
};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Arbitrary JSON, a few levels deep.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|n| json!(n)),
        ".{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            proptest::collection::hash_map("[a-zA-Z0-9_]{1,10}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Keyword items in the shapes the backend has been seen to send.
fn arb_keyword_item() -> impl Strategy<Value = Value> {
    prop_oneof![
        ("[a-z]{0,8}", -50.0f64..500.0, -50.0f64..500.0)
            .prop_map(|(w, c, p)| json!({"word": w, "count": c, "percent": p})),
        ("[a-z]{0,8}", 0u32..100, 0u32..100).prop_map(|(w, c, p)| json!([w, c, p])),
        ("[a-z]{0,8}", "[0-9]{1,3}").prop_map(|(w, p)| json!({"0": w, "2": p})),
        "[a-z ]{0,8}".prop_map(Value::String),
        arb_json(),
    ]
}

/// A backend document record, sometimes missing its id.
fn arb_document_record() -> impl Strategy<Value = Value> {
    (
        prop_oneof![
            "[a-z0-9-]{1,12}".prop_map(Value::String),
            any::<u32>().prop_map(|n| json!(n)),
            Just(Value::Null),
            Just(json!("")),
        ],
        "[a-z]{1,10}\\.(pdf|png|txt)",
        arb_json(),
    )
        .prop_map(|(id, name, data)| {
            json!({"id": id, "fileName": name, "creationDate": "2024-01-01T00:00:00Z", "data": data})
        })
}

fn has_usable_id(record: &Value) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Normalizers never panic on arbitrary input
    #[test]
    fn prop_normalizers_are_total(raw in arb_json()) {
        let _ = normalize_list(&raw);
        let _ = normalize_keyword_payload(&raw);
        let _ = normalize_keyword(&raw);
        let _ = decode_payload(Some(&raw));
    }

    /// Property: Exactly the records with a usable id survive, in order
    #[test]
    fn prop_list_keeps_records_with_ids(records in proptest::collection::vec(arb_document_record(), 0..20)) {
        let docs = normalize_list(&Value::Array(records.clone()));
        let expected = records.iter().filter(|r| has_usable_id(r)).count();

        prop_assert_eq!(docs.len(), expected);
        prop_assert!(docs.iter().all(|d| !d.id.is_empty()));

        let enveloped = normalize_list(&json!({"results": records}));
        prop_assert_eq!(enveloped, docs);
    }

    /// Property: Array payloads keep one keyword per element
    #[test]
    fn prop_keyword_array_keeps_cardinality(items in proptest::collection::vec(arb_keyword_item(), 0..20)) {
        let raw = Value::Array(items.clone());
        prop_assert_eq!(normalize_keyword_payload(&raw).len(), items.len());

        // The same array sent as a JSON string keeps its length too.
        let encoded = Value::String(raw.to_string());
        prop_assert_eq!(normalize_keyword_payload(&encoded).len(), items.len());
    }

    /// Property: Keyword numbers stay in range whatever the input
    #[test]
    fn prop_keyword_numbers_in_range(item in arb_keyword_item()) {
        let keyword = normalize_keyword(&item);
        prop_assert!(keyword.count >= 0.0);
        prop_assert!((0.0..=100.0).contains(&keyword.percent));
    }

    /// Property: Comma-separated text yields one keyword per non-empty word
    #[test]
    fn prop_comma_text_splits_into_words(words in proptest::collection::vec("w[a-z]{0,7}", 1..10)) {
        let raw = Value::String(words.join(", "));
        let parsed: Vec<String> = normalize_keyword_payload(&raw).into_iter().map(|k| k.word).collect();
        prop_assert_eq!(parsed, words);
    }
}
