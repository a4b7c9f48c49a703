//! Property-based tests for filtering and pagination
//!
//! Tests invariants:
//! - Filtering keeps relative order and only drops documents
//! - Applying the same filter twice changes nothing
//! - An inactive filter is the identity
//! - Pages cover the filtered result exactly once
//! - The page cursor never leaves `0..total_pages`

use proptest::prelude::*;

use crate::core::filter::{apply_filters, FilterState, Pagination};
use crate::core::models::{Document, DocumentPayload, Keyword, TypeCategory};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_content_type() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("application/pdf".to_string())),
        Just(Some("image/jpeg".to_string())),
        Just(Some("application/msword".to_string())),
        Just(Some("text/plain".to_string())),
    ]
}

fn arb_payload() -> impl Strategy<Value = DocumentPayload> {
    prop_oneof![
        Just(DocumentPayload::Empty),
        "[a-z ]{0,30}".prop_map(DocumentPayload::Text),
        proptest::collection::vec("[a-z]{0,6}", 0..5)
            .prop_map(|words| DocumentPayload::Keywords(words.into_iter().map(Keyword::bare).collect())),
    ]
}

fn arb_documents() -> impl Strategy<Value = Vec<Document>> {
    proptest::collection::vec(
        ("[a-z]{1,8}\\.[a-z]{3}", 1u32..4, arb_content_type(), arb_payload()),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, day, content_type, payload))| {
                let mut doc = Document::new(format!("doc-{i}"), name)
                    .with_creation_date(format!("2024-01-0{day}T10:00:00Z"))
                    .with_payload(payload);
                doc.content_type = content_type;
                doc
            })
            .collect()
    })
}

fn arb_filter() -> impl Strategy<Value = FilterState> {
    (
        prop_oneof![Just(String::new()), "[a-z]{1,3}"],
        prop_oneof![Just(String::new()), (1u32..4).prop_map(|d| format!("2024-01-0{d}"))],
        prop_oneof![Just(None), proptest::sample::select(TypeCategory::all()).prop_map(Some)],
    )
        .prop_map(|(query, date, category)| FilterState { query, date, category })
}

fn position(docs: &[Document], id: &str) -> Option<usize> {
    docs.iter().position(|d| d.id == id)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: The filtered list is an order-preserving subsequence
    #[test]
    fn prop_filter_preserves_order(docs in arb_documents(), filter in arb_filter()) {
        let filtered = apply_filters(&docs, &filter);
        prop_assert!(filtered.len() <= docs.len());

        let positions: Vec<usize> = filtered
            .iter()
            .map(|d| position(&docs, &d.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(filtered.iter().all(|d| filter.matches(d)));
    }

    /// Property: Filtering is idempotent
    #[test]
    fn prop_filter_is_idempotent(docs in arb_documents(), filter in arb_filter()) {
        let once = apply_filters(&docs, &filter);
        let twice = apply_filters(&once, &filter);
        prop_assert_eq!(once, twice);
    }

    /// Property: No active filter means every document is kept
    #[test]
    fn prop_inactive_filter_is_identity(docs in arb_documents()) {
        prop_assert_eq!(apply_filters(&docs, &FilterState::default()), docs);
    }

    /// Property: Concatenated pages reproduce the full result
    #[test]
    fn prop_pages_partition_result(total in 0usize..200, page_size in 0usize..30) {
        let mut pagination = Pagination::new(page_size);
        pagination.reset(total);

        let mut seen = 0;
        loop {
            let range = pagination.range();
            prop_assert_eq!(range.start, seen);
            prop_assert!(range.end <= total);
            prop_assert!(range.len() <= pagination.page_size());
            seen = range.end;
            if !pagination.next() {
                break;
            }
        }
        prop_assert_eq!(seen, total);
        prop_assert_eq!(pagination.page_index() + 1, pagination.total_pages());
    }

    /// Property: The cursor stays in bounds under any sequence of moves
    #[test]
    fn prop_cursor_stays_in_bounds(
        total in 0usize..100,
        moves in proptest::collection::vec(any::<bool>(), 0..50)
    ) {
        let mut pagination = Pagination::new(12);
        pagination.reset(total);

        for forward in moves {
            if forward {
                pagination.next();
            } else {
                pagination.prev();
            }
            prop_assert!(pagination.total_pages() >= 1);
            prop_assert!(pagination.page_index() < pagination.total_pages());
        }
    }
}
