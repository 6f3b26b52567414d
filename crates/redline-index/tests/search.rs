//! Integration tests for the inverted index and query engine.
//!
//! Tests cover:
//! - Posting offsets for the documented example
//! - Index state after arbitrary update/remove sequences
//! - Ranking and pagination guarantees

use proptest::prelude::*;
use redline_index::{tokenize, InvertedIndex, SearchConfig, SearchOptions};
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn test_update_then_remove() {
    let mut index = InvertedIndex::new();
    index.update_document(1, "Fruit", Arc::from("apple banana apple"));
    assert_eq!(index.lookup("apple").get(&1), Some(&vec![0, 13]));

    index.remove_document(1);
    assert!(index.lookup("apple").is_empty());
}

#[test]
fn test_ranking_by_occurrences() {
    let mut index = InvertedIndex::new();
    index.update_document(1, "B", Arc::from("warranty"));
    index.update_document(2, "A", Arc::from("warranty, warranty and warranty"));

    let results = index.search("warranty", &SearchOptions::new(), &SearchConfig::default());
    let order: Vec<_> = results.results.iter().map(|h| h.document_id).collect();
    assert_eq!(order, vec![2, 1]);
}

#[derive(Clone, Debug)]
enum Op {
    Update(u64, String),
    Remove(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..5, "[a-d ]{0,30}").prop_map(|(id, c)| Op::Update(id, c)),
        (0u64..5).prop_map(Op::Remove),
    ]
}

/// Postings computed from scratch for the live documents.
fn expected_postings(docs: &BTreeMap<u64, String>) -> BTreeMap<String, BTreeMap<u64, Vec<usize>>> {
    let mut expected: BTreeMap<String, BTreeMap<u64, Vec<usize>>> = BTreeMap::new();
    for (id, content) in docs {
        for token in tokenize(content) {
            expected
                .entry(token.text)
                .or_default()
                .entry(*id)
                .or_default()
                .push(token.offset);
        }
    }
    expected
}

proptest! {
    #[test]
    fn index_matches_fresh_build(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut index = InvertedIndex::new();
        let mut live: BTreeMap<u64, String> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Update(id, content) => {
                    index.update_document(id, "", Arc::from(content.as_str()));
                    live.insert(id, content);
                }
                Op::Remove(id) => {
                    prop_assert_eq!(index.remove_document(id), live.remove(&id).is_some());
                }
            }
        }

        let expected = expected_postings(&live);
        prop_assert_eq!(index.token_count(), expected.len());
        prop_assert_eq!(index.document_count(), live.len());
        for (token, docs) in &expected {
            prop_assert_eq!(&index.lookup(token), docs);
        }
    }

    #[test]
    fn pages_are_full_and_totals_stable(
        counts in prop::collection::vec(0usize..6, 1..12),
        limit in 0usize..6,
        offset in 0usize..14,
    ) {
        let mut index = InvertedIndex::new();
        for (i, n) in counts.iter().enumerate() {
            let content = format!("x {}", "term ".repeat(*n));
            index.update_document(i as u64, "", Arc::from(content.as_str()));
        }
        let total = counts.iter().filter(|n| **n > 0).count();

        let options = SearchOptions::new().limit(limit).offset(offset);
        let page = index.search("term", &options, &SearchConfig::default());

        prop_assert_eq!(page.total, total);
        prop_assert_eq!(page.results.len(), limit.min(total.saturating_sub(offset)));
        for pair in page.results.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].document_id < pair[1].document_id)
            );
        }
    }
}
