//! # redline-index
//!
//! Full-text search for Redline documents.
//!
//! This crate provides:
//! - A tokenizer shared by indexing and querying
//! - An inverted index of token offsets, refreshed per document
//! - A query engine with occurrence scoring, context snippets and pagination
//!
//! ## Example
//!
//! ```rust
//! use redline_index::{InvertedIndex, SearchConfig, SearchOptions};
//! use std::sync::Arc;
//!
//! let mut index = InvertedIndex::new();
//! index.update_document(1, "Fruit", Arc::from("apple banana apple"));
//!
//! assert_eq!(index.lookup("apple").get(&1), Some(&vec![0, 13]));
//!
//! let results = index.search("apple", &SearchOptions::new(), &SearchConfig::default());
//! assert_eq!(results.total, 1);
//! assert_eq!(results.results[0].score, 2);
//! ```

pub mod config;
pub mod index;
pub mod query;
pub mod snippet;
pub mod tokenize;

pub use config::SearchConfig;
pub use index::{DocId, IndexedDocument, InvertedIndex, Offsets};
pub use query::{SearchHit, SearchOptions, SearchResults};
pub use tokenize::{normalize, tokenize, Token, Tokens};
