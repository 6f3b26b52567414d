//! # redline-db
//!
//! Document store for Redline.
//!
//! This crate provides:
//! - Documents with content-derived version tags
//! - Change requests serialized per document, parallel across documents
//! - A search index that always matches the published content
//! - Change events for audit and undo consumers
//!
//! ## Example
//!
//! ```rust
//! use redline_db::{ChangeRequest, ChangeSpec, DocumentStore, SearchOptions};
//!
//! let store = DocumentStore::default();
//! let doc = store.create("Lease", "Rent is due on the first. Rent is fixed.").unwrap();
//!
//! let request = ChangeRequest::new(vec![ChangeSpec::text("Rent", 2, "The fee")])
//!     .with_expected(doc.version);
//! let outcome = store.apply_changes(doc.id, &request).unwrap();
//! assert_eq!(&*outcome.document.content, "Rent is due on the first. The fee is fixed.");
//!
//! // The old tag is now stale.
//! assert!(store.apply_changes(doc.id, &request).unwrap_err().is_conflict());
//!
//! let results = store.search("fee", &SearchOptions::new()).unwrap();
//! assert_eq!(results.total, 1);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod store;

pub use config::{StoreConfig, StoreConfigBuilder};
pub use document::{Document, DocumentId};
pub use error::{DbError, Result};
pub use event::StoreEvent;
pub use store::{parse_change_set, ChangeOutcome, DocumentStore, StoreStats};

// Re-exports for callers that only depend on the store
pub use redline_core::{ChangeRequest, ChangeSpec, ErrorKind, ResolvedEdit, VersionTag};
pub use redline_index::{SearchConfig, SearchHit, SearchOptions, SearchResults};
