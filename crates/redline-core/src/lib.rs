//! # redline-core
//!
//! Change engine for Redline documents.
//!
//! This crate provides:
//! - Content-addressed version tags (SHA-256, ETag-style)
//! - An optimistic concurrency gate
//! - A resolver that turns change specs into disjoint, concrete edits
//! - A single-pass applicator, with inverse edits for undo and audit
//!
//! ## Example
//!
//! ```rust
//! use redline_core::{apply_changes, ChangeRequest, ChangeSpec, VersionTag};
//!
//! let content = "The contract contains the contract terms.";
//! let tag = VersionTag::of(content);
//!
//! let request = ChangeRequest::new(vec![ChangeSpec::text("contract", 2, "agreement")])
//!     .with_expected(tag);
//! let applied = apply_changes(content, &tag, &request).unwrap();
//!
//! assert_eq!(applied.content, "The contract contains the agreement terms.");
//! assert_ne!(applied.tag, tag);
//! ```

pub mod apply;
pub mod change;
pub mod error;
pub mod gate;
pub mod resolve;
mod text;
pub mod version;

pub use apply::{apply_changes, apply_edits, invert, Applied};
pub use change::{
    ChangeOperation, ChangeRange, ChangeRequest, ChangeSet, ChangeSpec, ChangeTarget,
    ResolvedEdit,
};
pub use error::{EditError, ErrorKind, Result};
pub use resolve::{resolve_and_validate, Resolver, DEFAULT_MAX_CHANGES};
pub use version::{ParseTagError, VersionTag};
