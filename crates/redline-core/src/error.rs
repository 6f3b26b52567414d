//! Error types for change resolution and application.

use crate::version::VersionTag;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-distinguishable error category.
///
/// Mapping a kind to a transport status code is left to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Unsupported,
}

/// Errors that can occur while resolving or applying a change request.
///
/// `index` fields name the zero-based position of the offending spec within
/// its request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("change {index}: match text must not be empty")]
    EmptyMatchText { index: usize },

    #[error("change {index}: occurrence must be at least 1")]
    InvalidOccurrence { index: usize },

    #[error("change {index}: invalid range {start}..{end} (content length: {length})")]
    InvalidRange {
        index: usize,
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("change {index}: occurrence {occurrence} of {text:?} not found ({found} present)")]
    TargetNotFound {
        index: usize,
        text: String,
        occurrence: usize,
        found: usize,
    },

    #[error("changes {first} and {second} overlap")]
    OverlappingEdits { first: usize, second: usize },

    #[error("change {index}: unsupported operation: {operation}")]
    Unsupported { index: usize, operation: String },

    #[error("change {index}: {field}: {reason}")]
    MalformedChange {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("changes: request contains no changes")]
    EmptyRequest,

    #[error("changes: {count} changes exceeds the limit of {limit}")]
    TooManyChanges { count: usize, limit: usize },

    #[error("version mismatch: expected {expected}, current {current}")]
    Conflict {
        expected: VersionTag,
        current: VersionTag,
    },
}

impl EditError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditError::Conflict { .. } => ErrorKind::Conflict,
            EditError::Unsupported { .. } => ErrorKind::Unsupported,
            _ => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
