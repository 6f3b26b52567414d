//! Error types for the document store.

use crate::document::DocumentId;
use redline_core::{EditError, ErrorKind};
use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Document already exists: {0}")]
    DocumentExists(DocumentId),

    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl DbError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::DocumentNotFound(_) => ErrorKind::NotFound,
            DbError::DocumentExists(_) => ErrorKind::Conflict,
            DbError::InvalidTitle(_)
            | DbError::InvalidContent(_)
            | DbError::SerializationError(_) => ErrorKind::Validation,
            DbError::Edit(err) => err.kind(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
