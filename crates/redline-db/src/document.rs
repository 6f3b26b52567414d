//! Documents and their identifiers.

use chrono::{DateTime, Utc};
use redline_core::VersionTag;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl DocumentId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        DocumentId(id)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generation of a document.
///
/// Documents are immutable once published; a change produces a new
/// generation with new content, a new version tag and a fresh `updated_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: Arc<str>,
    /// Content-derived version tag.
    pub version: VersionTag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create the first generation of a document.
    pub fn new(id: DocumentId, title: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let now = Utc::now();

        Self {
            id,
            title: title.into(),
            version: VersionTag::of(&content),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// The next generation with replaced content.
    pub fn with_content(&self, content: Arc<str>, version: VersionTag) -> Self {
        Self {
            id: self.id,
            title: self.title.clone(),
            content,
            version,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    /// The next generation with a new title. Content and version are kept.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Length of the content in characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Whether the stored version still matches the content.
    pub fn is_consistent(&self) -> bool {
        self.version == VersionTag::of(&self.content)
    }
}
