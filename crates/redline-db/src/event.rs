//! Events emitted after a store mutation commits.

use crate::document::DocumentId;
use redline_core::{ResolvedEdit, VersionTag};
use std::sync::Arc;

/// A committed change to the store.
#[derive(Clone, Debug)]
pub enum StoreEvent {
    /// A document was created or loaded.
    Created {
        id: DocumentId,
        version: VersionTag,
    },
    /// A change request was applied.
    Changed {
        id: DocumentId,
        previous: VersionTag,
        version: VersionTag,
        old_content: Arc<str>,
        new_content: Arc<str>,
        edits: Vec<ResolvedEdit>,
    },
    /// A document's title changed.
    Renamed { id: DocumentId, title: String },
    /// A document was deleted.
    Deleted { id: DocumentId },
    /// The search index was rebuilt.
    Reindexed { documents: usize },
}

impl StoreEvent {
    /// The document the event is about, if any.
    pub fn document_id(&self) -> Option<DocumentId> {
        match self {
            StoreEvent::Created { id, .. }
            | StoreEvent::Changed { id, .. }
            | StoreEvent::Renamed { id, .. }
            | StoreEvent::Deleted { id } => Some(*id),
            StoreEvent::Reindexed { .. } => None,
        }
    }
}
