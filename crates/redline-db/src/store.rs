//! Document Store - documents, change application and search in one place.
//!
//! Provides:
//! - Document lifecycle (create, load, rename, delete)
//! - Change requests under optimistic concurrency
//! - Ranked full-text search over a consistent index
//!
//! ## Locking
//!
//! Every document owns a slot with an exclusive write lock. A change holds
//! that lock from reading the current version until the new generation is
//! published, so writers to one document are serialized while writers to
//! different documents only meet briefly at the index lock.
//!
//! The index keeps its own content snapshot per document; postings and
//! snapshot are swapped together under the index write lock, and the new
//! document generation is published inside the same critical section.
//!
//! Lock order: slot write lock, then index, then slot table, then slot
//! snapshot. New ids are checked and inserted while the slot table write
//! lock is held, so a live slot is never replaced.

use crate::config::StoreConfig;
use crate::document::{Document, DocumentId};
use crate::error::{DbError, Result};
use crate::event::StoreEvent;
use parking_lot::{Mutex, RwLock};
use redline_core::{
    gate, invert, ChangeRequest, ChangeSet, ChangeSpec, ResolvedEdit, Resolver, VersionTag,
};
use redline_index::{InvertedIndex, SearchOptions, SearchResults};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Per-document lock and published generation.
struct Slot {
    write: Mutex<()>,
    /// `None` once the document is deleted.
    current: RwLock<Option<Arc<Document>>>,
}

impl Slot {
    fn new(doc: Arc<Document>) -> Self {
        Self {
            write: Mutex::new(()),
            current: RwLock::new(Some(doc)),
        }
    }

    fn snapshot(&self) -> Option<Arc<Document>> {
        self.current.read().clone()
    }
}

/// The result of a successful change request.
#[derive(Clone, Debug)]
pub struct ChangeOutcome {
    /// The newly published generation.
    pub document: Arc<Document>,
    /// The generation the request was applied to.
    pub previous: Arc<Document>,
    /// Applied edits, sorted by position in the previous content.
    pub edits: Vec<ResolvedEdit>,
}

impl ChangeOutcome {
    /// Edits against the new content that would restore the previous one.
    pub fn inverse(&self) -> Vec<ResolvedEdit> {
        invert(&self.edits)
    }
}

/// Store-wide counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub documents: usize,
    pub indexed_documents: usize,
    pub tokens: usize,
    pub total_chars: usize,
}

/// An in-memory document store with a live search index.
///
/// The store is `Send + Sync`; share it behind an `Arc`.
pub struct DocumentStore {
    config: StoreConfig,
    resolver: Resolver,
    slots: RwLock<BTreeMap<DocumentId, Arc<Slot>>>,
    index: RwLock<InvertedIndex>,
    next_id: AtomicU64,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl DocumentStore {
    /// Create a new, empty store.
    pub fn new(config: StoreConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            resolver: Resolver::new(config.max_changes),
            config,
            slots: RwLock::new(BTreeMap::new()),
            index: RwLock::new(InvertedIndex::new()),
            next_id: AtomicU64::new(1),
            event_tx,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Subscribe to committed changes.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        let _ = self.event_tx.send(event);
    }

    fn slot(&self, id: DocumentId) -> Result<Arc<Slot>> {
        self.slots
            .read()
            .get(&id)
            .cloned()
            .ok_or(DbError::DocumentNotFound(id))
    }

    fn validate_title(&self, title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(DbError::InvalidTitle("title must not be empty".to_string()));
        }
        let len = title.chars().count();
        if len > self.config.max_title_len {
            return Err(DbError::InvalidTitle(format!(
                "title is {} characters, limit is {}",
                len, self.config.max_title_len
            )));
        }
        Ok(())
    }

    /// Insert a new document under the index and slot table locks.
    ///
    /// `id` of `None` takes the next free id; a supplied id must not be
    /// live. Id assignment, the occupancy check and publication happen in
    /// one critical section.
    fn publish_new(
        &self,
        id: Option<DocumentId>,
        build: impl FnOnce(DocumentId) -> Document,
    ) -> Result<Arc<Document>> {
        let doc = {
            let mut index = self.index.write();
            let mut slots = self.slots.write();

            let id = match id {
                Some(id) => id,
                None => DocumentId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            };
            let Entry::Vacant(entry) = slots.entry(id) else {
                return Err(DbError::DocumentExists(id));
            };
            self.next_id
                .fetch_max(id.get().saturating_add(1), Ordering::SeqCst);

            let doc = Arc::new(build(id));
            index.update_document(id.get(), doc.title.clone(), doc.content.clone());
            entry.insert(Arc::new(Slot::new(doc.clone())));
            doc
        };

        info!(document_id = %doc.id, version = %doc.version.short(), "document created");
        self.emit(StoreEvent::Created {
            id: doc.id,
            version: doc.version,
        });
        Ok(doc)
    }

    // === Document CRUD ===

    /// Create a document with the next free id.
    pub fn create(
        &self,
        title: impl Into<String>,
        content: impl Into<Arc<str>>,
    ) -> Result<Arc<Document>> {
        let title = title.into();
        let content = content.into();
        self.validate_title(&title)?;
        if content.is_empty() {
            return Err(DbError::InvalidContent("content must not be empty".to_string()));
        }

        self.publish_new(None, |id| Document::new(id, title, content))
    }

    /// Import an existing document row, keeping its id and timestamps.
    ///
    /// The version tag is recomputed from the content.
    pub fn load(&self, document: Document) -> Result<Arc<Document>> {
        self.validate_title(&document.title)?;

        let version = VersionTag::of(&document.content);
        if version != document.version {
            debug!(document_id = %document.id, "recomputed stale version tag on load");
        }

        self.publish_new(Some(document.id), |_| Document {
            version,
            ..document
        })
    }

    /// Get the current generation of a document.
    pub fn get(&self, id: DocumentId) -> Result<Arc<Document>> {
        self.slot(id)?
            .snapshot()
            .ok_or(DbError::DocumentNotFound(id))
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.get(id).is_ok()
    }

    /// Documents in id order.
    pub fn list(&self, offset: usize, limit: usize) -> Vec<Arc<Document>> {
        let slots: Vec<Arc<Slot>> = self.slots.read().values().cloned().collect();
        slots
            .iter()
            .filter_map(|slot| slot.snapshot())
            .skip(offset)
            .take(limit)
            .collect()
    }

    /// Number of live documents.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete a document and purge it from the index.
    pub fn delete(&self, id: DocumentId) -> Result<Arc<Document>> {
        let slot = self.slot(id)?;
        let _guard = slot.write.lock();

        // A live snapshot cannot change while the write lock is held
        let removed = slot.snapshot().ok_or(DbError::DocumentNotFound(id))?;
        {
            let mut index = self.index.write();
            index.remove_document(id.get());
            self.slots.write().remove(&id);
            *slot.current.write() = None;
        }

        info!(document_id = %id, "document deleted");
        self.emit(StoreEvent::Deleted { id });
        Ok(removed)
    }

    /// Change a document's title. Content and version tag are unchanged.
    pub fn rename(
        &self,
        id: DocumentId,
        title: impl Into<String>,
        expected: Option<&VersionTag>,
    ) -> Result<Arc<Document>> {
        let title = title.into();
        self.validate_title(&title)?;

        let slot = self.slot(id)?;
        let _guard = slot.write.lock();
        let current = slot.snapshot().ok_or(DbError::DocumentNotFound(id))?;
        gate::check(&current.version, expected)?;

        let renamed = Arc::new(current.with_title(title.clone()));
        {
            let mut index = self.index.write();
            index.set_title(id.get(), title.clone());
            *slot.current.write() = Some(renamed.clone());
        }

        debug!(document_id = %id, "document renamed");
        self.emit(StoreEvent::Renamed { id, title });
        Ok(renamed)
    }

    // === Changes ===

    /// Apply a change request to a document.
    ///
    /// The version check, resolution, application, index refresh and
    /// publication happen under the document's write lock. Nothing is
    /// published unless every change resolves.
    pub fn apply_changes(&self, id: DocumentId, request: &ChangeRequest) -> Result<ChangeOutcome> {
        let slot = self.slot(id)?;
        let _guard = slot.write.lock();
        let current = slot.snapshot().ok_or(DbError::DocumentNotFound(id))?;

        debug!(document_id = %id, changes = request.len(), "applying changes");
        let applied = self
            .resolver
            .apply(&current.content, &current.version, request)
            .map_err(|err| {
                warn!(document_id = %id, error = %err, "change request rejected");
                DbError::from(err)
            })?;

        let content: Arc<str> = Arc::from(applied.content);
        let updated = Arc::new(current.with_content(content.clone(), applied.tag));
        {
            let mut index = self.index.write();
            index.update_document(id.get(), updated.title.clone(), content.clone());
            *slot.current.write() = Some(updated.clone());
        }

        info!(
            document_id = %id,
            from = %applied.previous_tag.short(),
            to = %applied.tag.short(),
            edits = applied.edits.len(),
            "changes applied"
        );
        self.emit(StoreEvent::Changed {
            id,
            previous: applied.previous_tag,
            version: applied.tag,
            old_content: current.content.clone(),
            new_content: content,
            edits: applied.edits.clone(),
        });

        Ok(ChangeOutcome {
            document: updated,
            previous: current,
            edits: applied.edits,
        })
    }

    /// Apply a JSON change set (`{"changes": [...]}`) to a document.
    pub fn apply_json(
        &self,
        id: DocumentId,
        body: &str,
        expected: Option<VersionTag>,
    ) -> Result<ChangeOutcome> {
        let specs = parse_change_set(body)?;
        let request = ChangeRequest {
            changes: specs,
            expected,
        };
        self.apply_changes(id, &request)
    }

    /// Resolve changes against the current content without applying them.
    pub fn preview(&self, id: DocumentId, specs: &[ChangeSpec]) -> Result<Vec<ResolvedEdit>> {
        let current = self.get(id)?;
        Ok(self.resolver.resolve(&current.content, specs)?)
    }

    // === Search ===

    /// Search the whole corpus or, with `options.document_id`, one document.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResults> {
        let index = self.index.read();
        if let Some(scope) = options.document_id {
            if !index.contains(scope) {
                return Err(DbError::DocumentNotFound(DocumentId(scope)));
            }
        }

        let results = index.search(query, options, &self.config.search);
        debug!(query, total = results.total, returned = results.results.len(), "search");
        Ok(results)
    }

    /// Rebuild the index from every live document.
    pub fn reindex(&self) -> usize {
        let count = {
            let mut index = self.index.write();
            let slots: Vec<Arc<Slot>> = self.slots.read().values().cloned().collect();
            index.rebuild(slots.iter().filter_map(|slot| {
                slot.snapshot()
                    .map(|doc| (doc.id.get(), doc.title.clone(), doc.content.clone()))
            }))
        };

        info!(documents = count, "index rebuilt");
        self.emit(StoreEvent::Reindexed { documents: count });
        count
    }

    pub fn stats(&self) -> StoreStats {
        let index = self.index.read();
        let docs = self.list(0, usize::MAX);

        StoreStats {
            documents: docs.len(),
            indexed_documents: index.document_count(),
            tokens: index.token_count(),
            total_chars: docs.iter().map(|d| d.char_count()).sum(),
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Parse a JSON change set into specs.
pub fn parse_change_set(body: &str) -> Result<Vec<ChangeSpec>> {
    let set: ChangeSet = serde_json::from_str(body)?;
    Ok(set.into_specs()?)
}
