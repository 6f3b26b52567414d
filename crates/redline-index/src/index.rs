//! Inverted index over document content.
//!
//! Maps each token to the documents containing it and the character offsets
//! of every occurrence. A document's postings are always replaced as a whole,
//! together with the content snapshot used for snippets, so the index never
//! holds a mix of two generations of the same document.

use crate::tokenize::tokenize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Document identifier as seen by the index.
pub type DocId = u64;

/// Offsets of one token within one document, ascending.
pub type Offsets = Vec<usize>;

/// What the index keeps per document.
#[derive(Clone, Debug)]
pub struct IndexedDocument {
    pub title: String,
    /// The content the postings were built from.
    pub content: Arc<str>,
    /// Distinct tokens of `content`, for targeted removal.
    tokens: Vec<String>,
}

impl IndexedDocument {
    /// Number of distinct tokens in the document.
    pub fn distinct_tokens(&self) -> usize {
        self.tokens.len()
    }
}

/// Token -> document -> offsets.
#[derive(Clone, Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeMap<DocId, Offsets>>,
    documents: BTreeMap<DocId, IndexedDocument>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything indexed for `id` with postings for `content`.
    pub fn update_document(&mut self, id: DocId, title: impl Into<String>, content: Arc<str>) {
        self.remove_document(id);

        let mut local: HashMap<String, Offsets> = HashMap::new();
        for token in tokenize(&content) {
            local.entry(token.text).or_default().push(token.offset);
        }

        let tokens: Vec<String> = local.keys().cloned().collect();
        for (token, offsets) in local {
            self.postings.entry(token).or_default().insert(id, offsets);
        }

        self.documents.insert(
            id,
            IndexedDocument {
                title: title.into(),
                content,
                tokens,
            },
        );
    }

    /// Drop `id` from every posting list. Tokens left without documents are
    /// pruned. Returns whether the document was indexed.
    pub fn remove_document(&mut self, id: DocId) -> bool {
        let Some(doc) = self.documents.remove(&id) else {
            return false;
        };

        for token in &doc.tokens {
            if let Some(docs) = self.postings.get_mut(token) {
                docs.remove(&id);
                if docs.is_empty() {
                    self.postings.remove(token);
                }
            }
        }
        true
    }

    /// Update the stored title without touching postings.
    pub fn set_title(&mut self, id: DocId, title: impl Into<String>) -> bool {
        match self.documents.get_mut(&id) {
            Some(doc) => {
                doc.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Postings for a token, keyed by document. Empty if the token is absent.
    ///
    /// `token` is matched as given; callers should pass a normalized token.
    pub fn lookup(&self, token: &str) -> BTreeMap<DocId, Offsets> {
        self.postings.get(token).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [`lookup`](Self::lookup).
    pub fn postings(&self, token: &str) -> Option<&BTreeMap<DocId, Offsets>> {
        self.postings.get(token)
    }

    /// The indexed snapshot of a document.
    pub fn document(&self, id: DocId) -> Option<&IndexedDocument> {
        self.documents.get(&id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    /// IDs of all indexed documents, ascending.
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.documents.keys().copied()
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct tokens across all documents.
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.postings.clear();
        self.documents.clear();
    }

    /// Clear and re-index from `documents`. Returns the number indexed.
    pub fn rebuild<I>(&mut self, documents: I) -> usize
    where
        I: IntoIterator<Item = (DocId, String, Arc<str>)>,
    {
        self.clear();
        let mut count = 0;
        for (id, title, content) in documents {
            self.update_document(id, title, content);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Arc<str> {
        Arc::from(content)
    }

    #[test]
    fn test_lookup_offsets() {
        let mut index = InvertedIndex::new();
        index.update_document(1, "Fruit", doc("apple banana apple"));

        let apple = index.lookup("apple");
        assert_eq!(apple.get(&1), Some(&vec![0, 13]));
        assert_eq!(index.lookup("banana").get(&1), Some(&vec![6]));
        assert!(index.lookup("cherry").is_empty());
    }

    #[test]
    fn test_remove_purges_postings() {
        let mut index = InvertedIndex::new();
        index.update_document(1, "Fruit", doc("apple banana apple"));

        assert!(index.remove_document(1));
        assert!(index.lookup("apple").is_empty());
        assert_eq!(index.token_count(), 0);
        assert_eq!(index.document_count(), 0);
        assert!(!index.remove_document(1));
    }

    #[test]
    fn test_update_replaces_previous_generation() {
        let mut index = InvertedIndex::new();
        index.update_document(1, "Doc", doc("alpha beta"));
        index.update_document(1, "Doc", doc("beta gamma"));

        assert!(index.lookup("alpha").is_empty());
        assert_eq!(index.lookup("beta").get(&1), Some(&vec![0]));
        assert_eq!(index.lookup("gamma").get(&1), Some(&vec![5]));
        assert_eq!(&*index.document(1).unwrap().content, "beta gamma");
    }

    #[test]
    fn test_shared_tokens_survive_removal() {
        let mut index = InvertedIndex::new();
        index.update_document(1, "A", doc("shared one"));
        index.update_document(2, "B", doc("shared two"));

        index.remove_document(1);
        let shared = index.lookup("shared");
        assert_eq!(shared.len(), 1);
        assert!(shared.contains_key(&2));
        assert!(index.lookup("one").is_empty());
    }

    #[test]
    fn test_case_insensitive_indexing() {
        let mut index = InvertedIndex::new();
        index.update_document(7, "Case", doc("Contract CONTRACT contract"));
        assert_eq!(index.lookup("contract").get(&7), Some(&vec![0, 9, 18]));
    }

    #[test]
    fn test_rebuild_and_titles() {
        let mut index = InvertedIndex::new();
        index.update_document(9, "Stale", doc("old"));

        let count = index.rebuild(vec![
            (1, "One".to_string(), doc("first doc")),
            (2, "Two".to_string(), doc("second doc")),
        ]);

        assert_eq!(count, 2);
        assert!(!index.contains(9));
        assert_eq!(index.document_ids().collect::<Vec<_>>(), vec![1, 2]);

        assert!(index.set_title(2, "Second"));
        assert_eq!(index.document(2).unwrap().title, "Second");
        assert!(!index.set_title(3, "Missing"));
    }
}
