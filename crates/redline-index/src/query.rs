//! Query engine: candidate scoring, ranking and pagination.

use crate::config::SearchConfig;
use crate::index::{DocId, InvertedIndex};
use crate::snippet;
use crate::tokenize::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Options for a single search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Restrict candidates to one document.
    pub document_id: Option<DocId>,
    /// Page size; the configured default applies when absent.
    pub limit: Option<usize>,
    /// Number of ranked hits to skip.
    pub offset: usize,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_document(mut self, id: DocId) -> Self {
        self.document_id = Some(id);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// A ranked document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: DocId,
    pub title: String,
    /// Total occurrences of all matched query tokens.
    pub score: u64,
    pub context: Vec<String>,
}

/// One page of results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
    /// Number of candidates before pagination.
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl SearchResults {
    pub fn empty(limit: usize, offset: usize) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            limit,
            offset,
        }
    }
}

#[derive(Default)]
struct Candidate {
    score: u64,
    matches: Vec<(usize, usize)>,
}

impl InvertedIndex {
    /// Run a query.
    ///
    /// Query tokens are OR'd; a repeated query token counts once. Hits are
    /// ordered by score descending, then document id ascending. Snippets are
    /// only built for the returned page.
    pub fn search(
        &self,
        query: &str,
        options: &SearchOptions,
        config: &SearchConfig,
    ) -> SearchResults {
        let limit = config.page_size(options.limit);
        let terms: BTreeSet<String> = tokenize(query).map(|t| t.text).collect();
        if terms.is_empty() {
            return SearchResults::empty(limit, options.offset);
        }

        let (lo, hi) = match options.document_id {
            Some(id) => (id, id),
            None => (DocId::MIN, DocId::MAX),
        };

        let mut candidates: HashMap<DocId, Candidate> = HashMap::new();
        for term in &terms {
            let Some(docs) = self.postings(term) else {
                continue;
            };
            let term_len = term.chars().count();

            for (&id, offsets) in docs.range(lo..=hi) {
                let candidate = candidates.entry(id).or_default();
                candidate.score += offsets.len() as u64;
                candidate
                    .matches
                    .extend(offsets.iter().map(|&offset| (offset, term_len)));
            }
        }

        let mut ranked: Vec<(DocId, Candidate)> = candidates.into_iter().collect();
        ranked.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(&b.0)));
        let total = ranked.len();

        let results = ranked
            .into_iter()
            .skip(options.offset)
            .take(limit)
            .filter_map(|(id, candidate)| {
                let doc = self.document(id)?;
                Some(SearchHit {
                    document_id: id,
                    title: doc.title.clone(),
                    score: candidate.score,
                    context: snippet::extract(&doc.content, &candidate.matches, config),
                })
            })
            .collect();

        SearchResults {
            results,
            total,
            limit,
            offset: options.offset,
        }
    }
}
