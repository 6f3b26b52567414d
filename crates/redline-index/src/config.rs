//! Search configuration.

use serde::{Deserialize, Serialize};

/// Tunables for ranking output and pagination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Characters of context taken on each side of a match.
    pub context_chars: usize,
    /// Maximum number of snippets returned per document.
    pub max_snippets: usize,
    /// Page size used when a query does not give one.
    pub default_limit: usize,
    /// Upper bound on any requested page size.
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_chars: 100,
            max_snippets: 5,
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl SearchConfig {
    /// The effective page size for a requested limit.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}
