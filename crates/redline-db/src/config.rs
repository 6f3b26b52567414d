//! Store configuration.

use redline_core::DEFAULT_MAX_CHANGES;
use redline_index::SearchConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a [`DocumentStore`](crate::DocumentStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of changes in one request.
    pub max_changes: usize,
    /// Maximum title length, in characters.
    pub max_title_len: usize,
    /// Capacity of the change event channel.
    pub event_capacity: usize,
    /// Search tunables.
    pub search: SearchConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_changes: DEFAULT_MAX_CHANGES,
            max_title_len: 255,
            event_capacity: 100,
            search: SearchConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for store configuration.
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
        }
    }

    pub fn max_changes(mut self, max: usize) -> Self {
        self.config.max_changes = max;
        self
    }

    pub fn max_title_len(mut self, max: usize) -> Self {
        self.config.max_title_len = max;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn context_chars(mut self, chars: usize) -> Self {
        self.config.search.context_chars = chars;
        self
    }

    pub fn max_snippets(mut self, max: usize) -> Self {
        self.config.search.max_snippets = max;
        self
    }

    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.search.default_limit = limit;
        self
    }

    pub fn max_limit(mut self, limit: usize) -> Self {
        self.config.search.max_limit = limit;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}

impl Default for StoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
