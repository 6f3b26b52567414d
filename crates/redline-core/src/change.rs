//! Change specifications, requests and resolved edits.
//!
//! [`ChangeSpec`] is the closed set of edits the resolver understands.
//! [`ChangeOperation`] is the looser shape clients send over the wire; it is
//! converted into a spec at the boundary so that malformed or unknown
//! operations are rejected before resolution starts.

use crate::error::{EditError, Result};
use crate::version::VersionTag;
use serde::{Deserialize, Serialize};

/// A single requested edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeSpec {
    /// Replace the Nth (1-based) literal occurrence of `match_text`.
    TextTarget {
        match_text: String,
        occurrence: usize,
        replacement: String,
    },
    /// Replace the character range `start..end`.
    RangeEdit {
        start: usize,
        end: usize,
        replacement: String,
    },
}

impl ChangeSpec {
    pub fn text(
        match_text: impl Into<String>,
        occurrence: usize,
        replacement: impl Into<String>,
    ) -> Self {
        ChangeSpec::TextTarget {
            match_text: match_text.into(),
            occurrence,
            replacement: replacement.into(),
        }
    }

    pub fn range(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        ChangeSpec::RangeEdit {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn replacement(&self) -> &str {
        match self {
            ChangeSpec::TextTarget { replacement, .. } => replacement,
            ChangeSpec::RangeEdit { replacement, .. } => replacement,
        }
    }
}

/// An ordered set of changes plus an optional precondition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub changes: Vec<ChangeSpec>,
    /// Version tag the caller last observed. `None` means "no precondition".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<VersionTag>,
}

impl ChangeRequest {
    pub fn new(changes: Vec<ChangeSpec>) -> Self {
        Self {
            changes,
            expected: None,
        }
    }

    /// Require the document to still be at `tag`.
    pub fn with_expected(mut self, tag: VersionTag) -> Self {
        self.expected = Some(tag);
        self
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// A spec resolved to a concrete character range of one content snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEdit {
    /// Position of the originating spec within its request.
    pub spec_index: usize,
    /// Character offset where the edit starts (inclusive).
    pub start: usize,
    /// Character offset where the edit ends (exclusive).
    pub end: usize,
    /// The text currently occupying `start..end`.
    pub original: String,
    /// The text that replaces it.
    pub replacement: String,
}

impl ResolvedEdit {
    /// Length of the replaced span, in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the edit is a pure insertion.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &ResolvedEdit) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// === Wire form ===

fn default_operation() -> String {
    "replace".to_string()
}

fn default_occurrence() -> usize {
    1
}

/// Text-based targeting as sent by clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTarget {
    pub text: String,
    #[serde(default = "default_occurrence")]
    pub occurrence: usize,
}

/// Position-based targeting as sent by clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRange {
    pub start: usize,
    pub end: usize,
}

/// One change as it arrives from a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOperation {
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ChangeTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ChangeRange>,
    pub replacement: String,
}

impl ChangeOperation {
    /// Convert into a [`ChangeSpec`]; `index` is used for error reporting.
    pub fn into_spec(self, index: usize) -> Result<ChangeSpec> {
        if self.operation != "replace" {
            return Err(EditError::Unsupported {
                index,
                operation: self.operation,
            });
        }

        match (self.target, self.range) {
            (Some(target), None) => Ok(ChangeSpec::TextTarget {
                match_text: target.text,
                occurrence: target.occurrence,
                replacement: self.replacement,
            }),
            (None, Some(range)) => Ok(ChangeSpec::RangeEdit {
                start: range.start,
                end: range.end,
                replacement: self.replacement,
            }),
            (Some(_), Some(_)) => Err(EditError::MalformedChange {
                index,
                field: "range",
                reason: "target and range are mutually exclusive".to_string(),
            }),
            (None, None) => Err(EditError::MalformedChange {
                index,
                field: "target",
                reason: "one of target or range is required".to_string(),
            }),
        }
    }
}

impl From<ChangeSpec> for ChangeOperation {
    fn from(spec: ChangeSpec) -> Self {
        match spec {
            ChangeSpec::TextTarget {
                match_text,
                occurrence,
                replacement,
            } => ChangeOperation {
                operation: default_operation(),
                target: Some(ChangeTarget {
                    text: match_text,
                    occurrence,
                }),
                range: None,
                replacement,
            },
            ChangeSpec::RangeEdit {
                start,
                end,
                replacement,
            } => ChangeOperation {
                operation: default_operation(),
                target: None,
                range: Some(ChangeRange { start, end }),
                replacement,
            },
        }
    }
}

/// A batch of wire-form changes, as found in a change file or request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<ChangeOperation>,
}

impl ChangeSet {
    /// Convert every operation, failing on the first malformed one.
    pub fn into_specs(self) -> Result<Vec<ChangeSpec>> {
        self.changes
            .into_iter()
            .enumerate()
            .map(|(index, op)| op.into_spec(index))
            .collect()
    }
}
