//! Change Applicator - applies resolved edits in one linear pass.

use crate::change::{ChangeRequest, ResolvedEdit};
use crate::error::Result;
use crate::gate;
use crate::resolve::Resolver;
use crate::text::ByteCursor;
use crate::version::VersionTag;
use serde::{Deserialize, Serialize};

/// The result of a successfully applied change request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applied {
    /// The new content.
    pub content: String,
    /// Tag of the new content.
    pub tag: VersionTag,
    /// Tag of the content the request was applied to.
    pub previous_tag: VersionTag,
    /// The edits that were applied, sorted by position in the old content.
    pub edits: Vec<ResolvedEdit>,
}

impl Applied {
    /// Edits against the new content that restore the old content.
    pub fn inverse(&self) -> Vec<ResolvedEdit> {
        invert(&self.edits)
    }
}

/// Build the edits that undo `edits` (sorted, disjoint) once applied.
pub fn invert(edits: &[ResolvedEdit]) -> Vec<ResolvedEdit> {
    let mut shift: isize = 0;

    edits
        .iter()
        .map(|edit| {
            let inserted = edit.replacement.chars().count();
            let start = (edit.start as isize + shift) as usize;
            shift += inserted as isize - edit.len() as isize;

            ResolvedEdit {
                spec_index: edit.spec_index,
                start,
                end: start + inserted,
                original: edit.replacement.clone(),
                replacement: edit.original.clone(),
            }
        })
        .collect()
}

/// Apply sorted, disjoint edits to `content`.
///
/// Untouched spans are copied once and each replacement is written once, so
/// the cost is linear in the content plus the replacement text.
pub fn apply_edits(content: &str, edits: &[ResolvedEdit]) -> String {
    debug_assert!(edits.windows(2).all(|w| w[0].end <= w[1].start || w[1].is_empty()));

    let inserted: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(content.len() + inserted);
    let mut cursor = ByteCursor::new(content);
    let mut copied = 0;

    for edit in edits {
        let start = cursor.seek(edit.start);
        let end = cursor.seek(edit.end);
        out.push_str(&content[copied..start]);
        out.push_str(&edit.replacement);
        copied = end;
    }
    out.push_str(&content[copied..]);

    out
}

impl Resolver {
    /// Check the precondition, resolve every spec and apply them atomically.
    pub fn apply(
        &self,
        content: &str,
        current: &VersionTag,
        request: &ChangeRequest,
    ) -> Result<Applied> {
        gate::check(current, request.expected.as_ref())?;
        let edits = self.resolve(content, &request.changes)?;
        let new_content = apply_edits(content, &edits);

        Ok(Applied {
            tag: VersionTag::of(&new_content),
            previous_tag: *current,
            content: new_content,
            edits,
        })
    }
}

/// Apply a change request to `content` with default limits.
///
/// Nothing is produced unless every spec resolves and the precondition
/// holds.
pub fn apply_changes(
    content: &str,
    current: &VersionTag,
    request: &ChangeRequest,
) -> Result<Applied> {
    Resolver::default().apply(content, current, request)
}
