//! Change Resolver - turns change specs into concrete, disjoint edits.
//!
//! Every spec in a request is resolved against the same immutable snapshot,
//! so the order of specs never changes how an offset is interpreted.

use crate::change::{ChangeSpec, ResolvedEdit};
use crate::error::{EditError, Result};
use crate::text::CharOffsets;

/// Maximum number of changes accepted in one request by default.
pub const DEFAULT_MAX_CHANGES: usize = 100;

/// Resolves change specs against a content snapshot.
#[derive(Clone, Debug)]
pub struct Resolver {
    max_changes: usize,
}

impl Resolver {
    pub fn new(max_changes: usize) -> Self {
        Self { max_changes }
    }

    pub fn max_changes(&self) -> usize {
        self.max_changes
    }

    /// Resolve every spec and return the edits sorted by position.
    ///
    /// Fails the whole request if any spec fails to resolve or if any two
    /// resolved ranges overlap. Two insertions at the same offset keep their
    /// request order.
    pub fn resolve(&self, content: &str, specs: &[ChangeSpec]) -> Result<Vec<ResolvedEdit>> {
        if specs.is_empty() {
            return Err(EditError::EmptyRequest);
        }
        if specs.len() > self.max_changes {
            return Err(EditError::TooManyChanges {
                count: specs.len(),
                limit: self.max_changes,
            });
        }

        let offsets = CharOffsets::new(content);
        let mut edits = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| resolve_one(content, &offsets, index, spec))
            .collect::<Result<Vec<_>>>()?;

        edits.sort_by_key(|e| (e.start, e.end));
        check_disjoint(&edits)?;

        Ok(edits)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHANGES)
    }
}

/// Resolve and validate `specs` against `content` with default limits.
///
/// Usable standalone as a dry run: nothing is applied.
pub fn resolve_and_validate(content: &str, specs: &[ChangeSpec]) -> Result<Vec<ResolvedEdit>> {
    Resolver::default().resolve(content, specs)
}

fn resolve_one(
    content: &str,
    offsets: &CharOffsets,
    index: usize,
    spec: &ChangeSpec,
) -> Result<ResolvedEdit> {
    match spec {
        ChangeSpec::TextTarget {
            match_text,
            occurrence,
            replacement,
        } => {
            if match_text.is_empty() {
                return Err(EditError::EmptyMatchText { index });
            }
            if *occurrence == 0 {
                return Err(EditError::InvalidOccurrence { index });
            }

            let (byte_start, _) = content
                .match_indices(match_text.as_str())
                .nth(occurrence - 1)
                .ok_or_else(|| EditError::TargetNotFound {
                    index,
                    text: match_text.clone(),
                    occurrence: *occurrence,
                    found: content.matches(match_text.as_str()).count(),
                })?;

            let start = offsets.to_char(byte_start);
            Ok(ResolvedEdit {
                spec_index: index,
                start,
                end: start + match_text.chars().count(),
                original: match_text.clone(),
                replacement: replacement.clone(),
            })
        }
        ChangeSpec::RangeEdit {
            start,
            end,
            replacement,
        } => {
            let length = offsets.char_len();
            if start > end || *end > length {
                return Err(EditError::InvalidRange {
                    index,
                    start: *start,
                    end: *end,
                    length,
                });
            }

            Ok(ResolvedEdit {
                spec_index: index,
                start: *start,
                end: *end,
                original: content[offsets.to_byte(*start)..offsets.to_byte(*end)].to_string(),
                replacement: replacement.clone(),
            })
        }
    }
}

/// `edits` must be sorted by start. Every edit is compared against the
/// earlier edit reaching furthest right.
fn check_disjoint(edits: &[ResolvedEdit]) -> Result<()> {
    let mut furthest: Option<&ResolvedEdit> = None;

    for edit in edits {
        if let Some(prev) = furthest {
            if prev.overlaps(edit) {
                let (first, second) = if prev.spec_index < edit.spec_index {
                    (prev.spec_index, edit.spec_index)
                } else {
                    (edit.spec_index, prev.spec_index)
                };
                return Err(EditError::OverlappingEdits { first, second });
            }
        }
        if furthest.map_or(true, |prev| edit.end > prev.end) {
            furthest = Some(edit);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "The contract contains the contract terms.";

    #[test]
    fn test_second_occurrence() {
        let edits =
            resolve_and_validate(CONTRACT, &[ChangeSpec::text("contract", 2, "agreement")])
                .unwrap();

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].start, 26);
        assert_eq!(edits[0].end, 34);
        assert_eq!(edits[0].original, "contract");
    }

    #[test]
    fn test_missing_occurrence() {
        let err = resolve_and_validate(CONTRACT, &[ChangeSpec::text("contract", 3, "agreement")])
            .unwrap_err();

        assert_eq!(
            err,
            EditError::TargetNotFound {
                index: 0,
                text: "contract".into(),
                occurrence: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let err =
            resolve_and_validate(CONTRACT, &[ChangeSpec::text("Contract", 1, "x")]).unwrap_err();
        assert!(matches!(err, EditError::TargetNotFound { found: 0, .. }));
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        // "aaaa" holds two non-overlapping "aa"s, not three.
        let specs = [ChangeSpec::text("aa", 2, "b")];
        let edits = resolve_and_validate("aaaa", &specs).unwrap();
        assert_eq!((edits[0].start, edits[0].end), (2, 4));

        let specs = [ChangeSpec::text("aa", 3, "b")];
        assert!(resolve_and_validate("aaaa", &specs).is_err());
    }

    #[test]
    fn test_empty_match_and_zero_occurrence() {
        assert_eq!(
            resolve_and_validate(CONTRACT, &[ChangeSpec::text("", 1, "x")]).unwrap_err(),
            EditError::EmptyMatchText { index: 0 }
        );
        assert_eq!(
            resolve_and_validate(CONTRACT, &[ChangeSpec::text("the", 0, "x")]).unwrap_err(),
            EditError::InvalidOccurrence { index: 0 }
        );
    }

    #[test]
    fn test_range_validation() {
        let len = CONTRACT.len();

        assert!(resolve_and_validate(CONTRACT, &[ChangeSpec::range(0, len, "")]).is_ok());
        assert!(resolve_and_validate(CONTRACT, &[ChangeSpec::range(len, len, "!")]).is_ok());
        assert!(matches!(
            resolve_and_validate(CONTRACT, &[ChangeSpec::range(5, 4, "")]),
            Err(EditError::InvalidRange { start: 5, end: 4, .. })
        ));
        assert!(matches!(
            resolve_and_validate(CONTRACT, &[ChangeSpec::range(0, len + 1, "")]),
            Err(EditError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_range_uses_character_offsets() {
        let content = "Größe: 5 m²";
        let edits = resolve_and_validate(content, &[ChangeSpec::range(0, 5, "Size")]).unwrap();
        assert_eq!(edits[0].original, "Größe");

        let edits = resolve_and_validate(content, &[ChangeSpec::text("m²", 1, "sqm")]).unwrap();
        assert_eq!((edits[0].start, edits[0].end), (9, 11));
    }

    #[test]
    fn test_specs_resolve_against_same_snapshot() {
        // The second spec targets "contract" #2 of the original text even
        // though the first spec removes occurrence #1.
        let specs = [
            ChangeSpec::text("contract", 1, ""),
            ChangeSpec::text("contract", 2, "deal"),
        ];
        let edits = resolve_and_validate(CONTRACT, &specs).unwrap();

        assert_eq!(edits[0].spec_index, 0);
        assert_eq!(edits[0].start, 4);
        assert_eq!(edits[1].spec_index, 1);
        assert_eq!(edits[1].start, 26);
    }

    #[test]
    fn test_edits_are_sorted() {
        let specs = [ChangeSpec::range(30, 34, "x"), ChangeSpec::range(0, 3, "A")];
        let edits = resolve_and_validate(CONTRACT, &specs).unwrap();

        assert_eq!(edits[0].spec_index, 1);
        assert_eq!(edits[1].spec_index, 0);
    }

    #[test]
    fn test_overlap_is_rejected() {
        let specs = [
            ChangeSpec::text("contract contains", 1, "deal has"),
            ChangeSpec::text("contains the", 1, "has a"),
        ];
        assert_eq!(
            resolve_and_validate(CONTRACT, &specs).unwrap_err(),
            EditError::OverlappingEdits { first: 0, second: 1 }
        );
    }

    #[test]
    fn test_overlap_with_non_adjacent_edit() {
        // The long edit swallows the third one even though an insertion sits
        // between them in sorted order.
        let specs = [
            ChangeSpec::range(0, 20, "x"),
            ChangeSpec::range(0, 0, "y"),
            ChangeSpec::range(10, 12, "z"),
        ];
        assert_eq!(
            resolve_and_validate(CONTRACT, &specs).unwrap_err(),
            EditError::OverlappingEdits { first: 0, second: 2 }
        );
    }

    #[test]
    fn test_touching_edits_are_disjoint() {
        let specs = [
            ChangeSpec::range(0, 4, "A "),
            ChangeSpec::range(4, 12, "deal"),
            ChangeSpec::range(4, 4, "new "),
        ];
        let edits = resolve_and_validate(CONTRACT, &specs).unwrap();
        assert_eq!(
            edits.iter().map(|e| e.spec_index).collect::<Vec<_>>(),
            vec![0, 2, 1]
        );
    }

    #[test]
    fn test_request_limits() {
        assert_eq!(
            resolve_and_validate(CONTRACT, &[]).unwrap_err(),
            EditError::EmptyRequest
        );

        let specs = vec![ChangeSpec::range(0, 0, "x"); 3];
        assert_eq!(
            Resolver::new(2).resolve(CONTRACT, &specs).unwrap_err(),
            EditError::TooManyChanges { count: 3, limit: 2 }
        );
    }
}
