//! Optimistic concurrency check.

use crate::error::{EditError, Result};
use crate::version::VersionTag;

/// Compare the tag a caller last observed against the current one.
///
/// An absent `supplied` tag places no precondition on the write.
pub fn check(current: &VersionTag, supplied: Option<&VersionTag>) -> Result<()> {
    match supplied {
        Some(expected) if expected != current => Err(EditError::Conflict {
            expected: *expected,
            current: *current,
        }),
        _ => Ok(()),
    }
}
