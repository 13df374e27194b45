//! Per-file edit transaction logs.
//!
//! Every component that wants to change a file records [`PendingEdit`]s
//! against the file's text as it was when the move started. The edits for a
//! file are gathered into one [`FileEdits`] log inside an [`EditPlan`] and
//! normalized in a single place, [`normalize_edits`]:
//!
//! | Rule | Effect |
//! |------|--------|
//! | Descending start offset | Applying an edit never shifts the offsets of the edits still pending |
//! | Ties: longer range first | A deletion at offset `n` runs before an insertion at `n`, so the insertion survives |
//! | No overlap | Two edits covering the same bytes are rejected with [`EditError::Overlapping`] |
//!
//! Whole-document writes ([`FileEdits::Replace`], [`FileEdits::Create`]) are
//! not combined with range edits; callers compose those in memory first.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::types::ByteRange;

/// A single text replacement scoped to one file.
///
/// # Examples
///
/// ```
/// use tm_core::{ByteRange, PendingEdit};
///
/// let insert = PendingEdit::insert(0, "import { Foo } from \"./c\";\n");
/// assert!(insert.range.is_empty());
///
/// let delete = PendingEdit::delete(ByteRange::new(0, 10));
/// assert!(delete.replacement.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    /// The range being replaced.
    pub range: ByteRange,
    /// The replacement text.
    pub replacement: String,
}

impl PendingEdit {
    /// Replaces `range` with `text`.
    #[must_use]
    pub fn replace(range: ByteRange, text: impl Into<String>) -> Self {
        Self {
            range,
            replacement: text.into(),
        }
    }

    /// Inserts `text` at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(ByteRange::empty(offset), text)
    }

    /// Deletes `range`.
    #[must_use]
    pub fn delete(range: ByteRange) -> Self {
        Self::replace(range, String::new())
    }
}

/// The transaction submitted to the edit applier for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FileEdits {
    /// Range edits against the file's current content.
    Patch(Vec<PendingEdit>),
    /// Replace the whole document with new content.
    Replace(String),
    /// Create a new document with the given content.
    Create(String),
}

impl FileEdits {
    /// Returns `true` if applying this transaction would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Patch(edits) if edits.is_empty())
    }

    /// Applies the transaction to `current`, returning the new content.
    ///
    /// `current` is ignored for whole-document writes.
    pub fn apply_to(&self, current: &str) -> Result<String, EditError> {
        match self {
            Self::Patch(edits) => apply_edits(current, edits),
            Self::Replace(content) | Self::Create(content) => Ok(content.clone()),
        }
    }
}

/// All file transactions for one move, in first-touched order.
///
/// # Examples
///
/// ```
/// use tm_core::{ByteRange, EditPlan, FileEdits, PendingEdit};
/// use camino::Utf8Path;
///
/// let mut plan = EditPlan::new();
/// plan.add_edits(Utf8Path::new("/src/a.ts"), [PendingEdit::delete(ByteRange::new(0, 5))])?;
/// plan.set_document(Utf8Path::new("/src/c.ts"), FileEdits::Create("export type X = 1;".into()));
///
/// assert_eq!(plan.len(), 2);
/// # Ok::<(), tm_core::EditError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPlan {
    files: IndexMap<Utf8PathBuf, FileEdits>,
}

impl EditPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds range edits for `path`, merging with edits already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ConflictingOperation`] if `path` is already
    /// scheduled for a whole-document write.
    pub fn add_edits(
        &mut self,
        path: &Utf8Path,
        edits: impl IntoIterator<Item = PendingEdit>,
    ) -> Result<(), EditError> {
        let entry = self
            .files
            .entry(path.to_owned())
            .or_insert_with(|| FileEdits::Patch(Vec::new()));

        match entry {
            FileEdits::Patch(existing) => {
                existing.extend(edits);
                Ok(())
            }
            FileEdits::Replace(_) | FileEdits::Create(_) => {
                Err(EditError::ConflictingOperation(path.to_owned()))
            }
        }
    }

    /// Schedules a whole-document write for `path`, replacing anything
    /// recorded before.
    pub fn set_document(&mut self, path: &Utf8Path, edits: FileEdits) {
        self.files.insert(path.to_owned(), edits);
    }

    /// Returns the transaction for `path`, if any.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<&FileEdits> {
        self.files.get(path)
    }

    /// Iterates over the files in first-touched order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &FileEdits)> {
        self.files.iter().map(|(path, edits)| (path.as_path(), edits))
    }

    /// Returns the paths this plan touches with at least one effective edit.
    pub fn touched_files(&self) -> impl Iterator<Item = &Utf8Path> {
        self.iter()
            .filter(|(_, edits)| !edits.is_noop())
            .map(|(path, _)| path)
    }

    /// Sorts and validates every patch in place.
    ///
    /// # Errors
    ///
    /// Returns the first [`EditError`] found.
    pub fn normalize(&mut self) -> Result<(), EditError> {
        for edits in self.files.values_mut() {
            if let FileEdits::Patch(patch) = edits {
                normalize_edits(patch)?;
            }
        }
        Ok(())
    }

    /// Number of files in the plan.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the plan touches no files.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Sorts `edits` into application order and rejects overlaps.
///
/// After this call, edits are ordered by descending start offset (ties:
/// descending end offset), which is the only order [`apply_edits`] uses.
///
/// # Errors
///
/// Returns [`EditError::Overlapping`] if two edits cover the same bytes.
pub fn normalize_edits(edits: &mut [PendingEdit]) -> Result<(), EditError> {
    edits.sort_by(|a, b| {
        b.range
            .start
            .cmp(&a.range.start)
            .then_with(|| b.range.end.cmp(&a.range.end))
    });

    for pair in edits.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.range.end > later.range.start {
            return Err(EditError::Overlapping {
                first: later.range,
                second: earlier.range,
            });
        }
    }

    Ok(())
}

/// Applies a batch of edits to `source` and returns the new text.
///
/// The batch is normalized first, so callers may pass edits in any order.
///
/// # Errors
///
/// - [`EditError::Overlapping`] if two edits overlap
/// - [`EditError::OutOfBounds`] if a range extends past `source`
/// - [`EditError::NotCharBoundary`] if a range splits a UTF-8 character
///
/// # Examples
///
/// ```
/// use tm_core::{ByteRange, PendingEdit, apply_edits};
///
/// let source = "abc";
/// let edits = [
///     PendingEdit::insert(0, ">"),
///     PendingEdit::replace(ByteRange::new(1, 2), "B"),
/// ];
/// assert_eq!(apply_edits(source, &edits)?, ">aBc");
/// # Ok::<(), tm_core::EditError>(())
/// ```
pub fn apply_edits(source: &str, edits: &[PendingEdit]) -> Result<String, EditError> {
    let mut ordered = edits.to_vec();
    normalize_edits(&mut ordered)?;

    let mut output = source.to_owned();
    for edit in &ordered {
        let ByteRange { start, end } = edit.range;
        if start > end || end > source.len() {
            return Err(EditError::OutOfBounds {
                range: edit.range,
                len: source.len(),
            });
        }
        if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary(edit.range));
        }
        output.replace_range(start..end, &edit.replacement);
    }

    Ok(output)
}
