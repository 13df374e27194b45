//! Import changes produced for a single move.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// The import rewrite required in one referencing file.
///
/// # Field Conventions
///
/// - `old_specifier` is the literal (unquoted) specifier under which
///   `type_name` was imported, or empty when the file had no such import.
/// - `new_specifier` is the specifier that now provides `type_name`, or empty
///   when the file is the destination itself and the type becomes local.
///
/// # Examples
///
/// ```
/// use tm_core::ImportChange;
///
/// let change = ImportChange::new("/src/b.ts", "./a", "./c", "Foo", false);
/// assert!(change.has_prior_import());
/// assert!(!change.is_removal());
/// assert!(!change.is_already_applied());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportChange {
    /// The referencing file.
    pub file: Utf8PathBuf,
    /// The specifier the type was imported from, or empty.
    pub old_specifier: String,
    /// The specifier the type must be imported from, or empty.
    pub new_specifier: String,
    /// The moved type's name.
    pub type_name: String,
    /// Whether the new import should be type-only.
    pub is_type_only: bool,
}

impl ImportChange {
    /// Creates a new import change.
    #[must_use]
    pub fn new(
        file: impl Into<Utf8PathBuf>,
        old_specifier: impl Into<String>,
        new_specifier: impl Into<String>,
        type_name: impl Into<String>,
        is_type_only: bool,
    ) -> Self {
        Self {
            file: file.into(),
            old_specifier: old_specifier.into(),
            new_specifier: new_specifier.into(),
            type_name: type_name.into(),
            is_type_only,
        }
    }

    /// Returns the referencing file.
    #[inline]
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }

    /// Returns `true` if the file imported the type before the move.
    #[inline]
    #[must_use]
    pub fn has_prior_import(&self) -> bool {
        !self.old_specifier.is_empty()
    }

    /// Returns `true` if the change only removes the old import.
    #[inline]
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.new_specifier.is_empty()
    }

    /// Returns `true` if the file already imports from the new specifier.
    #[inline]
    #[must_use]
    pub fn is_already_applied(&self) -> bool {
        self.has_prior_import() && self.old_specifier == self.new_specifier
    }
}

/// Everything needed to carry out one move.
///
/// Produced once per move operation and consumed exactly once by the
/// rewriter/relocator pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// One change per referencing file, in reference order.
    pub import_changes: Vec<ImportChange>,
    /// The declaration text being moved.
    pub moved_declaration_text: String,
}

impl ChangeSet {
    /// Creates a change set for the given declaration text.
    #[must_use]
    pub fn new(moved_declaration_text: impl Into<String>) -> Self {
        Self {
            import_changes: Vec::new(),
            moved_declaration_text: moved_declaration_text.into(),
        }
    }

    /// Appends a change.
    pub fn push(&mut self, change: ImportChange) {
        self.import_changes.push(change);
    }

    /// Returns the change for `file`, if any.
    #[must_use]
    pub fn change_for(&self, file: &Utf8Path) -> Option<&ImportChange> {
        self.import_changes.iter().find(|c| c.file == file)
    }
}
