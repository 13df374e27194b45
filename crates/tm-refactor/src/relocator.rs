//! Moving declaration text between files.

use camino::Utf8Path;
use tm_core::{ByteRange, DocumentStore, FileEdits, PendingEdit};

use crate::error::RefactorError;

/// Returns the transaction that puts `declaration` into `destination`.
///
/// An existing destination is rewritten as a whole; a missing one is created.
///
/// # Errors
///
/// Returns [`RefactorError::Io`] if the existing destination cannot be read.
pub fn append_or_create<S>(
    destination: &Utf8Path,
    declaration: &str,
    store: &S,
) -> Result<FileEdits, RefactorError>
where
    S: DocumentStore + ?Sized,
{
    if store.exists(destination) {
        let current = store.open(destination)?;
        Ok(FileEdits::Replace(append_declaration(&current, declaration)))
    } else {
        Ok(FileEdits::Create(created_document(declaration)))
    }
}

/// Appends `declaration` to `current`, separated by one blank line.
///
/// # Examples
///
/// ```
/// use tm_refactor::relocator::append_declaration;
///
/// assert_eq!(
///     append_declaration("export type A = 1;\n\n\n", "export type B = 2;"),
///     "export type A = 1;\n\nexport type B = 2;\n"
/// );
/// assert_eq!(append_declaration("", "type B = 2;"), "type B = 2;\n");
/// ```
#[must_use]
pub fn append_declaration(current: &str, declaration: &str) -> String {
    let body = current.trim_end();
    let declaration = declaration.trim();
    if body.is_empty() {
        return format!("{declaration}\n");
    }
    format!("{body}\n\n{declaration}\n")
}

/// Content of a destination file created for `declaration`.
#[must_use]
pub fn created_document(declaration: &str) -> String {
    format!("{}\n", declaration.trim())
}

/// Returns the edit that deletes the declaration at `span` from its file.
#[must_use]
pub fn remove_declaration(span: ByteRange) -> PendingEdit {
    PendingEdit::delete(span)
}
