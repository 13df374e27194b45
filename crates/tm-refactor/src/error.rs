//! Error types for the tm-refactor crate.
//!
//! This module provides the [`RefactorError`] type returned by the move
//! operation.

use camino::Utf8PathBuf;
use tm_core::{CapabilityError, EditError};
use tm_ts_parser::ParseError;

/// Errors that can abort a move.
///
/// # Error Recovery Strategy
///
/// - **Input errors** ([`NoTypeAtPosition`](Self::NoTypeAtPosition),
///   [`TypeNotFound`](Self::TypeNotFound),
///   [`EmptyDestination`](Self::EmptyDestination),
///   [`UnsupportedDestination`](Self::UnsupportedDestination),
///   [`SameFile`](Self::SameFile)): abort before any edit is computed
/// - **Validation errors** ([`NameConflict`](Self::NameConflict)): abort
///   before any edit is applied
/// - **Edit errors** ([`EditFailed`](Self::EditFailed)): surfaced after some
///   files may already have been written; there is no rollback
///
/// Configuration problems and empty reference searches never reach the
/// caller. They are logged and the move continues without aliases or
/// without import rewrites.
///
/// # Examples
///
/// ```
/// use tm_refactor::RefactorError;
///
/// fn is_user_error(err: &RefactorError) -> bool {
///     matches!(
///         err,
///         RefactorError::NoTypeAtPosition { .. }
///             | RefactorError::TypeNotFound { .. }
///             | RefactorError::EmptyDestination
///             | RefactorError::UnsupportedDestination(_)
///             | RefactorError::SameFile(_)
///     )
/// }
/// assert!(is_user_error(&RefactorError::EmptyDestination));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RefactorError {
    /// The selected offset is not inside a type alias, interface or enum.
    #[error("no type alias, interface or enum at {path}:{offset}")]
    NoTypeAtPosition {
        /// The file that was searched.
        path: Utf8PathBuf,
        /// The selected byte offset.
        offset: usize,
    },

    /// No declaration with the requested name exists in the file.
    #[error("no type named `{name}` in {path}")]
    TypeNotFound {
        /// The file that was searched.
        path: Utf8PathBuf,
        /// The requested type name.
        name: String,
    },

    /// The destination path is empty.
    #[error("destination path is empty")]
    EmptyDestination,

    /// The destination is not a `.ts` or `.tsx` file.
    #[error("destination must be a .ts or .tsx file: {0}")]
    UnsupportedDestination(Utf8PathBuf),

    /// Source and destination are the same file.
    #[error("source and destination are the same file: {0}")]
    SameFile(Utf8PathBuf),

    /// The destination already declares a type with the same name.
    #[error("{path} already declares a type named `{name}`")]
    NameConflict {
        /// The destination file.
        path: Utf8PathBuf,
        /// The conflicting name.
        name: String,
    },

    /// The per-file edit set is invalid or was rejected by the edit applier.
    ///
    /// Files applied before this one keep their changes.
    #[error("failed to apply edits to {path}: {source}")]
    EditFailed {
        /// The file whose transaction failed.
        path: Utf8PathBuf,
        /// The underlying failure.
        #[source]
        source: CapabilityError,
    },

    /// A document could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The document that failed to parse.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: ParseError,
    },

    /// A document could not be read.
    #[error(transparent)]
    Io(#[from] CapabilityError),
}

impl RefactorError {
    /// Wraps an edit-set error for `path`.
    pub(crate) fn edit(path: impl Into<Utf8PathBuf>, source: EditError) -> Self {
        Self::EditFailed {
            path: path.into(),
            source: CapabilityError::Edit(source),
        }
    }

    /// Wraps a parse error for `path`.
    pub(crate) fn parse(path: impl Into<Utf8PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
