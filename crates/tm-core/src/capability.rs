//! Traits for the external collaborators the engine consumes.
//!
//! The refactoring engine never touches the filesystem or a language service
//! directly. It talks to three collaborators:
//!
//! | Trait | Responsibility |
//! |-------|----------------|
//! | [`DocumentStore`] | Read document text and check existence |
//! | [`EditApplier`] | Apply one file's transaction atomically |
//! | [`ReferenceFinder`] | Project-wide symbol usage search |
//!
//! `tm-workspace` provides filesystem-backed implementations; the
//! [`memory`](crate::memory) module provides in-memory ones.

use camino::Utf8Path;

use crate::edit::FileEdits;
use crate::error::CapabilityError;
use crate::types::Location;

/// Read access to documents.
pub trait DocumentStore {
    /// Returns the current text of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::NotFound`] if the document does not exist,
    /// or [`CapabilityError::Io`] if it cannot be read.
    fn open(&self, path: &Utf8Path) -> Result<String, CapabilityError>;

    /// Returns `true` if `path` exists.
    fn exists(&self, path: &Utf8Path) -> bool;
}

/// Applies edit transactions.
///
/// Each call is atomic for one file: either every edit in `edits` lands or
/// none does. There is no transaction spanning several files.
pub trait EditApplier {
    /// Applies `edits` to `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`CapabilityError`] if the transaction is rejected; the file
    /// is left unchanged in that case.
    fn apply(&self, path: &Utf8Path, edits: &FileEdits) -> Result<(), CapabilityError>;
}

/// Project-wide symbol reference search.
///
/// Results may be empty and are not assumed exhaustive. By convention,
/// locations in the queried file come first.
pub trait ReferenceFinder {
    /// Returns every location referring to the symbol at `offset` in `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::Search`] if the search could not run.
    fn find_references(
        &self,
        path: &Utf8Path,
        offset: usize,
    ) -> Result<Vec<Location>, CapabilityError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn open(&self, path: &Utf8Path) -> Result<String, CapabilityError> {
        (**self).open(path)
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        (**self).exists(path)
    }
}

impl<T: EditApplier + ?Sized> EditApplier for &T {
    fn apply(&self, path: &Utf8Path, edits: &FileEdits) -> Result<(), CapabilityError> {
        (**self).apply(path, edits)
    }
}

impl<T: ReferenceFinder + ?Sized> ReferenceFinder for &T {
    fn find_references(
        &self,
        path: &Utf8Path,
        offset: usize,
    ) -> Result<Vec<Location>, CapabilityError> {
        (**self).find_references(path, offset)
    }
}
