//! In-memory collaborators.
//!
//! [`MemoryWorkspace`] implements [`DocumentStore`] and [`EditApplier`] over a
//! map of path to text. It is used by tests throughout the workspace and by
//! the CLI's `--dry-run` preview, which applies a plan to an overlay of the
//! real files without writing anything.
//!
//! [`StaticReferenceFinder`] answers every reference query with a fixed list.

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;

use crate::capability::{DocumentStore, EditApplier, ReferenceFinder};
use crate::edit::FileEdits;
use crate::error::CapabilityError;
use crate::hash::{FxHashMap, FxHashSet};
use crate::types::Location;

/// A thread-safe, in-memory document store and edit applier.
///
/// # Examples
///
/// ```
/// use tm_core::{DocumentStore, EditApplier, FileEdits, MemoryWorkspace};
/// use camino::Utf8Path;
///
/// let workspace = MemoryWorkspace::new();
/// workspace.insert("/src/a.ts", "export type Id = string;\n");
///
/// let path = Utf8Path::new("/src/c.ts");
/// assert!(!workspace.exists(path));
/// workspace.apply(path, &FileEdits::Create("export type X = 1;".into()))?;
/// assert_eq!(workspace.open(path)?, "export type X = 1;");
/// # Ok::<(), tm_core::CapabilityError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    files: RwLock<FxHashMap<Utf8PathBuf, String>>,
    rejected: RwLock<FxHashSet<Utf8PathBuf>>,
}

impl MemoryWorkspace {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document.
    pub fn insert(&self, path: impl Into<Utf8PathBuf>, content: impl Into<String>) {
        self.files.write().insert(path.into(), content.into());
    }

    /// Returns a copy of a document's text, if present.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<String> {
        self.files.read().get(path).cloned()
    }

    /// Makes every later transaction for `path` fail with
    /// [`CapabilityError::Rejected`].
    pub fn reject_edits_to(&self, path: impl Into<Utf8PathBuf>) {
        self.rejected.write().insert(path.into());
    }

    /// Returns all document paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        let mut paths: Vec<_> = self.files.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl DocumentStore for MemoryWorkspace {
    fn open(&self, path: &Utf8Path) -> Result<String, CapabilityError> {
        self.get(path)
            .ok_or_else(|| CapabilityError::NotFound(path.to_owned()))
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.read().contains_key(path)
    }
}

impl EditApplier for MemoryWorkspace {
    fn apply(&self, path: &Utf8Path, edits: &FileEdits) -> Result<(), CapabilityError> {
        if self.rejected.read().contains(path) {
            return Err(CapabilityError::Rejected {
                path: path.to_owned(),
                reason: "edits to this document are rejected".to_owned(),
            });
        }

        let mut files = self.files.write();
        let updated = match edits {
            FileEdits::Patch(_) | FileEdits::Replace(_) => {
                let current = files
                    .get(path)
                    .ok_or_else(|| CapabilityError::NotFound(path.to_owned()))?;
                edits.apply_to(current)?
            }
            FileEdits::Create(content) => {
                if files.contains_key(path) {
                    return Err(CapabilityError::Rejected {
                        path: path.to_owned(),
                        reason: "document already exists".to_owned(),
                    });
                }
                content.clone()
            }
        };

        tracing::debug!(%path, "applied in-memory transaction");
        files.insert(path.to_owned(), updated);
        Ok(())
    }
}

/// A reference finder that returns the same locations for every query.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceFinder {
    locations: Vec<Location>,
}

impl StaticReferenceFinder {
    /// Creates a finder answering with `locations`.
    #[must_use]
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }
}

impl ReferenceFinder for StaticReferenceFinder {
    fn find_references(
        &self,
        _path: &Utf8Path,
        _offset: usize,
    ) -> Result<Vec<Location>, CapabilityError> {
        Ok(self.locations.clone())
    }
}
