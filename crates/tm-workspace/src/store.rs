//! Filesystem-backed document store and edit applier.

use std::io::{self, Write};

use camino::Utf8Path;
use tm_core::{CapabilityError, DocumentStore, EditApplier, FileEdits};
use tracing::debug;

use crate::error::WorkspaceError;

/// Reads documents straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentStore;

impl FsDocumentStore {
    /// Creates a new store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentStore for FsDocumentStore {
    fn open(&self, path: &Utf8Path) -> Result<String, CapabilityError> {
        read_document(path)
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }
}

/// Applies edit transactions to files on disk.
///
/// The new content is computed in memory and written to a temporary file
/// in the same directory, which is then renamed over the target. A failed
/// transaction leaves the file untouched. Parent directories of created
/// files are created as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsEditApplier;

impl FsEditApplier {
    /// Creates a new applier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EditApplier for FsEditApplier {
    fn apply(&self, path: &Utf8Path, edits: &FileEdits) -> Result<(), CapabilityError> {
        let updated = match edits {
            FileEdits::Create(content) => {
                if path.exists() {
                    return Err(CapabilityError::Rejected {
                        path: path.to_owned(),
                        reason: "document already exists".to_owned(),
                    });
                }
                content.clone()
            }
            FileEdits::Patch(_) | FileEdits::Replace(_) => {
                let current = read_document(path)?;
                edits.apply_to(&current)?
            }
        };

        write_atomic(path, &updated)?;
        debug!(%path, bytes = updated.len(), "wrote document");
        Ok(())
    }
}

fn read_document(path: &Utf8Path) -> Result<String, CapabilityError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CapabilityError::NotFound(path.to_owned())
        } else {
            CapabilityError::Io {
                path: path.to_owned(),
                source,
            }
        }
    })
}

/// Writes `content` to `path` through a sibling temp file and a rename.
///
/// # Errors
///
/// Returns [`WorkspaceError::Write`] if any step fails.
pub fn write_atomic(path: &Utf8Path, content: &str) -> Result<(), WorkspaceError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| WorkspaceError::write(path, e))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| WorkspaceError::write(path, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|e| WorkspaceError::write(path, e))?;
    temp.persist(path)
        .map_err(|e| WorkspaceError::write(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tm_core::{ByteRange, PendingEdit};

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = utf8_root(&dir).join("missing.ts");

        let store = FsDocumentStore::new();
        assert!(!store.exists(&path));
        assert!(matches!(store.open(&path), Err(CapabilityError::NotFound(_))));
    }

    #[test]
    fn test_patch_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = utf8_root(&dir).join("b.ts");
        fs::write(&path, "import { Foo } from './a';\n").expect("write");

        let edits = FileEdits::Patch(vec![PendingEdit::replace(ByteRange::new(20, 25), "'./c'")]);
        FsEditApplier::new().apply(&path, &edits).expect("apply");

        assert_eq!(
            FsDocumentStore::new().open(&path).expect("open"),
            "import { Foo } from './c';\n"
        );
    }

    #[test]
    fn test_create_makes_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = utf8_root(&dir).join("src/types/new.ts");

        FsEditApplier::new()
            .apply(&path, &FileEdits::Create("export type A = 1;\n".to_owned()))
            .expect("create");

        assert_eq!(fs::read_to_string(&path).expect("read"), "export type A = 1;\n");
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = utf8_root(&dir).join("a.ts");
        fs::write(&path, "keep me\n").expect("write");

        let err = FsEditApplier::new()
            .apply(&path, &FileEdits::Create("overwrite\n".to_owned()))
            .expect_err("rejected");
        assert!(matches!(err, CapabilityError::Rejected { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), "keep me\n");
    }

    #[test]
    fn test_invalid_batch_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = utf8_root(&dir).join("a.ts");
        fs::write(&path, "short\n").expect("write");

        let edits = FileEdits::Patch(vec![PendingEdit::delete(ByteRange::new(2, 40))]);
        let err = FsEditApplier::new().apply(&path, &edits).expect_err("out of bounds");
        assert!(matches!(err, CapabilityError::Edit(_)));
        assert_eq!(fs::read_to_string(&path).expect("read"), "short\n");
    }
}
