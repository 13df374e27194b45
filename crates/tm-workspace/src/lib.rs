//! Filesystem collaborators for the tymove refactoring engine.
//!
//! `tm-refactor` only talks to traits. This crate implements them on top of
//! a real project directory:
//!
//! - [`FsDocumentStore`]: reads documents from disk
//! - [`FsEditApplier`]: applies one file's transaction atomically (temp file + rename)
//! - [`ImportScanReferenceFinder`]: finds references by resolving every file's imports
//! - [`FileWalker`]: `.gitignore`-aware discovery of `.ts`/`.tsx` files
//!
//! # Architecture
//!
//! ```text
//! ImportScanReferenceFinder
//!     │
//!     ├── FileWalker (collect paths)
//!     │       │
//!     │       └── WalkBuilder (ignore crate)
//!     │
//!     ├── rayon par_iter + map_init (per-thread TsParser)
//!     │
//!     └── AliasResolver::resolve_specifier (relative + tsconfig paths)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use tm_core::{RefactorConfig, RefactorContext};
//! use tm_refactor::{AliasResolver, MoveRequest, TypeMover, TypeSelector};
//! use tm_workspace::{FsDocumentStore, FsEditApplier, ImportScanReferenceFinder};
//!
//! let root = Utf8Path::new("/path/to/project");
//! let context = RefactorContext::new(root, RefactorConfig::load(root)?);
//! let aliases = AliasResolver::load(&context);
//! let finder = ImportScanReferenceFinder::new(&context, aliases.clone());
//! let store = FsDocumentStore::new();
//!
//! let mover = TypeMover::from_parts(&context, aliases, &store, &finder);
//! let request = MoveRequest::new(
//!     root.join("src/a.ts"),
//!     TypeSelector::Name("User".into()),
//!     root.join("src/types/user.ts"),
//! );
//! let report = mover.execute(&request, &FsEditApplier::new())?;
//! println!("moved {} into {}", report.type_name, report.destination);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod finder;
mod store;
mod walker;

pub use error::WorkspaceError;
pub use finder::ImportScanReferenceFinder;
pub use store::{write_atomic, FsDocumentStore, FsEditApplier};
pub use walker::FileWalker;
