//! Move-type refactoring engine.
//!
//! Moves one type alias, interface or enum from its file to another and
//! rewrites every import of it so the project keeps compiling.
//!
//! # Components
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`alias`] | Compute import specifiers, preferring `tsconfig.json` path aliases |
//! | [`locator`] | Find the declaration at a position or by name |
//! | [`dependency`] | List the types a declaration references |
//! | [`references`] | Find referencing files and how they import the type |
//! | [`rewriter`] | Compute the import edits for one referencing file |
//! | [`relocator`] | Remove the declaration and append it to the destination |
//! | [`mover`] | Plan a move completely, then apply it file by file |
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use tm_core::{ByteRange, Location, MemoryWorkspace, RefactorConfig, RefactorContext, StaticReferenceFinder};
//! use tm_refactor::{AliasResolver, MoveRequest, TypeMover, TypeSelector};
//!
//! let workspace = MemoryWorkspace::new();
//! workspace.insert("/p/a.ts", "export type Id = string;\n");
//! workspace.insert("/p/b.ts", "import { Id } from './a';\nlet x: Id;\n");
//!
//! let context = RefactorContext::new("/p", RefactorConfig::default());
//! let finder = StaticReferenceFinder::new(vec![Location::new("/p/b.ts", ByteRange::new(9, 11))]);
//! let mover = TypeMover::new(&context, &workspace, &finder).with_aliases(AliasResolver::disabled());
//!
//! mover.execute(
//!     &MoveRequest::new("/p/a.ts", TypeSelector::Name("Id".into()), "/p/c.ts"),
//!     &workspace,
//! )?;
//!
//! assert_eq!(
//!     workspace.get(Utf8Path::new("/p/b.ts")).as_deref(),
//!     Some("import { Id } from \"./c\";\nlet x: Id;\n")
//! );
//! # Ok::<(), tm_refactor::RefactorError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod alias;
pub mod dependency;
pub mod error;
pub mod locator;
pub mod mover;
pub mod references;
pub mod relocator;
pub mod rewriter;

pub use alias::{AliasConfig, AliasResolver};
pub use error::RefactorError;
pub use mover::{apply_plan, MovePlan, MoveReport, MoveRequest, TypeMover, TypeSelector};
pub use references::ExistingImport;
