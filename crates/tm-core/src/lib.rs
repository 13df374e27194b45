//! Core types, edit transactions, and collaborator traits for tymove.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Domain types ([`TypeInfo`], [`ImportChange`], [`ChangeSet`], [`Location`])
//! - The per-file edit transaction log ([`PendingEdit`], [`FileEdits`], [`EditPlan`])
//! - Configuration ([`RefactorConfig`], [`RefactorContext`])
//! - Collaborator traits ([`DocumentStore`], [`EditApplier`], [`ReferenceFinder`])
//! - An in-memory workspace implementing the collaborator traits
//! - Error types for configuration, edits and collaborators
//!
//! # Edit Ordering
//!
//! Every edit computed for a file is collected into a single [`FileEdits`]
//! log. The log is normalized exactly once before application: edits are
//! sorted by descending start offset, so offsets recorded against the
//! original text stay valid while the batch is applied.
//!
//! ```
//! use tm_core::{ByteRange, PendingEdit, apply_edits};
//!
//! let source = "import { Foo } from './a';\n";
//! let edits = vec![PendingEdit::replace(ByteRange::new(20, 25), "'./c'")];
//!
//! let updated = apply_edits(source, &edits)?;
//! assert_eq!(updated, "import { Foo } from './c';\n");
//! # Ok::<(), tm_core::EditError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod capability;
pub mod config;
pub mod edit;
pub mod error;
pub mod hash;
pub mod memory;
pub mod types;

pub use capability::{DocumentStore, EditApplier, ReferenceFinder};
pub use config::{ImportStyle, RefactorConfig, RefactorContext, CONFIG_FILE_NAME};
pub use edit::{apply_edits, normalize_edits, EditPlan, FileEdits, PendingEdit};
pub use error::{CapabilityError, ConfigError, EditError};
pub use hash::{FxHashMap, FxHashSet};
pub use memory::{MemoryWorkspace, StaticReferenceFinder};
pub use types::{ByteRange, ChangeSet, ImportChange, Location, TypeInfo, TypeKind};
