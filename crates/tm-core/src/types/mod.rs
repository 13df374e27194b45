//! Domain types for the refactoring engine.
//!
//! - [`range`] - Byte ranges and cross-file locations
//! - [`declaration`] - Located type declarations
//! - [`change`] - Per-file import changes and the per-move change set
//!
//! All public types are re-exported at this module level and at the crate root:
//!
//! ```
//! use tm_core::{ByteRange, ImportChange, TypeInfo, TypeKind};
//! ```

mod change;
mod declaration;
mod range;

pub use change::{ChangeSet, ImportChange};
pub use declaration::{TypeInfo, TypeKind};
pub use range::{ByteRange, Location};
