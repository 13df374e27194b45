//! Reference resolution.
//!
//! Project-wide search is delegated to a [`ReferenceFinder`]. This module
//! wraps it so that a failed or empty search degrades to "no references",
//! and provides the per-file import lookups the mover needs.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use tm_core::{ByteRange, Location, ReferenceFinder};
use tm_ts_parser::{ImportDeclaration, ParsedSource};
use tracing::{debug, warn};

/// How a file currently imports the moved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingImport {
    /// The unquoted module specifier.
    pub specifier: String,
    /// Whether the import is type-only, either through `import type` or an
    /// inline `type` modifier.
    pub is_type_only: bool,
}

/// Returns every reference to the symbol at `offset` in `path`.
///
/// Search failures are logged and yield an empty list; the move then
/// proceeds without rewriting other files.
pub fn find_all_references<F>(finder: &F, path: &Utf8Path, offset: usize) -> Vec<Location>
where
    F: ReferenceFinder + ?Sized,
{
    match finder.find_references(path, offset) {
        Ok(locations) if locations.is_empty() => {
            debug!(%path, offset, "no references found");
            locations
        }
        Ok(locations) => {
            debug!(%path, count = locations.len(), "found references");
            locations
        }
        Err(err) => {
            warn!(%path, error = %err, "reference search failed, continuing without references");
            Vec::new()
        }
    }
}

/// Groups locations by file, keeping the order files were first seen in.
#[must_use]
pub fn group_by_file(locations: &[Location]) -> IndexMap<Utf8PathBuf, Vec<ByteRange>> {
    let mut grouped: IndexMap<Utf8PathBuf, Vec<ByteRange>> = IndexMap::new();
    for location in locations {
        grouped
            .entry(location.path.clone())
            .or_default()
            .push(location.range);
    }
    grouped
}

/// Returns the spans of named import specifiers in `parsed` that import
/// `type_name`.
#[must_use]
pub fn find_import_sites_in_file(
    path: &Utf8Path,
    parsed: &ParsedSource<'_>,
    type_name: &str,
) -> Vec<Location> {
    parsed
        .imports()
        .iter()
        .flat_map(|import| import.named_bindings().iter())
        .filter(|binding| binding.name == type_name)
        .map(|binding| Location::new(path, binding.range))
        .collect()
}

/// Returns how `imports` bring `type_name` into scope.
///
/// Every import whose named bindings include `type_name` replaces the
/// previous answer, so when a file imports the name more than once the
/// last statement wins.
///
/// # Examples
///
/// ```
/// use tm_refactor::references::find_existing_import_path;
/// use tm_ts_parser::TsParser;
///
/// let mut parser = TsParser::new()?;
/// let parsed = parser.parse("import { Foo } from './a';\nimport type { Foo } from './b';\n")?;
///
/// let existing = find_existing_import_path(&parsed.imports(), "Foo").expect("imported");
/// assert_eq!(existing.specifier, "./b");
/// assert!(existing.is_type_only);
/// # Ok::<(), tm_ts_parser::ParseError>(())
/// ```
#[must_use]
pub fn find_existing_import_path(
    imports: &[ImportDeclaration],
    type_name: &str,
) -> Option<ExistingImport> {
    let mut found = None;
    for import in imports {
        if import.named_binding(type_name).is_some() {
            found = Some(ExistingImport {
                specifier: import.specifier.clone(),
                is_type_only: import.imports_as_type(type_name),
            });
        }
    }
    found
}
