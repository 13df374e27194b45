//! Finding the declaration to move.

use camino::Utf8Path;
use tm_core::TypeInfo;
use tm_ts_parser::{ParseError, ParsedSource, TypeDeclaration};

use crate::dependency::collect_referenced_type_names;
use crate::error::RefactorError;

/// Returns the innermost type alias, interface or enum containing `offset`.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if dependency collection fails.
pub fn find_at_position(
    parsed: &ParsedSource<'_>,
    offset: usize,
) -> Result<Option<TypeInfo>, ParseError> {
    parsed
        .declaration_at(offset)
        .map(|decl| to_type_info(parsed, &decl))
        .transpose()
}

/// Returns the first declaration named `name`, searching nested scopes too.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if dependency collection fails.
pub fn find_by_name(parsed: &ParsedSource<'_>, name: &str) -> Result<Option<TypeInfo>, ParseError> {
    parsed
        .declaration_named(name)
        .map(|decl| to_type_info(parsed, &decl))
        .transpose()
}

/// Fails if `destination` already declares a type named `type_name`.
///
/// # Errors
///
/// Returns [`RefactorError::NameConflict`] on a clash.
pub fn validate_destination_free(
    type_name: &str,
    destination: &ParsedSource<'_>,
    destination_path: &Utf8Path,
) -> Result<(), RefactorError> {
    if destination.declaration_named(type_name).is_some() {
        return Err(RefactorError::NameConflict {
            path: destination_path.to_owned(),
            name: type_name.to_owned(),
        });
    }
    Ok(())
}

/// Converts a 1-based line and 0-based character column into a byte offset.
///
/// Returns `None` if the line does not exist or the column is past its end.
///
/// # Examples
///
/// ```
/// use tm_refactor::locator::position_to_offset;
///
/// let source = "type A = 1;\ntype B = 2;\n";
/// assert_eq!(position_to_offset(source, 2, 5), Some(17));
/// assert_eq!(position_to_offset(source, 9, 0), None);
/// ```
#[must_use]
pub fn position_to_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    let index = line.checked_sub(1)?;

    let mut start = 0;
    for (n, text) in source.split_inclusive('\n').enumerate() {
        if n == index {
            let content = text.trim_end_matches(['\n', '\r']);
            if column == content.chars().count() {
                return Some(start + content.len());
            }
            return content
                .char_indices()
                .nth(column)
                .map(|(byte, _)| start + byte);
        }
        start += text.len();
    }

    // A position on the empty line after a trailing newline.
    (index == source.split_inclusive('\n').count() && column == 0).then_some(source.len())
}

fn to_type_info(parsed: &ParsedSource<'_>, decl: &TypeDeclaration<'_>) -> Result<TypeInfo, ParseError> {
    let dependencies = collect_referenced_type_names(parsed, decl)?;
    Ok(TypeInfo::new(
        decl.name.clone(),
        decl.kind,
        decl.span,
        decl.name_range,
        dependencies,
    ))
}
