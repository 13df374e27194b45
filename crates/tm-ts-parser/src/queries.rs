//! Pre-compiled tree-sitter queries.
//!
//! This module provides the [`TYPE_REFERENCE_QUERY`] constant and lazily
//! compiled, globally cached [`Query`] instances for each grammar dialect.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;
use crate::parser::Dialect;

/// Tree-sitter query for type references.
///
/// # Capture Names
///
/// - `type.reference` - A `type_identifier` node
/// - `type.nested` - A qualified reference such as `ns.Foo`
pub const TYPE_REFERENCE_QUERY: &str = r"
; Plain references: Foo, Foo<T>, extends Foo
(type_identifier) @type.reference

; Qualified references: ns.Foo
(nested_type_identifier) @type.nested
";

/// Capture index for `type.reference`.
pub const CAPTURE_TYPE_REFERENCE: u32 = 0;

/// Capture index for `type.nested`.
pub const CAPTURE_TYPE_NESTED: u32 = 1;

/// Global cache for the compiled type reference query (TypeScript).
static TYPE_REFERENCE_QUERY_TS: OnceLock<Query> = OnceLock::new();

/// Global cache for the compiled type reference query (TSX).
static TYPE_REFERENCE_QUERY_TSX: OnceLock<Query> = OnceLock::new();

/// Returns the compiled type reference query for `dialect`.
///
/// The query is compiled once per dialect and cached for all subsequent
/// calls. This function is thread-safe.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn type_reference_query(dialect: Dialect) -> Result<&'static Query, ParseError> {
    let cell = match dialect {
        Dialect::TypeScript => &TYPE_REFERENCE_QUERY_TS,
        Dialect::Tsx => &TYPE_REFERENCE_QUERY_TSX,
    };

    if let Some(query) = cell.get() {
        return Ok(query);
    }

    let query = compile_query(&dialect.language(), TYPE_REFERENCE_QUERY)?;
    Ok(cell.get_or_init(|| query))
}

/// Compiles `source` for the given language.
fn compile_query(language: &Language, source: &str) -> Result<Query, ParseError> {
    Query::new(language, source).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}
