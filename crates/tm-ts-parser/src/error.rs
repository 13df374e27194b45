//! Error types for the tm-ts-parser crate.

/// Errors that can occur during TypeScript parsing.
///
/// # Examples
///
/// ```
/// use tm_ts_parser::ParseError;
///
/// fn describe(err: &ParseError) -> &'static str {
///     match err {
///         ParseError::LanguageInit => "grammar",
///         ParseError::QueryCompile { .. } => "query",
///         ParseError::Parse => "parse",
///     }
/// }
/// assert_eq!(describe(&ParseError::Parse), "parse");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the TypeScript language on the parser.
    #[error("failed to set TypeScript language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The kind of query error.
        kind: tree_sitter::QueryError,
    },

    /// Failed to parse the source code.
    ///
    /// This typically indicates the parser was cancelled or timed out.
    #[error("failed to parse source code")]
    Parse,
}
