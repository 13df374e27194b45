//! TypeScript parser management using tree-sitter.
//!
//! This module provides the [`TsParser`] struct for parsing TypeScript files
//! and the [`ParsedSource`] view used to query a parsed document.

use camino::Utf8Path;
use tm_core::ByteRange;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::declaration::{self, TypeDeclaration};
use crate::error::ParseError;
use crate::import::{self, ImportDeclaration};
use crate::syntax::{node_range, node_text, walk_preorder};

/// The grammar a document is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Plain TypeScript (`.ts`, `.mts`, `.cts`, `.d.ts`).
    #[default]
    TypeScript,
    /// TypeScript with JSX (`.tsx`).
    Tsx,
}

impl Dialect {
    /// Picks the dialect from a file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use tm_ts_parser::Dialect;
    ///
    /// assert_eq!(Dialect::from_path(Utf8Path::new("a/b.tsx")), Dialect::Tsx);
    /// assert_eq!(Dialect::from_path(Utf8Path::new("a/b.ts")), Dialect::TypeScript);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("tsx") => Self::Tsx,
            _ => Self::TypeScript,
        }
    }

    /// Returns the tree-sitter language for this dialect.
    #[must_use]
    pub fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// TypeScript parser.
///
/// Wraps a tree-sitter parser configured for one [`Dialect`]. The parser can
/// be reused for multiple files to avoid repeated initialization.
///
/// # Thread Safety
///
/// `TsParser` is `Send` but not `Sync`. For parallel work with rayon, create
/// one parser per worker (for example with `map_init`).
///
/// # Examples
///
/// ```
/// use tm_ts_parser::TsParser;
///
/// let mut parser = TsParser::new()?;
/// let parsed = parser.parse("import { Foo } from './foo';\ntype Bar = Foo;\n")?;
///
/// assert_eq!(parsed.imports().len(), 1);
/// assert_eq!(parsed.type_declarations().len(), 1);
/// # Ok::<(), tm_ts_parser::ParseError>(())
/// ```
pub struct TsParser {
    parser: Parser,
    dialect: Dialect,
}

impl TsParser {
    /// Creates a new TypeScript parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the TypeScript language
    /// cannot be set on the parser.
    pub fn new() -> Result<Self, ParseError> {
        Self::for_dialect(Dialect::TypeScript)
    }

    /// Creates a new TSX parser. Use this for `.tsx` files.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the TSX language cannot be set
    /// on the parser.
    pub fn new_tsx() -> Result<Self, ParseError> {
        Self::for_dialect(Dialect::Tsx)
    }

    /// Creates a parser for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the language cannot be set.
    pub fn for_dialect(dialect: Dialect) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&dialect.language())
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser, dialect })
    }

    /// Returns the dialect this parser was created for.
    #[inline]
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parses `source`.
    ///
    /// tree-sitter recovers from syntax errors, so malformed input still
    /// yields a tree; see [`ParsedSource::has_error`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Parse`] if the parser gives up.
    pub fn parse<'s>(&mut self, source: &'s str) -> Result<ParsedSource<'s>, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::Parse)?;

        Ok(ParsedSource {
            tree,
            source,
            dialect: self.dialect,
        })
    }
}

impl std::fmt::Debug for TsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsParser")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

/// Parses `source` with a fresh parser for the dialect of `path`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the parser cannot be created or gives up.
pub fn parse_file<'s>(path: &Utf8Path, source: &'s str) -> Result<ParsedSource<'s>, ParseError> {
    TsParser::for_dialect(Dialect::from_path(path))?.parse(source)
}

/// A parsed document: the syntax tree together with the text it was built
/// from.
#[derive(Debug)]
pub struct ParsedSource<'s> {
    tree: Tree,
    source: &'s str,
    dialect: Dialect,
}

impl<'s> ParsedSource<'s> {
    /// Returns the source text.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> &'s str {
        self.source
    }

    /// Returns the syntax tree.
    #[inline]
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns the `program` node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the dialect the document was parsed with.
    #[inline]
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns `true` if the tree contains syntax errors.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.root().has_error()
    }

    /// Returns the top-level import declarations in file order.
    #[must_use]
    pub fn imports(&self) -> Vec<ImportDeclaration> {
        import::extract_imports(self.root(), self.source)
    }

    /// Returns the end offset of the last top-level import, or 0 if there is
    /// none.
    #[must_use]
    pub fn last_import_end(&self) -> usize {
        self.imports().last().map_or(0, |import| import.range.end)
    }

    /// Returns every type alias, interface and enum declaration in pre-order.
    #[must_use]
    pub fn type_declarations(&self) -> Vec<TypeDeclaration<'_>> {
        declaration::collect(self.root(), self.source)
    }

    /// Returns the innermost type declaration whose span contains `offset`.
    #[must_use]
    pub fn declaration_at(&self, offset: usize) -> Option<TypeDeclaration<'_>> {
        self.type_declarations()
            .into_iter()
            .rev()
            .find(|decl| decl.span.contains(offset))
    }

    /// Returns the first type declaration named `name`, in pre-order.
    #[must_use]
    pub fn declaration_named(&self, name: &str) -> Option<TypeDeclaration<'_>> {
        self.type_declarations()
            .into_iter()
            .find(|decl| decl.name == name)
    }

    /// Returns the type names referenced inside `decl`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::QueryCompile`] if the reference query fails to
    /// compile.
    pub fn type_references(&self, decl: &TypeDeclaration<'_>) -> Result<Vec<String>, ParseError> {
        declaration::referenced_type_names(decl, self.source, self.dialect)
    }

    /// Returns the ranges of every identifier spelled `name`.
    ///
    /// Covers value identifiers, type identifiers, shorthand properties and
    /// import specifiers; property names such as `a.Foo` are not included.
    #[must_use]
    pub fn identifier_occurrences(&self, name: &str) -> Vec<ByteRange> {
        let mut ranges = Vec::new();
        walk_preorder(self.root(), |node| {
            if matches!(
                node.kind(),
                "identifier" | "type_identifier" | "shorthand_property_identifier"
            ) && node_text(node, self.source) == name
            {
                ranges.push(node_range(node));
            }
        });
        ranges
    }
}
