//! TypeScript parser using tree-sitter for import and type declaration
//! analysis.
//!
//! This crate parses TypeScript and TSX documents and answers the questions
//! the refactoring engine asks of a file:
//!
//! - Which top-level `import` statements does it contain, with which bindings?
//! - Where does each type alias, interface and enum start and end?
//! - Which type names does a declaration reference?
//! - Where is a given identifier used?
//!
//! # Overview
//!
//! The main entry point is [`TsParser`], which wraps a tree-sitter parser
//! configured for one [`Dialect`]. Parsing yields a [`ParsedSource`]:
//!
//! ```
//! use tm_ts_parser::TsParser;
//!
//! let mut parser = TsParser::new()?;
//! let source = r#"
//! import type { Id } from "./ids";
//! export interface User { id: Id; manager?: User }
//! "#;
//!
//! let parsed = parser.parse(source)?;
//!
//! let import = &parsed.imports()[0];
//! assert!(import.is_type_only);
//! assert_eq!(import.specifier, "./ids");
//!
//! let user = parsed.declaration_named("User").expect("declared");
//! assert_eq!(parsed.type_references(&user)?, vec!["Id"]);
//! # Ok::<(), tm_ts_parser::ParseError>(())
//! ```
//!
//! # Syntax Classification
//!
//! Node kinds are mapped once to [`SyntaxKind`] so callers match on a closed
//! enum:
//!
//! | Node kind | [`SyntaxKind`] |
//! |-----------|----------------|
//! | `type_alias_declaration` | `TypeAlias` |
//! | `interface_declaration` | `Interface` |
//! | `enum_declaration` | `Enum` |
//! | `import_statement` | `ImportDeclaration` |
//! | anything else | `Other` |

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod declaration;
pub mod error;
pub mod import;
pub mod parser;
pub mod queries;
pub mod syntax;

pub use declaration::TypeDeclaration;
pub use error::ParseError;
pub use import::{ImportDeclaration, NamedBinding};
pub use parser::{parse_file, Dialect, ParsedSource, TsParser};
pub use syntax::SyntaxKind;
