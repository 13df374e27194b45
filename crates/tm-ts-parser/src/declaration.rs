//! Type declaration extraction.
//!
//! A movable declaration is a `type` alias, an `interface` or an `enum`. Its
//! span is widened to cover the `export` and `declare` wrappers around it so
//! that removing the span removes the whole statement.

use rustc_hash::FxHashSet;
use streaming_iterator::StreamingIterator;
use tm_core::{ByteRange, TypeKind};
use tree_sitter::{Node, QueryCursor};

use crate::error::ParseError;
use crate::parser::Dialect;
use crate::queries::{type_reference_query, CAPTURE_TYPE_NESTED, CAPTURE_TYPE_REFERENCE};
use crate::syntax::{node_range, node_text, walk_preorder, SyntaxKind};

/// A type declaration found in a parsed document.
#[derive(Debug, Clone)]
pub struct TypeDeclaration<'tree> {
    /// The `type_alias_declaration`, `interface_declaration` or
    /// `enum_declaration` node.
    pub node: Node<'tree>,
    /// What kind of declaration this is.
    pub kind: TypeKind,
    /// The declared name.
    pub name: String,
    /// Span of the name identifier.
    pub name_range: ByteRange,
    /// Span of the whole statement, including `export`/`declare` wrappers and
    /// the trailing semicolon of a type alias.
    pub span: ByteRange,
}

/// Collects every type declaration under `root` in pre-order.
pub(crate) fn collect<'tree>(root: Node<'tree>, source: &str) -> Vec<TypeDeclaration<'tree>> {
    let mut declarations = Vec::new();
    walk_preorder(root, |node| {
        let Some(kind) = SyntaxKind::of(node).type_kind() else {
            return;
        };
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };

        declarations.push(TypeDeclaration {
            node,
            kind,
            name: node_text(name_node, source).to_owned(),
            name_range: node_range(name_node),
            span: statement_span(node),
        });
    });
    declarations
}

/// Widens a declaration's range to the `export`/`declare` statements that
/// directly wrap it.
fn statement_span(node: Node<'_>) -> ByteRange {
    let mut outer = node;
    while let Some(parent) = outer.parent() {
        match parent.kind() {
            "export_statement" | "ambient_declaration" => outer = parent,
            _ => break,
        }
    }
    node_range(outer)
}

/// Returns the names of the types referenced inside `decl`, de-duplicated
/// in first-occurrence order.
///
/// The declaration's own name and the names of type parameters declared
/// anywhere inside it are excluded. Qualified references such as `ns.Foo`
/// are reported with their full text.
pub(crate) fn referenced_type_names(
    decl: &TypeDeclaration<'_>,
    source: &str,
    dialect: Dialect,
) -> Result<Vec<String>, ParseError> {
    let query = type_reference_query(dialect)?;

    let mut excluded: FxHashSet<&str> = FxHashSet::default();
    excluded.insert(decl.name.as_str());
    walk_preorder(decl.node, |node| {
        if node.kind() == "type_parameter" {
            if let Some(name) = node.child_by_field_name("name") {
                excluded.insert(node_text(name, source));
            }
        }
    });

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut names = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, decl.node, source.as_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            let text = match capture.index {
                CAPTURE_TYPE_REFERENCE => {
                    // The enclosing qualified name is reported instead.
                    if node
                        .parent()
                        .is_some_and(|p| p.kind() == "nested_type_identifier")
                    {
                        continue;
                    }
                    node_text(node, source)
                }
                CAPTURE_TYPE_NESTED => node_text(node, source),
                _ => continue,
            };

            if text.is_empty() || excluded.contains(text) || !seen.insert(text) {
                continue;
            }
            names.push(text.to_owned());
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use crate::TsParser;
    use tm_core::TypeKind;

    #[test]
    fn test_collect_all_kinds() {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let source = "type A = string;\ninterface B { a: A }\nenum C { X, Y }\n";
        let parsed = parser.parse(source).expect("Parse failed");

        let decls = parsed.type_declarations();
        let summary: Vec<_> = decls.iter().map(|d| (d.name.as_str(), d.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("A", TypeKind::TypeAlias),
                ("B", TypeKind::Interface),
                ("C", TypeKind::Enum),
            ]
        );
    }

    #[test]
    fn test_span_includes_export_and_semicolon() {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let source = "const a = 1;\nexport type Id = string;\n";
        let parsed = parser.parse(source).expect("Parse failed");

        let decl = parsed.declaration_named("Id").expect("Id");
        assert_eq!(
            &source[decl.span.start..decl.span.end],
            "export type Id = string;"
        );
        assert_eq!(&source[decl.name_range.start..decl.name_range.end], "Id");
    }

    #[test]
    fn test_span_includes_declare() {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let source = "export declare enum Mode { On, Off }\n";
        let parsed = parser.parse(source).expect("Parse failed");

        let decl = parsed.declaration_named("Mode").expect("Mode");
        assert_eq!(decl.span.start, 0);
        assert_eq!(&source[decl.span.start..decl.span.end], source.trim_end());
    }

    #[test]
    fn test_referenced_type_names() {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let source = "interface Node<T> extends Base {\n  value: T;\n  children: Node<T>[];\n  meta: Meta | Base;\n  tag: ns.Tag;\n  size: number;\n}\n";
        let parsed = parser.parse(source).expect("Parse failed");

        let decl = parsed.declaration_named("Node").expect("Node");
        let deps = parsed.type_references(&decl).expect("references");
        assert_eq!(deps, vec!["Base", "Meta", "ns.Tag"]);
    }

    #[test]
    fn test_enum_has_no_references() {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let parsed = parser.parse("enum E { A = 1 }").expect("Parse failed");
        let decl = parsed.declaration_named("E").expect("E");
        assert!(parsed.type_references(&decl).expect("references").is_empty());
    }
}
