//! Tagged classification of syntax nodes.
//!
//! tree-sitter exposes node kinds as strings. The engine only cares about a
//! closed set of them, so every node is mapped once to a [`SyntaxKind`] and
//! callers dispatch with an exhaustive `match` instead of comparing strings.

use tm_core::{ByteRange, TypeKind};
use tree_sitter::Node;

/// The node kinds the refactoring engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// `type Foo = ...`
    TypeAlias,
    /// `interface Foo { ... }`
    Interface,
    /// `enum Foo { ... }`
    Enum,
    /// `import ... from "..."`
    ImportDeclaration,
    /// Anything else.
    Other,
}

impl SyntaxKind {
    /// Classifies a node.
    #[must_use]
    pub fn of(node: Node<'_>) -> Self {
        match node.kind() {
            "type_alias_declaration" => Self::TypeAlias,
            "interface_declaration" => Self::Interface,
            "enum_declaration" => Self::Enum,
            "import_statement" => Self::ImportDeclaration,
            _ => Self::Other,
        }
    }

    /// Returns the movable type kind, if this is a type declaration.
    #[must_use]
    pub const fn type_kind(self) -> Option<TypeKind> {
        match self {
            Self::TypeAlias => Some(TypeKind::TypeAlias),
            Self::Interface => Some(TypeKind::Interface),
            Self::Enum => Some(TypeKind::Enum),
            Self::ImportDeclaration | Self::Other => None,
        }
    }
}

/// Returns the byte range covered by `node`.
#[inline]
#[must_use]
pub fn node_range(node: Node<'_>) -> ByteRange {
    ByteRange::new(node.start_byte(), node.end_byte())
}

/// Returns the source text covered by `node`.
#[inline]
#[must_use]
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Returns `true` if `node` has an anonymous child token spelled `keyword`.
///
/// Used for modifiers such as the `type` in `import type { Foo }`, which
/// tree-sitter represents as an unnamed child rather than a field.
#[must_use]
pub fn has_keyword_child(node: Node<'_>, keyword: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == keyword)
}

/// Visits every node under `root` in pre-order.
pub fn walk_preorder<'tree>(root: Node<'tree>, mut visit: impl FnMut(Node<'tree>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}
