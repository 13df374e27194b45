//! Import declaration extraction.
//!
//! Only top-level `import` statements are considered. Each is turned into an
//! [`ImportDeclaration`] carrying enough detail to rebuild the statement:
//! bindings, the specifier and its quote style, and the `type` modifier.

use tm_core::ByteRange;
use tree_sitter::Node;

use crate::syntax::{has_keyword_child, node_range, node_text, SyntaxKind};

/// One named binding inside `{ ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBinding {
    /// The imported (exported-side) name.
    pub name: String,
    /// The local alias from `name as alias`.
    pub alias: Option<String>,
    /// Whether the binding carries an inline `type` modifier.
    pub is_type: bool,
    /// Span of the whole `import_specifier`.
    pub range: ByteRange,
}

impl NamedBinding {
    /// Creates a binding with no alias.
    #[must_use]
    pub fn new(name: impl Into<String>, is_type: bool) -> Self {
        Self {
            name: name.into(),
            alias: None,
            is_type,
            range: ByteRange::default(),
        }
    }

    /// Returns the name the binding introduces into the file's scope.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Renders the binding in canonical form: `type A as B`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tm_ts_parser::NamedBinding;
    ///
    /// let mut binding = NamedBinding::new("Foo", true);
    /// assert_eq!(binding.render(), "type Foo");
    /// binding.alias = Some("Bar".to_owned());
    /// assert_eq!(binding.render(), "type Foo as Bar");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.is_type {
            out.push_str("type ");
        }
        out.push_str(&self.name);
        if let Some(alias) = &self.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
        out
    }
}

/// A top-level `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Span of the whole statement, including its semicolon.
    pub range: ByteRange,
    /// The module specifier without quotes.
    pub specifier: String,
    /// Span of the specifier string, including quotes.
    pub specifier_range: ByteRange,
    /// The quote character used around the specifier.
    pub quote: char,
    /// `import type ...`
    pub is_type_only: bool,
    /// `import Foo from ...`
    pub default_binding: Option<String>,
    /// `import * as ns from ...`
    pub namespace_binding: Option<String>,
    /// `import { ... } from ...`; `None` when there are no braces.
    pub named: Option<Vec<NamedBinding>>,
    /// The statement contains syntax errors, is an `import x = require()`,
    /// or has no specifier.
    pub is_malformed: bool,
}

impl ImportDeclaration {
    /// Returns the named binding importing `name`, if any.
    #[must_use]
    pub fn named_binding(&self, name: &str) -> Option<&NamedBinding> {
        self.named
            .as_deref()
            .and_then(|named| named.iter().find(|binding| binding.name == name))
    }

    /// Returns the named bindings, or an empty slice.
    #[must_use]
    pub fn named_bindings(&self) -> &[NamedBinding] {
        self.named.as_deref().unwrap_or(&[])
    }

    /// Returns `true` for `import "./polyfill";`.
    #[must_use]
    pub fn is_side_effect(&self) -> bool {
        self.default_binding.is_none() && self.namespace_binding.is_none() && self.named.is_none()
    }

    /// Returns `true` if `name` is imported with type-only semantics, either
    /// through `import type` or an inline modifier.
    #[must_use]
    pub fn imports_as_type(&self, name: &str) -> bool {
        self.is_type_only || self.named_binding(name).is_some_and(|b| b.is_type)
    }
}

/// Extracts the top-level import statements under `root` in file order.
pub(crate) fn extract_imports(root: Node<'_>, source: &str) -> Vec<ImportDeclaration> {
    let mut cursor = root.walk();
    root.named_children(&mut cursor)
        .filter(|node| SyntaxKind::of(*node) == SyntaxKind::ImportDeclaration)
        .map(|node| build_import(node, source))
        .collect()
}

fn build_import(statement: Node<'_>, source: &str) -> ImportDeclaration {
    let mut import = ImportDeclaration {
        range: node_range(statement),
        specifier: String::new(),
        specifier_range: ByteRange::empty(statement.end_byte()),
        quote: '"',
        is_type_only: has_keyword_child(statement, "type"),
        default_binding: None,
        namespace_binding: None,
        named: None,
        is_malformed: statement.has_error(),
    };

    match statement.child_by_field_name("source") {
        Some(string) => {
            let raw = node_text(string, source);
            import.specifier_range = node_range(string);
            import.quote = raw.chars().next().filter(|c| matches!(c, '\'' | '"')).unwrap_or('"');
            import.specifier = raw.trim_matches(|c| c == '\'' || c == '"').to_owned();
        }
        None => import.is_malformed = true,
    }

    let mut cursor = statement.walk();
    for child in statement.named_children(&mut cursor) {
        match child.kind() {
            "import_clause" => read_clause(child, source, &mut import),
            "import_require_clause" => import.is_malformed = true,
            _ => {}
        }
    }

    import
}

fn read_clause(clause: Node<'_>, source: &str, import: &mut ImportDeclaration) {
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => import.default_binding = Some(node_text(child, source).to_owned()),
            "namespace_import" => {
                let mut inner = child.walk();
                import.namespace_binding = child
                    .named_children(&mut inner)
                    .find(|n| n.kind() == "identifier")
                    .map(|n| node_text(n, source).to_owned());
            }
            "named_imports" => {
                let mut inner = child.walk();
                let bindings = child
                    .named_children(&mut inner)
                    .filter(|n| n.kind() == "import_specifier")
                    .filter_map(|n| read_specifier(n, source))
                    .collect();
                import.named = Some(bindings);
            }
            _ => {}
        }
    }
}

fn read_specifier(specifier: Node<'_>, source: &str) -> Option<NamedBinding> {
    let name = specifier.child_by_field_name("name")?;
    let alias = specifier
        .child_by_field_name("alias")
        .map(|n| node_text(n, source).to_owned());

    Some(NamedBinding {
        name: node_text(name, source)
            .trim_matches(|c| c == '\'' || c == '"')
            .to_owned(),
        alias,
        is_type: has_keyword_child(specifier, "type"),
        range: node_range(specifier),
    })
}

#[cfg(test)]
mod tests {
    use crate::TsParser;

    fn imports(source: &str) -> Vec<super::ImportDeclaration> {
        let mut parser = TsParser::new().expect("Parser creation failed");
        parser.parse(source).expect("Parse failed").imports()
    }

    #[test]
    fn test_named_import() {
        let imports = imports("import { Foo, Bar as Baz } from './foo';");
        assert_eq!(imports.len(), 1);

        let import = &imports[0];
        assert_eq!(import.specifier, "./foo");
        assert_eq!(import.quote, '\'');
        assert!(!import.is_type_only);
        assert!(!import.is_malformed);

        let names: Vec<_> = import.named_bindings().iter().map(|b| b.render()).collect();
        assert_eq!(names, vec!["Foo", "Bar as Baz"]);
        assert_eq!(
            import.named_binding("Bar").map(|b| b.local_name()),
            Some("Baz")
        );
    }

    #[test]
    fn test_type_only_import() {
        let imports = imports("import type { Foo } from \"./foo\";");
        let import = &imports[0];
        assert!(import.is_type_only);
        assert_eq!(import.quote, '"');
        assert!(import.imports_as_type("Foo"));
    }

    #[test]
    fn test_inline_type_modifier() {
        let imports = imports("import { type Foo, Bar } from './foo';");
        let import = &imports[0];
        assert!(!import.is_type_only);
        assert!(import.imports_as_type("Foo"));
        assert!(!import.imports_as_type("Bar"));
    }

    #[test]
    fn test_default_and_namespace() {
        let imports = imports(
            "import React, { useState } from 'react';\nimport * as path from 'path';\nimport './side-effect';\n",
        );
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].default_binding.as_deref(), Some("React"));
        assert_eq!(imports[0].named_bindings().len(), 1);
        assert_eq!(imports[1].namespace_binding.as_deref(), Some("path"));
        assert!(imports[1].named.is_none());
        assert!(imports[2].is_side_effect());
    }

    #[test]
    fn test_range_covers_statement() {
        let source = "import { A } from './a';\nconst x = 1;\n";
        let imports = imports(source);
        let range = imports[0].range;
        assert_eq!(&source[range.start..range.end], "import { A } from './a';");
        let spec = imports[0].specifier_range;
        assert_eq!(&source[spec.start..spec.end], "'./a'");
    }

    #[test]
    fn test_require_import_is_malformed() {
        let imports = imports("import fs = require('fs');");
        assert_eq!(imports.len(), 1);
        assert!(imports[0].is_malformed);
    }

    #[test]
    fn test_nested_imports_are_ignored() {
        let imports = imports("declare module 'x' {\n  import { A } from './a';\n}\n");
        assert!(imports.is_empty());
    }
}
