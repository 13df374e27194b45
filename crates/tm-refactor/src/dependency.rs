//! Dependency analysis for a moved declaration.
//!
//! Dependencies are reported, never moved. After a move the report lists the
//! ones the destination cannot see so the user can add imports by hand.

use rustc_hash::FxHashSet;
use tm_ts_parser::{ParseError, ParsedSource, TypeDeclaration};

/// Types provided by the TypeScript standard library.
const GLOBAL_TYPES: &[&str] = &[
    "Array",
    "ArrayLike",
    "AsyncIterable",
    "AsyncIterator",
    "Awaited",
    "BigInt",
    "Boolean",
    "Capitalize",
    "ConstructorParameters",
    "Date",
    "Error",
    "Exclude",
    "Extract",
    "Function",
    "InstanceType",
    "Iterable",
    "IterableIterator",
    "Iterator",
    "Lowercase",
    "Map",
    "NonNullable",
    "Number",
    "Object",
    "Omit",
    "Parameters",
    "Partial",
    "Pick",
    "Promise",
    "PromiseLike",
    "Readonly",
    "ReadonlyArray",
    "ReadonlyMap",
    "ReadonlySet",
    "Record",
    "RegExp",
    "Required",
    "ReturnType",
    "Set",
    "String",
    "Symbol",
    "ThisType",
    "Uncapitalize",
    "Uppercase",
    "WeakMap",
    "WeakSet",
];

/// Returns every type name referenced by `decl`, in first-occurrence order.
///
/// The declaration's own name and its type parameters are excluded.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the reference query fails to
/// compile.
pub fn collect_referenced_type_names(
    parsed: &ParsedSource<'_>,
    decl: &TypeDeclaration<'_>,
) -> Result<Vec<String>, ParseError> {
    parsed.type_references(decl)
}

/// Returns the dependencies that `destination` neither declares nor imports.
///
/// `None` stands for a destination that does not exist yet. Standard library
/// types are never reported. For a qualified name such as `ns.Tag`, only the
/// leading namespace has to be visible.
///
/// # Examples
///
/// ```
/// use tm_refactor::dependency::unresolved_in_destination;
/// use tm_ts_parser::TsParser;
///
/// let deps = vec!["Id".to_owned(), "Role".to_owned(), "Record".to_owned()];
/// let mut parser = TsParser::new()?;
/// let destination = parser.parse("import type { Id } from './ids';\n")?;
///
/// assert_eq!(unresolved_in_destination(&deps, Some(&destination)), vec!["Role"]);
/// assert_eq!(unresolved_in_destination(&deps, None), vec!["Id", "Role"]);
/// # Ok::<(), tm_ts_parser::ParseError>(())
/// ```
#[must_use]
pub fn unresolved_in_destination(
    dependencies: &[String],
    destination: Option<&ParsedSource<'_>>,
) -> Vec<String> {
    let mut visible: FxHashSet<String> = FxHashSet::default();
    if let Some(parsed) = destination {
        visible.extend(parsed.type_declarations().into_iter().map(|d| d.name));
        for import in parsed.imports() {
            visible.extend(import.default_binding.clone());
            visible.extend(import.namespace_binding.clone());
            visible.extend(
                import
                    .named_bindings()
                    .iter()
                    .map(|b| b.local_name().to_owned()),
            );
        }
    }

    dependencies
        .iter()
        .filter(|name| {
            let head = name.split('.').next().unwrap_or_default();
            !GLOBAL_TYPES.contains(&head) && !visible.contains(head)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_ts_parser::TsParser;

    #[test]
    fn test_collect_excludes_self_and_type_parameters() {
        let source = "type Tree<T> = { value: T; children: Tree<T>[]; meta: Meta<T> };\n";
        let mut parser = TsParser::new().expect("Parser creation failed");
        let parsed = parser.parse(source).expect("Parse failed");
        let decl = parsed.declaration_named("Tree").expect("Tree");

        let deps = collect_referenced_type_names(&parsed, &decl).expect("references");
        assert_eq!(deps, vec!["Meta"]);
    }

    #[test]
    fn test_local_declarations_and_namespaces_are_visible() {
        let deps = vec!["Shape".to_owned(), "geo.Point".to_owned(), "Color".to_owned()];
        let mut parser = TsParser::new().expect("Parser creation failed");
        let destination = parser
            .parse("import * as geo from './geo';\nexport interface Shape {}\n")
            .expect("Parse failed");

        assert_eq!(
            unresolved_in_destination(&deps, Some(&destination)),
            vec!["Color"]
        );
    }

    #[test]
    fn test_aliased_import_is_visible_by_local_name() {
        let deps = vec!["Local".to_owned()];
        let mut parser = TsParser::new().expect("Parser creation failed");
        let destination = parser
            .parse("import { Remote as Local } from './r';\n")
            .expect("Parse failed");

        assert!(unresolved_in_destination(&deps, Some(&destination)).is_empty());
    }
}
