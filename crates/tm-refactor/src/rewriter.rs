//! Import statement rewriting.
//!
//! Given one [`ImportChange`] and the current text of the referencing file,
//! [`compute_import_edits`] produces the edits that make the file import the
//! moved type from its new location:
//!
//! 1. The binding is removed from the import of `old_specifier`. A statement
//!    left with nothing to import is deleted along with its line break;
//!    otherwise it is rebuilt from the remaining bindings.
//! 2. If an import of `new_specifier` exists, the binding is merged into it.
//! 3. Otherwise a new statement is inserted below the last import, or at the
//!    top of the file.
//!
//! Edits are computed against the unmodified text and never overlap, so they
//! can be normalized and applied as one batch.

use tm_core::{ByteRange, ImportChange, PendingEdit};
use tm_ts_parser::{ImportDeclaration, NamedBinding, ParsedSource};
use tracing::debug;

/// Computes the import edits for `change` in `parsed`.
///
/// Returns no edits when the change is already reflected in the file, which
/// makes re-running a move a no-op.
///
/// # Examples
///
/// ```
/// use tm_core::{apply_edits, ImportChange};
/// use tm_refactor::rewriter::compute_import_edits;
/// use tm_ts_parser::TsParser;
///
/// let source = "import { Foo, Bar } from './a';\n\nlet x: Foo;\n";
/// let mut parser = TsParser::new()?;
/// let parsed = parser.parse(source)?;
///
/// let change = ImportChange::new("/src/b.ts", "./a", "./c", "Foo", false);
/// let edits = compute_import_edits(&parsed, &change);
///
/// assert_eq!(
///     apply_edits(source, &edits)?,
///     "import { Bar } from './a';\nimport { Foo } from \"./c\";\n\nlet x: Foo;\n"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn compute_import_edits(parsed: &ParsedSource<'_>, change: &ImportChange) -> Vec<PendingEdit> {
    if change.is_already_applied() {
        debug!(file = %change.file, specifier = %change.new_specifier, "import already up to date");
        return Vec::new();
    }

    let source = parsed.source();
    let imports = parsed.imports();
    let type_name = change.type_name.as_str();

    let mut edits = Vec::new();
    let mut removed: Option<NamedBinding> = None;
    // Index into `edits` and statement range of a deleted final import.
    let mut deleted_last: Option<(usize, ByteRange)> = None;

    if change.has_prior_import() {
        let last_index = imports.len().saturating_sub(1);
        for (index, import) in imports.iter().enumerate() {
            if import.is_malformed || import.specifier != change.old_specifier {
                continue;
            }
            let Some(binding) = import.named_binding(type_name) else {
                continue;
            };
            removed = Some(binding.clone());

            let mut remaining: Vec<NamedBinding> = import
                .named_bindings()
                .iter()
                .filter(|b| b.name != type_name)
                .cloned()
                .collect();
            sort_bindings(&mut remaining);

            if remaining.is_empty()
                && import.default_binding.is_none()
                && import.namespace_binding.is_none()
            {
                if index == last_index {
                    deleted_last = Some((edits.len(), import.range));
                }
                edits.push(PendingEdit::delete(with_line_break(source, import.range)));
            } else {
                let text = render_import(import, &remaining, import.is_type_only, source);
                edits.push(PendingEdit::replace(import.range, text));
            }
        }
    }

    if change.is_removal() {
        return edits;
    }

    let alias = removed.and_then(|binding| binding.alias);

    let already_imported = imports.iter().any(|import| {
        !import.is_malformed
            && import.specifier == change.new_specifier
            && import.named_binding(type_name).is_some()
    });
    if already_imported {
        debug!(file = %change.file, %type_name, "binding already imported");
        return edits;
    }

    let mut satisfied = false;
    for import in &imports {
        if import.is_malformed
            || import.specifier != change.new_specifier
            || import.namespace_binding.is_some()
        {
            continue;
        }

        let (statement_type_only, inline_type) = match &import.default_binding {
            // `import type D` cannot take named bindings
            Some(_) if import.is_type_only => continue,
            // `import type D, { X }` is invalid, so mark the binding instead
            Some(_) => (false, change.is_type_only),
            None => (import.is_type_only || change.is_type_only, false),
        };

        let mut bindings = import.named_bindings().to_vec();
        bindings.push(NamedBinding {
            alias: alias.clone(),
            ..NamedBinding::new(type_name, inline_type)
        });
        sort_bindings(&mut bindings);

        let text = render_import(import, &bindings, statement_type_only, source);
        edits.push(PendingEdit::replace(import.range, text));
        satisfied = true;
        break;
    }

    if satisfied {
        return edits;
    }

    let statement = synthesize_import(
        type_name,
        alias.as_deref(),
        &change.new_specifier,
        change.is_type_only,
    );

    match deleted_last {
        Some((index, range)) => {
            edits[index] = PendingEdit::replace(range, statement);
        }
        None => {
            let eol = line_ending(source);
            let insert_at = parsed.last_import_end();
            if insert_at == 0 {
                edits.push(PendingEdit::insert(0, format!("{statement}{eol}")));
            } else {
                edits.push(PendingEdit::insert(insert_at, format!("{eol}{statement}")));
            }
        }
    }

    edits
}

/// Builds a fresh single-binding import statement.
///
/// # Examples
///
/// ```
/// use tm_refactor::rewriter::synthesize_import;
///
/// assert_eq!(synthesize_import("Foo", None, "./c", false), "import { Foo } from \"./c\";");
/// assert_eq!(
///     synthesize_import("Foo", Some("F"), "@/c", true),
///     "import type { Foo as F } from \"@/c\";"
/// );
/// ```
#[must_use]
pub fn synthesize_import(
    type_name: &str,
    alias: Option<&str>,
    specifier: &str,
    type_only: bool,
) -> String {
    let binding = NamedBinding {
        alias: alias.map(str::to_owned),
        ..NamedBinding::new(type_name, false)
    };
    let keyword = if type_only { "import type" } else { "import" };
    format!("{keyword} {{ {} }} from \"{specifier}\";", binding.render())
}

/// Renders `import` with a new set of named bindings.
///
/// The default binding, quote style and semicolon of the original are kept.
/// Inline `type` modifiers are dropped when the whole statement is
/// type-only.
fn render_import(
    import: &ImportDeclaration,
    bindings: &[NamedBinding],
    type_only: bool,
    source: &str,
) -> String {
    let mut out = String::from("import ");
    if type_only {
        out.push_str("type ");
    }

    if let Some(default) = &import.default_binding {
        out.push_str(default);
        if !bindings.is_empty() {
            out.push_str(", ");
        }
    }

    if !bindings.is_empty() || import.default_binding.is_none() {
        let rendered: Vec<String> = bindings
            .iter()
            .map(|binding| {
                if type_only && binding.is_type {
                    NamedBinding {
                        is_type: false,
                        ..binding.clone()
                    }
                    .render()
                } else {
                    binding.render()
                }
            })
            .collect();
        out.push_str("{ ");
        out.push_str(&rendered.join(", "));
        out.push_str(" }");
    }

    let quote = import.quote;
    out.push_str(&format!(" from {quote}{}{quote}", import.specifier));

    let original = source.get(import.range.start..import.range.end).unwrap_or("");
    if original.trim_end().ends_with(';') {
        out.push(';');
    }
    out
}

fn sort_bindings(bindings: &mut [NamedBinding]) {
    bindings.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Returns the line break style used by `source`.
fn line_ending(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Extends `range` over the line break that follows it.
fn with_line_break(source: &str, range: ByteRange) -> ByteRange {
    let rest = source.get(range.end..).unwrap_or("");
    let extra = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        0
    };
    ByteRange::new(range.start, range.end + extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::apply_edits;
    use tm_ts_parser::TsParser;

    fn rewrite(source: &str, change: &ImportChange) -> String {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let parsed = parser.parse(source).expect("Parse failed");
        let edits = compute_import_edits(&parsed, change);
        apply_edits(source, &edits).expect("apply")
    }

    fn change(old: &str, new: &str, type_only: bool) -> ImportChange {
        ImportChange::new("/src/b.ts", old, new, "Foo", type_only)
    }

    #[test]
    fn test_sole_binding_removal_and_insert_in_place() {
        let source = "import { Foo } from './a';\n\nconst x: Foo = {};\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        insta::assert_snapshot!(updated, @r#"
        import { Foo } from "./c";

        const x: Foo = {};
        "#);
    }

    #[test]
    fn test_sole_binding_removal_not_last() {
        let source = "import { Foo } from './a';\nimport { Bar } from './bar';\n\nlet x: Foo & Bar;\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        assert_eq!(
            updated,
            "import { Bar } from './bar';\nimport { Foo } from \"./c\";\n\nlet x: Foo & Bar;\n"
        );
    }

    #[test]
    fn test_merge_into_existing_import_sorted() {
        let source = "import { Foo } from './a';\nimport { X, Z } from './c';\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        assert_eq!(updated, "import { Foo, X, Z } from './c';\n");
    }

    #[test]
    fn test_merge_without_prior_import() {
        let source = "import { X } from \"./c\";\nlet y: Foo;\n";
        let updated = rewrite(source, &change("", "./c", false));
        assert_eq!(updated, "import { Foo, X } from \"./c\";\nlet y: Foo;\n");
    }

    #[test]
    fn test_type_only_union() {
        // existing type-only, incoming regular
        let source = "import type { X } from './c';\n";
        let updated = rewrite(source, &change("", "./c", false));
        assert_eq!(updated, "import type { Foo, X } from './c';\n");

        // existing regular, incoming type-only
        let source = "import { X } from './c';\n";
        let updated = rewrite(source, &change("", "./c", true));
        assert_eq!(updated, "import type { Foo, X } from './c';\n");

        // inline modifiers collapse into the statement keyword
        let source = "import { type X } from './c';\n";
        let updated = rewrite(source, &change("", "./c", true));
        assert_eq!(updated, "import type { Foo, X } from './c';\n");
    }

    #[test]
    fn test_default_binding_gets_inline_type() {
        let source = "import D, { X } from './c';\n";
        let updated = rewrite(source, &change("", "./c", true));
        assert_eq!(updated, "import D, { type Foo, X } from './c';\n");
    }

    #[test]
    fn test_namespace_import_is_not_a_merge_target() {
        let source = "import * as c from './c';\n";
        let updated = rewrite(source, &change("", "./c", false));
        assert_eq!(
            updated,
            "import * as c from './c';\nimport { Foo } from \"./c\";\n"
        );
    }

    #[test]
    fn test_remaining_bindings_keep_style() {
        let source = "import type { Zed, Foo, Alpha as A } from \"./a\"\n";
        let updated = rewrite(source, &change("./a", "./c", true));
        assert_eq!(
            updated,
            "import type { Alpha as A, Zed } from \"./a\"\nimport type { Foo } from \"./c\";\n"
        );
    }

    #[test]
    fn test_remaining_bindings_are_sorted() {
        let source = "import { Zed, Foo, Alpha } from './a';\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        assert_eq!(
            updated,
            "import { Alpha, Zed } from './a';\nimport { Foo } from \"./c\";\n"
        );
    }

    #[test]
    fn test_later_import_of_same_specifier_already_binds_name() {
        let source = "import { X } from './c';\nimport type { Foo } from './c';\n";
        let updated = rewrite(source, &change("", "./c", false));
        assert_eq!(updated, source);
        assert_eq!(updated.matches("Foo").count(), 1);
    }

    #[test]
    fn test_default_binding_survives_removal() {
        let source = "import D, { Foo } from './a';\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        assert_eq!(updated, "import D from './a';\nimport { Foo } from \"./c\";\n");
    }

    #[test]
    fn test_alias_is_carried_over() {
        let source = "import { Foo as F } from './a';\nlet x: F;\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        assert_eq!(updated, "import { Foo as F } from \"./c\";\nlet x: F;\n");
    }

    #[test]
    fn test_insert_at_top_without_imports() {
        let source = "let x: Foo;\n";
        let updated = rewrite(source, &change("", "@/types/foo", true));
        assert_eq!(updated, "import type { Foo } from \"@/types/foo\";\nlet x: Foo;\n");
    }

    #[test]
    fn test_removal_only_change() {
        let source = "import { Foo, Bar } from './a';\nimport { Foo as F2 } from './b';\n";
        let updated = rewrite(source, &change("./a", "", false));
        assert_eq!(
            updated,
            "import { Bar } from './a';\nimport { Foo as F2 } from './b';\n"
        );
    }

    #[test]
    fn test_equal_specifiers_produce_no_edits() {
        let source = "import { Foo } from './c';\n";
        let mut parser = TsParser::new().expect("Parser creation failed");
        let parsed = parser.parse(source).expect("Parse failed");
        assert!(compute_import_edits(&parsed, &change("./c", "./c", false)).is_empty());
    }

    #[test]
    fn test_already_imported_is_idempotent() {
        let source = "import { Foo, X } from './c';\n";
        let mut parser = TsParser::new().expect("Parser creation failed");
        let parsed = parser.parse(source).expect("Parse failed");
        assert!(compute_import_edits(&parsed, &change("", "./c", false)).is_empty());
    }

    #[test]
    fn test_malformed_import_is_skipped() {
        let source = "import Foo = require('./a');\nlet x: Foo;\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        assert_eq!(
            updated,
            "import Foo = require('./a');\nimport { Foo } from \"./c\";\nlet x: Foo;\n"
        );
    }

    #[test]
    fn test_crlf_line_break_is_removed() {
        let source = "import { Foo } from './a';\r\nimport { B } from './b';\r\n";
        let updated = rewrite(source, &change("./a", "./c", false));
        assert_eq!(
            updated,
            "import { B } from './b';\r\nimport { Foo } from \"./c\";\r\n"
        );
    }
}
