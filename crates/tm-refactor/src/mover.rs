//! Move orchestration.
//!
//! [`TypeMover`] ties the components together. A move runs in two phases:
//!
//! 1. [`plan`](TypeMover::plan) reads every affected document and computes
//!    the complete [`EditPlan`] without changing anything.
//! 2. [`execute`](TypeMover::execute) submits the plan to an
//!    [`EditApplier`] one file at a time.
//!
//! Each file's transaction is atomic, but the move as a whole is not: if a
//! later file is rejected, earlier files keep their changes.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tm_core::{
    normalize_edits, ChangeSet, DocumentStore, EditApplier, EditPlan, FileEdits, ImportChange,
    ImportStyle, MemoryWorkspace, PendingEdit, RefactorContext, ReferenceFinder, TypeInfo,
    TypeKind,
};
use tm_ts_parser::{parse_file, ParsedSource};
use tracing::{debug, info};

use crate::alias::{normalize, AliasResolver};
use crate::dependency::unresolved_in_destination;
use crate::error::RefactorError;
use crate::locator::{find_at_position, find_by_name, validate_destination_free};
use crate::references::{find_all_references, find_existing_import_path, group_by_file};
use crate::relocator::{append_declaration, append_or_create, remove_declaration};
use crate::rewriter::compute_import_edits;

/// Extensions a destination may have.
const DESTINATION_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// How the type to move is selected in its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelector {
    /// The declaration containing this byte offset.
    Offset(usize),
    /// The first declaration with this name.
    Name(String),
}

/// A request to move one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// The file declaring the type.
    pub source: Utf8PathBuf,
    /// Which declaration to move.
    pub selector: TypeSelector,
    /// The file receiving the declaration.
    pub destination: Utf8PathBuf,
}

impl MoveRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(
        source: impl Into<Utf8PathBuf>,
        selector: TypeSelector,
        destination: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            selector,
            destination: destination.into(),
        }
    }
}

/// Everything a move will do, computed before anything is applied.
#[derive(Debug, Clone)]
pub struct MovePlan {
    /// The located declaration.
    pub type_info: TypeInfo,
    /// Absolute path of the declaring file.
    pub source: Utf8PathBuf,
    /// Absolute path of the destination.
    pub destination: Utf8PathBuf,
    /// Import changes per referencing file.
    pub change_set: ChangeSet,
    /// One transaction per touched file.
    pub edits: EditPlan,
    /// Dependencies the destination does not declare or import.
    pub unresolved_dependencies: Vec<String>,
}

impl MovePlan {
    /// Returns the resulting content of every touched file without writing
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns [`RefactorError::Io`] if a touched document cannot be read, or
    /// [`RefactorError::EditFailed`] if its transaction does not apply.
    pub fn preview<S>(&self, store: &S) -> Result<Vec<(Utf8PathBuf, String)>, RefactorError>
    where
        S: DocumentStore + ?Sized,
    {
        let overlay = MemoryWorkspace::new();
        for path in self.edits.touched_files() {
            if store.exists(path) {
                overlay.insert(path, store.open(path)?);
            }
        }

        let touched = apply_plan(&self.edits, &overlay)?;
        Ok(touched
            .into_iter()
            .map(|path| {
                let content = overlay.get(&path).unwrap_or_default();
                (path, content)
            })
            .collect())
    }

    /// Builds the report for this plan once `touched_files` were written.
    #[must_use]
    pub fn report(&self, touched_files: Vec<Utf8PathBuf>) -> MoveReport {
        MoveReport {
            type_name: self.type_info.name().to_owned(),
            kind: self.type_info.kind(),
            source: self.source.clone(),
            destination: self.destination.clone(),
            touched_files,
            dependencies: self.type_info.dependencies().to_vec(),
            unresolved_dependencies: self.unresolved_dependencies.clone(),
        }
    }
}

/// Summary of a completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    /// The moved type's name.
    pub type_name: String,
    /// The moved type's kind.
    pub kind: TypeKind,
    /// The file the type was moved out of.
    pub source: Utf8PathBuf,
    /// The file the type was moved into.
    pub destination: Utf8PathBuf,
    /// Files written, in application order.
    pub touched_files: Vec<Utf8PathBuf>,
    /// Type names the declaration references.
    pub dependencies: Vec<String>,
    /// Referenced type names the destination cannot see.
    pub unresolved_dependencies: Vec<String>,
}

/// Plans and executes type moves.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use tm_core::{MemoryWorkspace, RefactorConfig, RefactorContext, StaticReferenceFinder};
/// use tm_refactor::{AliasResolver, MoveRequest, TypeMover, TypeSelector};
///
/// let workspace = MemoryWorkspace::new();
/// workspace.insert("/p/src/a.ts", "export type Id = string;\n");
///
/// let context = RefactorContext::new("/p", RefactorConfig::default());
/// let finder = StaticReferenceFinder::default();
/// let mover = TypeMover::new(&context, &workspace, &finder).with_aliases(AliasResolver::disabled());
///
/// let request = MoveRequest::new("/p/src/a.ts", TypeSelector::Name("Id".into()), "/p/src/ids.ts");
/// let report = mover.execute(&request, &workspace)?;
///
/// assert_eq!(report.type_name, "Id");
/// assert_eq!(workspace.get(Utf8Path::new("/p/src/ids.ts")).as_deref(), Some("export type Id = string;\n"));
/// # Ok::<(), tm_refactor::RefactorError>(())
/// ```
pub struct TypeMover<'a, S: ?Sized, F: ?Sized> {
    context: &'a RefactorContext,
    aliases: AliasResolver,
    store: &'a S,
    finder: &'a F,
}

impl<'a, S, F> TypeMover<'a, S, F>
where
    S: DocumentStore + ?Sized,
    F: ReferenceFinder + ?Sized,
{
    /// Creates a mover, loading path aliases for `context`.
    #[must_use]
    pub fn new(context: &'a RefactorContext, store: &'a S, finder: &'a F) -> Self {
        Self {
            context,
            aliases: AliasResolver::load(context),
            store,
            finder,
        }
    }

    /// Creates a mover around an already loaded alias resolver.
    #[must_use]
    pub fn from_parts(
        context: &'a RefactorContext,
        aliases: AliasResolver,
        store: &'a S,
        finder: &'a F,
    ) -> Self {
        Self {
            context,
            aliases,
            store,
            finder,
        }
    }

    /// Replaces the alias resolver.
    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasResolver) -> Self {
        self.aliases = aliases;
        self
    }

    /// The alias resolver in use.
    #[must_use]
    pub fn aliases(&self) -> &AliasResolver {
        &self.aliases
    }

    /// Computes the full plan for `request` without changing anything.
    ///
    /// # Errors
    ///
    /// - Input errors if the destination is invalid or no type is selected
    /// - [`RefactorError::NameConflict`] if the destination already declares
    ///   the name
    /// - [`RefactorError::Io`] or [`RefactorError::Parse`] if a document
    ///   cannot be read or parsed
    /// - [`RefactorError::EditFailed`] if a file's edits overlap
    pub fn plan(&self, request: &MoveRequest) -> Result<MovePlan, RefactorError> {
        let (source, destination) = self.validate_paths(request)?;

        let source_text = self.store.open(&source)?;
        let source_parsed =
            parse_file(&source, &source_text).map_err(|e| RefactorError::parse(&source, e))?;
        let type_info = self.locate(&source, &source_parsed, &request.selector)?;
        let type_name = type_info.name().to_owned();
        let span = type_info.declaration_span();
        let declaration_text = type_info
            .declaration_text(&source_text)
            .unwrap_or_default()
            .to_owned();

        info!(
            name = %type_name,
            kind = type_info.kind().label(),
            %source,
            %destination,
            "planning move"
        );

        let destination_text = if self.store.exists(&destination) {
            Some(self.store.open(&destination)?)
        } else {
            None
        };
        let destination_parsed = destination_text
            .as_deref()
            .map(|text| parse_file(&destination, text))
            .transpose()
            .map_err(|e| RefactorError::parse(&destination, e))?;
        if let Some(parsed) = &destination_parsed {
            validate_destination_free(&type_name, parsed, &destination)?;
        }
        let unresolved_dependencies =
            unresolved_in_destination(type_info.dependencies(), destination_parsed.as_ref());

        let mut change_set = ChangeSet::new(declaration_text.clone());
        let mut plan = EditPlan::new();

        // Source: drop the declaration, import it back if still used.
        let still_used = source_parsed
            .identifier_occurrences(&type_name)
            .into_iter()
            .any(|range| !span.contains_range(range));
        let mut source_edits = vec![remove_declaration(span)];
        if still_used {
            let change = ImportChange::new(
                &source,
                "",
                self.aliases.resolve_import_path(&source, &destination),
                &type_name,
                self.import_style().is_type_only(),
            );
            source_edits.extend(compute_import_edits(&source_parsed, &change));
            change_set.push(change);
        } else {
            debug!(%source, "no remaining references in source file");
        }
        self.add_file_edits(&mut plan, &source, source_edits)?;

        // Other referencing files.
        let references = find_all_references(self.finder, &source, type_info.name_range().start);
        for file in group_by_file(&references).into_keys() {
            let file = self.absolute(&file);
            if file == source || file == destination {
                continue;
            }

            let text = self.store.open(&file)?;
            let parsed = parse_file(&file, &text).map_err(|e| RefactorError::parse(&file, e))?;
            let change = self.import_change(&file, &parsed, &destination, &type_name);

            let edits = compute_import_edits(&parsed, &change);
            if edits.is_empty() {
                debug!(%file, "imports already up to date");
            } else {
                self.add_file_edits(&mut plan, &file, edits)?;
            }
            change_set.push(change);
        }

        // Destination: the type becomes local.
        let destination_document = match (&destination_text, &destination_parsed) {
            (Some(text), Some(parsed)) => {
                let existing = find_existing_import_path(&parsed.imports(), &type_name);
                let text = match existing {
                    Some(existing) => {
                        let change = ImportChange::new(
                            &destination,
                            existing.specifier,
                            "",
                            &type_name,
                            existing.is_type_only,
                        );
                        let edits = compute_import_edits(parsed, &change);
                        change_set.push(change);
                        tm_core::apply_edits(text, &edits)
                            .map_err(|e| RefactorError::edit(&destination, e))?
                    }
                    None => text.clone(),
                };
                FileEdits::Replace(append_declaration(&text, &declaration_text))
            }
            _ => append_or_create(&destination, &declaration_text, self.store)?,
        };
        plan.set_document(&destination, destination_document);

        info!(
            files = plan.len(),
            changes = change_set.import_changes.len(),
            "move planned"
        );

        Ok(MovePlan {
            type_info,
            source,
            destination,
            change_set,
            edits: plan,
            unresolved_dependencies,
        })
    }

    /// Plans `request` and applies the plan through `applier`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`plan`](Self::plan), or
    /// [`RefactorError::EditFailed`] for the first file whose transaction
    /// is rejected. Files applied before the failure keep their changes.
    pub fn execute<A>(&self, request: &MoveRequest, applier: &A) -> Result<MoveReport, RefactorError>
    where
        A: EditApplier + ?Sized,
    {
        let plan = self.plan(request)?;
        let touched = apply_plan(&plan.edits, applier)?;
        info!(
            name = plan.type_info.name(),
            files = touched.len(),
            "move complete"
        );
        Ok(plan.report(touched))
    }

    fn import_style(&self) -> ImportStyle {
        self.context.import_style()
    }

    fn absolute(&self, path: &Utf8Path) -> Utf8PathBuf {
        normalize(&self.context.workspace_root().join(path))
    }

    fn validate_paths(&self, request: &MoveRequest) -> Result<(Utf8PathBuf, Utf8PathBuf), RefactorError> {
        if request.destination.as_str().trim().is_empty() {
            return Err(RefactorError::EmptyDestination);
        }
        let supported = request
            .destination
            .extension()
            .is_some_and(|ext| DESTINATION_EXTENSIONS.contains(&ext));
        if !supported {
            return Err(RefactorError::UnsupportedDestination(request.destination.clone()));
        }

        let source = self.absolute(&request.source);
        let destination = self.absolute(&request.destination);
        if source == destination {
            return Err(RefactorError::SameFile(destination));
        }
        Ok((source, destination))
    }

    fn locate(
        &self,
        source: &Utf8Path,
        parsed: &ParsedSource<'_>,
        selector: &TypeSelector,
    ) -> Result<TypeInfo, RefactorError> {
        match selector {
            TypeSelector::Offset(offset) => find_at_position(parsed, *offset)
                .map_err(|e| RefactorError::parse(source, e))?
                .ok_or_else(|| RefactorError::NoTypeAtPosition {
                    path: source.to_owned(),
                    offset: *offset,
                }),
            TypeSelector::Name(name) => find_by_name(parsed, name)
                .map_err(|e| RefactorError::parse(source, e))?
                .ok_or_else(|| RefactorError::TypeNotFound {
                    path: source.to_owned(),
                    name: name.clone(),
                }),
        }
    }

    /// Builds the change for a file that references the type from outside.
    fn import_change(
        &self,
        file: &Utf8Path,
        parsed: &ParsedSource<'_>,
        destination: &Utf8Path,
        type_name: &str,
    ) -> ImportChange {
        let new_specifier = self.aliases.resolve_import_path(file, destination);
        let existing = find_existing_import_path(&parsed.imports(), type_name);

        let style = self.import_style();
        let (old_specifier, is_type_only) = match existing {
            Some(existing) => {
                let promote = style == ImportStyle::Type
                    && !self.aliases.should_be_type_only_preserving(&existing.specifier);
                (existing.specifier, existing.is_type_only || promote)
            }
            None => (String::new(), style.is_type_only()),
        };

        debug!(
            %file,
            old = %old_specifier,
            new = %new_specifier,
            type_only = is_type_only,
            "import change"
        );
        ImportChange::new(file, old_specifier, new_specifier, type_name, is_type_only)
    }

    fn add_file_edits(
        &self,
        plan: &mut EditPlan,
        path: &Utf8Path,
        mut edits: Vec<PendingEdit>,
    ) -> Result<(), RefactorError> {
        normalize_edits(&mut edits).map_err(|e| RefactorError::edit(path, e))?;
        plan.add_edits(path, edits)
            .map_err(|e| RefactorError::edit(path, e))
    }
}

/// Applies `plan` file by file and returns the files written.
///
/// # Errors
///
/// Returns [`RefactorError::EditFailed`] for the first rejected file. Files
/// applied before it are not rolled back.
pub fn apply_plan<A>(plan: &EditPlan, applier: &A) -> Result<Vec<Utf8PathBuf>, RefactorError>
where
    A: EditApplier + ?Sized,
{
    let mut touched = Vec::new();
    for (path, edits) in plan.iter() {
        if edits.is_noop() {
            continue;
        }
        applier
            .apply(path, edits)
            .map_err(|source| RefactorError::EditFailed {
                path: path.to_owned(),
                source,
            })?;
        debug!(%path, "applied");
        touched.push(path.to_owned());
    }
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tm_core::{ByteRange, Location, RefactorConfig, StaticReferenceFinder};

    use crate::alias::AliasConfig;

    fn context(style: ImportStyle) -> RefactorContext {
        RefactorContext::new(
            "/p",
            RefactorConfig {
                import_style: style,
                ..RefactorConfig::default()
            },
        )
    }

    /// References to `name` in every workspace file, the way a language
    /// service would report them.
    fn references_to(workspace: &MemoryWorkspace, name: &str) -> StaticReferenceFinder {
        let mut locations = Vec::new();
        for path in workspace.paths() {
            let text = workspace.get(&path).unwrap_or_default();
            let mut start = 0;
            while let Some(found) = text[start..].find(name) {
                let at = start + found;
                locations.push(Location::new(&path, ByteRange::new(at, at + name.len())));
                start = at + name.len();
            }
        }
        StaticReferenceFinder::new(locations)
    }

    fn move_type(
        workspace: &MemoryWorkspace,
        context: &RefactorContext,
        aliases: AliasResolver,
        request: &MoveRequest,
    ) -> Result<MoveReport, RefactorError> {
        let name = match &request.selector {
            TypeSelector::Name(name) => name.clone(),
            TypeSelector::Offset(_) => String::new(),
        };
        let finder = references_to(workspace, &name);
        TypeMover::new(context, workspace, &finder)
            .with_aliases(aliases)
            .execute(request, workspace)
    }

    fn read(workspace: &MemoryWorkspace, path: &str) -> String {
        workspace.get(Utf8Path::new(path)).expect("document")
    }

    fn abc_workspace() -> MemoryWorkspace {
        let workspace = MemoryWorkspace::new();
        workspace.insert(
            "/p/src/a.ts",
            "export interface Foo {\n  id: string;\n}\n\nexport const make = (): Foo => ({ id: '' });\n",
        );
        workspace.insert(
            "/p/src/b.ts",
            "import { Foo, make } from \"./a\";\n\nexport const value: Foo = make();\n",
        );
        workspace.insert("/p/src/c.ts", "export type Other = number;\n");
        workspace
    }

    #[test]
    fn test_abc_scenario() {
        let workspace = abc_workspace();
        let context = context(ImportStyle::Regular);
        let request = MoveRequest::new(
            "/p/src/a.ts",
            TypeSelector::Name("Foo".into()),
            "/p/src/c.ts",
        );

        let report = move_type(&workspace, &context, AliasResolver::disabled(), &request)
            .expect("move");
        assert_eq!(report.type_name, "Foo");
        assert_eq!(report.kind, TypeKind::Interface);
        assert_eq!(report.touched_files.len(), 3);

        insta::assert_snapshot!(read(&workspace, "/p/src/a.ts"), @r#"
        import { Foo } from "./c";


        export const make = (): Foo => ({ id: '' });
        "#);
        insta::assert_snapshot!(read(&workspace, "/p/src/b.ts"), @r#"
        import { make } from "./a";
        import { Foo } from "./c";

        export const value: Foo = make();
        "#);
        insta::assert_snapshot!(read(&workspace, "/p/src/c.ts"), @r"
        export type Other = number;

        export interface Foo {
          id: string;
        }
        ");
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let workspace = abc_workspace();
        let context = context(ImportStyle::Regular);
        let request = MoveRequest::new(
            "/p/src/a.ts",
            TypeSelector::Name("Foo".into()),
            "/p/src/c.ts",
        );
        move_type(&workspace, &context, AliasResolver::disabled(), &request).expect("move");
        let b_after = read(&workspace, "/p/src/b.ts");

        // Foo now lives in c.ts; planning b.ts's imports again yields nothing.
        let finder = references_to(&workspace, "Foo");
        let mover = TypeMover::new(&context, &workspace, &finder).with_aliases(AliasResolver::disabled());
        let parsed_b = read(&workspace, "/p/src/b.ts");
        let parsed = parse_file(Utf8Path::new("/p/src/b.ts"), &parsed_b).expect("parse");
        let change = mover.import_change(
            Utf8Path::new("/p/src/b.ts"),
            &parsed,
            Utf8Path::new("/p/src/c.ts"),
            "Foo",
        );
        assert!(change.is_already_applied());
        assert!(compute_import_edits(&parsed, &change).is_empty());
        assert_eq!(read(&workspace, "/p/src/b.ts"), b_after);
    }

    #[test]
    fn test_round_trip_restores_imports() {
        let workspace = MemoryWorkspace::new();
        workspace.insert("/p/src/a.ts", "export type Id = string;\n");
        workspace.insert(
            "/p/src/b.ts",
            "import { Id } from \"./a\";\n\nexport const id: Id = '1';\n",
        );
        let original_b = read(&workspace, "/p/src/b.ts");
        let context = context(ImportStyle::Regular);

        let there = MoveRequest::new("/p/src/a.ts", TypeSelector::Name("Id".into()), "/p/src/c.ts");
        move_type(&workspace, &context, AliasResolver::disabled(), &there).expect("move there");
        assert!(read(&workspace, "/p/src/b.ts").contains("from \"./c\""));

        let back = MoveRequest::new("/p/src/c.ts", TypeSelector::Name("Id".into()), "/p/src/a.ts");
        move_type(&workspace, &context, AliasResolver::disabled(), &back).expect("move back");

        assert_eq!(read(&workspace, "/p/src/b.ts"), original_b);
        assert_eq!(read(&workspace, "/p/src/a.ts"), "export type Id = string;\n");
    }

    #[test]
    fn test_alias_specifier_and_destination_import_removal() {
        let workspace = MemoryWorkspace::new();
        workspace.insert("/p/src/models/a.ts", "export enum Role { Admin }\n");
        workspace.insert(
            "/p/src/ui/view.ts",
            "import { Role } from '../models/a';\n\nexport const r = Role.Admin;\n",
        );
        workspace.insert(
            "/p/src/utils/helper.ts",
            "import { Role } from '../models/a';\n\nexport const isAdmin = (r: Role) => r === Role.Admin;\n",
        );

        let mut paths = IndexMap::new();
        paths.insert("@/*".to_owned(), vec!["*".to_owned()]);
        let aliases = AliasResolver::from_config(AliasConfig::new("/p", "./src", paths));

        let context = context(ImportStyle::Regular);
        let request = MoveRequest::new(
            "/p/src/models/a.ts",
            TypeSelector::Name("Role".into()),
            "/p/src/utils/helper.ts",
        );
        move_type(&workspace, &context, aliases, &request).expect("move");

        assert_eq!(
            read(&workspace, "/p/src/ui/view.ts"),
            "import { Role } from \"@/utils/helper\";\n\nexport const r = Role.Admin;\n"
        );
        assert_eq!(
            read(&workspace, "/p/src/utils/helper.ts"),
            "\nexport const isAdmin = (r: Role) => r === Role.Admin;\n\nexport enum Role { Admin }\n"
        );
        assert_eq!(read(&workspace, "/p/src/models/a.ts"), "\n");
    }

    #[test]
    fn test_import_style_type_promotes_relative_imports() {
        let workspace = MemoryWorkspace::new();
        workspace.insert("/p/src/a.ts", "export type Id = string;\n");
        workspace.insert("/p/src/b.ts", "import { Id } from './a';\nlet x: Id;\n");
        let context = context(ImportStyle::Type);

        let request = MoveRequest::new("/p/src/a.ts", TypeSelector::Name("Id".into()), "/p/src/c.ts");
        move_type(&workspace, &context, AliasResolver::disabled(), &request).expect("move");

        assert_eq!(
            read(&workspace, "/p/src/b.ts"),
            "import type { Id } from \"./c\";\nlet x: Id;\n"
        );
    }

    #[test]
    fn test_import_style_type_keeps_alias_imports() {
        let workspace = MemoryWorkspace::new();
        workspace.insert("/p/src/a.ts", "export type Id = string;\n");
        workspace.insert("/p/src/b.ts", "import { Id } from '@/a';\nlet x: Id;\n");
        let context = context(ImportStyle::Type);

        let mut paths = IndexMap::new();
        paths.insert("@/*".to_owned(), vec!["*".to_owned()]);
        let aliases = AliasResolver::from_config(AliasConfig::new("/p", "./src", paths));

        let request = MoveRequest::new("/p/src/a.ts", TypeSelector::Name("Id".into()), "/p/src/c.ts");
        move_type(&workspace, &context, aliases, &request).expect("move");

        assert_eq!(
            read(&workspace, "/p/src/b.ts"),
            "import { Id } from \"@/c\";\nlet x: Id;\n"
        );
    }

    #[test]
    fn test_creates_missing_destination() {
        let workspace = MemoryWorkspace::new();
        workspace.insert(
            "/p/src/a.ts",
            "export type Id = string;\nexport interface User { id: Id; meta: Meta }\n",
        );
        let context = context(ImportStyle::Regular);
        let offset = read(&workspace, "/p/src/a.ts").find("User").expect("User");

        let request = MoveRequest::new("/p/src/a.ts", TypeSelector::Offset(offset), "src/user.ts");
        let finder = StaticReferenceFinder::default();
        let mover = TypeMover::new(&context, &workspace, &finder).with_aliases(AliasResolver::disabled());

        let plan = mover.plan(&request).expect("plan");
        assert_eq!(plan.destination, Utf8PathBuf::from("/p/src/user.ts"));
        assert!(matches!(
            plan.edits.get(Utf8Path::new("/p/src/user.ts")),
            Some(FileEdits::Create(_))
        ));
        assert_eq!(plan.unresolved_dependencies, vec!["Id", "Meta"]);

        let preview = plan.preview(&workspace).expect("preview");
        assert_eq!(preview.len(), 2);
        assert!(workspace.get(Utf8Path::new("/p/src/user.ts")).is_none());

        let report = mover.execute(&request, &workspace).expect("move");
        assert_eq!(report.dependencies, vec!["Id", "Meta"]);
        assert_eq!(
            read(&workspace, "/p/src/user.ts"),
            "export interface User { id: Id; meta: Meta }\n"
        );
        assert_eq!(read(&workspace, "/p/src/a.ts"), "export type Id = string;\n\n");
    }

    #[test]
    fn test_input_errors() {
        let workspace = abc_workspace();
        let context = context(ImportStyle::Regular);
        let finder = StaticReferenceFinder::default();
        let mover = TypeMover::new(&context, &workspace, &finder).with_aliases(AliasResolver::disabled());

        let plan = |selector: TypeSelector, to: &str| {
            mover.plan(&MoveRequest::new("/p/src/a.ts", selector, to))
        };

        assert!(matches!(
            plan(TypeSelector::Name("Foo".into()), ""),
            Err(RefactorError::EmptyDestination)
        ));
        assert!(matches!(
            plan(TypeSelector::Name("Foo".into()), "/p/src/c.js"),
            Err(RefactorError::UnsupportedDestination(_))
        ));
        assert!(matches!(
            plan(TypeSelector::Name("Foo".into()), "/p/src/a.ts"),
            Err(RefactorError::SameFile(_))
        ));
        assert!(matches!(
            plan(TypeSelector::Name("Missing".into()), "/p/src/c.ts"),
            Err(RefactorError::TypeNotFound { .. })
        ));
        assert!(matches!(
            plan(TypeSelector::Offset(usize::MAX), "/p/src/c.ts"),
            Err(RefactorError::NoTypeAtPosition { .. })
        ));
    }

    #[test]
    fn test_name_conflict_aborts_before_edits() {
        let workspace = abc_workspace();
        workspace.insert("/p/src/c.ts", "export type Foo = number;\n");
        let context = context(ImportStyle::Regular);
        let request = MoveRequest::new("/p/src/a.ts", TypeSelector::Name("Foo".into()), "/p/src/c.ts");

        let before = read(&workspace, "/p/src/b.ts");
        let err = move_type(&workspace, &context, AliasResolver::disabled(), &request)
            .expect_err("conflict");
        assert!(matches!(err, RefactorError::NameConflict { .. }));
        assert_eq!(read(&workspace, "/p/src/b.ts"), before);
    }

    #[test]
    fn test_rejected_file_stops_without_rollback() {
        let workspace = abc_workspace();
        workspace.reject_edits_to("/p/src/c.ts");
        let context = context(ImportStyle::Regular);
        let request = MoveRequest::new("/p/src/a.ts", TypeSelector::Name("Foo".into()), "/p/src/c.ts");

        let err = move_type(&workspace, &context, AliasResolver::disabled(), &request)
            .expect_err("rejected");
        assert!(matches!(err, RefactorError::EditFailed { ref path, .. } if path == "/p/src/c.ts"));

        // a.ts and b.ts were applied first and keep their changes.
        assert!(!read(&workspace, "/p/src/a.ts").contains("interface Foo"));
        assert!(read(&workspace, "/p/src/b.ts").contains("\"./c\""));
    }
}
