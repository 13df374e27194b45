//! CLI entry point for tymove.
//!
//! Moves a TypeScript type alias, interface or enum into another file and
//! rewrites every import of it.
//!
//! # Usage
//!
//! ```bash
//! tymove [OPTIONS] <COMMAND>
//!
//! # Move by name
//! tymove move --file src/a.ts --name User --to src/types/user.ts
//!
//! # Move the declaration under the cursor, previewing the result
//! tymove move --file src/a.ts --line 12 --column 17 --to src/types/user.ts --dry-run
//!
//! # Which referenced types would the destination be missing?
//! tymove deps --file src/a.ts --name User --to src/types/user.ts
//!
//! # Which specifier would src/b.ts use to import src/types/user.ts?
//! tymove resolve --from src/b.ts --to src/types/user.ts
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre, WrapErr};
use serde::Serialize;
use tm_core::{DocumentStore, ImportStyle, RefactorConfig, RefactorContext, TypeInfo};
use tm_refactor::alias::normalize;
use tm_refactor::dependency::unresolved_in_destination;
use tm_refactor::locator::{find_at_position, find_by_name, position_to_offset};
use tm_refactor::{
    apply_plan, AliasResolver, MoveReport, MoveRequest, RefactorError, TypeMover, TypeSelector,
};
use tm_ts_parser::{parse_file, NamedBinding, ParsedSource};
use tm_workspace::{FsDocumentStore, FsEditApplier, ImportScanReferenceFinder};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Move a TypeScript type declaration to another file and fix its imports.
#[derive(Parser)]
#[command(name = "tymove", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Workspace root. Relative file arguments are resolved against it.
    ///
    /// Defaults to the current directory.
    #[arg(short, long, global = true, env = "TYMOVE_WORKSPACE")]
    workspace: Option<Utf8PathBuf>,

    /// Path to tsconfig.json (overrides `tsconfigPath` in `.tymove.json`).
    #[arg(long, global = true, env = "TYMOVE_TSCONFIG")]
    tsconfig: Option<Utf8PathBuf>,

    /// Style for imports synthesized without a prior import to copy.
    #[arg(long, global = true, value_enum)]
    import_style: Option<ImportStyleArg>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Move a type declaration and rewrite the imports that reference it.
    Move {
        /// The declaration to move.
        #[command(flatten)]
        selection: Selection,

        /// Destination `.ts` or `.tsx` file. Created when missing.
        #[arg(long)]
        to: Utf8PathBuf,

        /// Print the resulting files instead of writing them.
        #[arg(long)]
        dry_run: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the types a declaration references.
    Deps {
        /// The declaration to inspect.
        #[command(flatten)]
        selection: Selection,

        /// Also report which dependencies this file cannot see.
        #[arg(long)]
        to: Option<Utf8PathBuf>,
    },

    /// List the import statements of a file.
    Imports {
        /// File to inspect.
        #[arg(long)]
        file: Utf8PathBuf,
    },

    /// Print the specifier one file would use to import another.
    Resolve {
        /// The importing file.
        #[arg(long)]
        from: Utf8PathBuf,

        /// The imported file.
        #[arg(long)]
        to: Utf8PathBuf,
    },
}

/// Selects one type declaration in a file.
#[derive(Args, Debug)]
struct Selection {
    /// File declaring the type.
    #[arg(long)]
    file: Utf8PathBuf,

    /// Name of the type.
    #[arg(long, conflicts_with_all = ["line", "column"], required_unless_present = "line")]
    name: Option<String>,

    /// Line inside the declaration (1-based).
    #[arg(long, requires = "column")]
    line: Option<usize>,

    /// Column inside the declaration (0-based, in characters).
    #[arg(long, requires = "line")]
    column: Option<usize>,
}

/// `--import-style` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ImportStyleArg {
    /// `import { Foo } from "..."`
    Regular,
    /// `import type { Foo } from "..."`
    Type,
}

impl From<ImportStyleArg> for ImportStyle {
    fn from(arg: ImportStyleArg) -> Self {
        match arg {
            ImportStyleArg::Regular => Self::Regular,
            ImportStyleArg::Type => Self::Type,
        }
    }
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose` and
/// `info` by default. Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds the [`RefactorContext`] from `.tymove.json` and CLI overrides.
///
/// # Errors
///
/// Returns an error if the workspace is not a directory or its
/// configuration file is invalid.
fn build_context(cli: &Cli) -> color_eyre::Result<RefactorContext> {
    let root = cli
        .workspace
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("."));

    if !root.is_dir() {
        bail!("Workspace is not a directory: {root}");
    }
    let root = root
        .canonicalize_utf8()
        .wrap_err_with(|| format!("Failed to resolve workspace {root}"))?;

    let mut config = RefactorConfig::load(&root)?;
    if let Some(tsconfig) = &cli.tsconfig {
        config.tsconfig_path.clone_from(tsconfig);
    }
    if let Some(style) = cli.import_style {
        config.import_style = style.into();
    }

    Ok(RefactorContext::new(root, config))
}

/// Resolves a file argument against the workspace root.
fn absolute(context: &RefactorContext, path: &Utf8Path) -> Utf8PathBuf {
    normalize(&context.workspace_root().join(path))
}

impl Selection {
    fn source(&self, context: &RefactorContext) -> Utf8PathBuf {
        absolute(context, &self.file)
    }

    /// Turns the flags into a selector, converting line and column to a
    /// byte offset in `source`.
    fn selector<S: DocumentStore>(
        &self,
        store: &S,
        source: &Utf8Path,
    ) -> color_eyre::Result<TypeSelector> {
        if let Some(name) = &self.name {
            return Ok(TypeSelector::Name(name.clone()));
        }
        let (Some(line), Some(column)) = (self.line, self.column) else {
            bail!("Either --name or --line and --column is required");
        };

        let text = store.open(source)?;
        let offset = position_to_offset(&text, line, column)
            .ok_or_else(|| eyre!("Line {line}, column {column} is outside {source}"))?;
        Ok(TypeSelector::Offset(offset))
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// A file's content after a dry run.
#[derive(Serialize)]
struct PreviewFile<'a> {
    path: &'a Utf8Path,
    content: &'a str,
}

/// Dry-run output in JSON mode.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Preview<'a> {
    report: &'a MoveReport,
    files: Vec<PreviewFile<'a>>,
}

/// Plans the move and either applies it or prints the preview.
///
/// # Errors
///
/// Returns an error if the move is invalid or a file cannot be written.
/// Files written before a failure stay written.
fn run_move(
    context: &RefactorContext,
    selection: &Selection,
    to: &Utf8Path,
    dry_run: bool,
    format: OutputFormat,
) -> color_eyre::Result<()> {
    let store = FsDocumentStore::new();
    let aliases = AliasResolver::load(context);
    let finder = ImportScanReferenceFinder::new(context, aliases.clone());
    let mover = TypeMover::from_parts(context, aliases, &store, &finder);

    let source = selection.source(context);
    let selector = selection.selector(&store, &source)?;
    let request = MoveRequest::new(source, selector, absolute(context, to));
    info!(source = %request.source, destination = %request.destination, "Planning move");

    let plan = mover.plan(&request)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if dry_run {
        let files = plan.preview(&store)?;
        let report = plan.report(files.iter().map(|(path, _)| path.clone()).collect());
        match format {
            OutputFormat::Json => {
                let preview = Preview {
                    report: &report,
                    files: files
                        .iter()
                        .map(|(path, content)| PreviewFile { path, content })
                        .collect(),
                };
                writeln!(handle, "{}", serde_json::to_string_pretty(&preview)?)?;
            }
            OutputFormat::Text => {
                for (path, content) in &files {
                    writeln!(handle, "==> {path} <==")?;
                    write!(handle, "{content}")?;
                    if !content.ends_with('\n') {
                        writeln!(handle)?;
                    }
                    writeln!(handle)?;
                }
                write_report(&mut handle, &report, context.workspace_root(), true)?;
            }
        }
        return Ok(());
    }

    let touched = apply_plan(&plan.edits, &FsEditApplier::new())?;
    let report = plan.report(touched);
    info!(name = %report.type_name, files = report.touched_files.len(), "Move complete");

    match format {
        OutputFormat::Json => writeln!(handle, "{}", serde_json::to_string_pretty(&report)?)?,
        OutputFormat::Text => write_report(&mut handle, &report, context.workspace_root(), false)?,
    }
    Ok(())
}

/// Lists the dependencies of the selected declaration.
///
/// # Errors
///
/// Returns an error if a file cannot be read or no type is selected.
fn run_deps(
    context: &RefactorContext,
    selection: &Selection,
    to: Option<&Utf8Path>,
) -> color_eyre::Result<()> {
    let store = FsDocumentStore::new();
    let source = selection.source(context);
    let selector = selection.selector(&store, &source)?;

    let text = store.open(&source)?;
    let parsed = parse_file(&source, &text)?;
    let type_info = locate(&parsed, &source, selector)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(
        handle,
        "{} {} ({} dependencies)",
        type_info.kind().label(),
        type_info.name(),
        type_info.dependencies().len()
    )?;
    for dependency in type_info.dependencies() {
        writeln!(handle, "  {dependency}")?;
    }

    if let Some(to) = to {
        let destination = absolute(context, to);
        let unresolved = if store.exists(&destination) {
            let destination_text = store.open(&destination)?;
            let destination_parsed = parse_file(&destination, &destination_text)?;
            unresolved_in_destination(type_info.dependencies(), Some(&destination_parsed))
        } else {
            unresolved_in_destination(type_info.dependencies(), None)
        };

        writeln!(handle)?;
        if unresolved.is_empty() {
            writeln!(handle, "All dependencies are visible in {destination}")?;
        } else {
            writeln!(handle, "Not visible in {destination}:")?;
            for name in &unresolved {
                writeln!(handle, "  {name}")?;
            }
        }
    }
    Ok(())
}

fn locate(
    parsed: &ParsedSource<'_>,
    path: &Utf8Path,
    selector: TypeSelector,
) -> color_eyre::Result<TypeInfo> {
    let found = match &selector {
        TypeSelector::Offset(offset) => find_at_position(parsed, *offset)?,
        TypeSelector::Name(name) => find_by_name(parsed, name)?,
    };
    let type_info = found.ok_or_else(|| match selector {
        TypeSelector::Offset(offset) => RefactorError::NoTypeAtPosition {
            path: path.to_owned(),
            offset,
        },
        TypeSelector::Name(name) => RefactorError::TypeNotFound {
            path: path.to_owned(),
            name,
        },
    })?;
    Ok(type_info)
}

/// Prints every import statement of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
fn run_imports(context: &RefactorContext, file: &Utf8Path) -> color_eyre::Result<()> {
    let path = absolute(context, file);
    let text = FsDocumentStore::new().open(&path)?;
    let parsed = parse_file(&path, &text)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for import in parsed.imports() {
        let mut bindings: Vec<String> = Vec::new();
        bindings.extend(import.default_binding.clone());
        bindings.extend(import.namespace_binding.iter().map(|ns| format!("* as {ns}")));
        bindings.extend(import.named_bindings().iter().map(NamedBinding::render));

        let mut flags = Vec::new();
        if import.is_type_only {
            flags.push("type-only");
        }
        if import.is_side_effect() {
            flags.push("side-effect");
        }
        if import.is_malformed {
            flags.push("malformed");
        }

        write!(handle, "{}: {}", import.specifier, bindings.join(", "))?;
        if !flags.is_empty() {
            write!(handle, " [{}]", flags.join(", "))?;
        }
        writeln!(handle)?;
    }
    Ok(())
}

/// Prints the specifier `from` would use to import `to`.
fn run_resolve(context: &RefactorContext, from: &Utf8Path, to: &Utf8Path) -> color_eyre::Result<()> {
    let aliases = AliasResolver::load(context);
    let specifier = aliases.resolve_import_path(&absolute(context, from), &absolute(context, to));

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{specifier}")?;
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Writes a move report with paths relative to the workspace root.
fn write_report<W: Write>(
    out: &mut W,
    report: &MoveReport,
    root: &Utf8Path,
    dry_run: bool,
) -> std::io::Result<()> {
    let relative = |path: &Utf8Path| -> String {
        path.strip_prefix(root)
            .map_or_else(|_| path.to_string(), ToString::to_string)
    };

    let verb = if dry_run { "Would move" } else { "Moved" };
    writeln!(
        out,
        "{verb} {} {} from {} to {}",
        report.kind.label(),
        report.type_name,
        relative(&report.source),
        relative(&report.destination)
    )?;

    let heading = if dry_run { "Files to change" } else { "Files changed" };
    writeln!(out, "{heading} ({}):", report.touched_files.len())?;
    for path in &report.touched_files {
        writeln!(out, "  {}", relative(path))?;
    }

    if !report.unresolved_dependencies.is_empty() {
        writeln!(
            out,
            "Add imports for these types in {}:",
            relative(&report.destination)
        )?;
        for name in &report.unresolved_dependencies {
            writeln!(out, "  {name}")?;
        }
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let context = build_context(&cli)?;

    match &cli.command {
        Commands::Move {
            selection,
            to,
            dry_run,
            format,
        } => run_move(&context, selection, to, *dry_run, *format),
        Commands::Deps { selection, to } => run_deps(&context, selection, to.as_deref()),
        Commands::Imports { file } => run_imports(&context, file),
        Commands::Resolve { from, to } => run_resolve(&context, from, to),
    }
}
