//! Import-scanning reference finder.
//!
//! Without a language service, references are found by following imports:
//! a file references the type when one of its imports names the type and
//! its specifier resolves to the declaring file. Relative specifiers and
//! `tsconfig.json` path aliases are both resolved.
//!
//! Candidate files are parsed in parallel with rayon. Each worker thread
//! keeps its own parsers through `map_init`.

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use tm_core::{CapabilityError, Location, RefactorContext, ReferenceFinder};
use tm_refactor::alias::normalize;
use tm_refactor::locator::find_at_position;
use tm_refactor::AliasResolver;
use tm_ts_parser::{Dialect, ParseError, TsParser};
use tracing::{debug, warn};

use crate::error::WorkspaceError;
use crate::walker::FileWalker;

/// Finds references to a type by scanning every workspace file's imports.
///
/// Locations in the declaring file come first, followed by the other files
/// in path order.
#[derive(Debug, Clone)]
pub struct ImportScanReferenceFinder {
    root: Utf8PathBuf,
    ignored_folders: Vec<String>,
    aliases: AliasResolver,
}

impl ImportScanReferenceFinder {
    /// Creates a finder over the workspace described by `context`.
    #[must_use]
    pub fn new(context: &RefactorContext, aliases: AliasResolver) -> Self {
        Self {
            root: context.workspace_root().to_owned(),
            ignored_folders: context.ignored_folders().to_vec(),
            aliases,
        }
    }

    /// Returns every TypeScript file the finder considers.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkspaceError`] if the workspace cannot be walked.
    pub fn candidate_files(&self) -> Result<Vec<Utf8PathBuf>, WorkspaceError> {
        FileWalker::new(&self.root)?
            .with_skip_dirs(&self.ignored_folders)
            .collect_paths()
    }

    fn search(&self, path: &Utf8Path, offset: usize) -> Result<Vec<Location>, WorkspaceError> {
        let declaring = normalize(path);
        let source =
            std::fs::read_to_string(&declaring).map_err(|e| WorkspaceError::read(&declaring, e))?;

        let mut parsers = Parsers::default();
        let parsed = parsers
            .for_path(&declaring)
            .and_then(|parser| parser.parse(&source))
            .map_err(|e| WorkspaceError::parse(&declaring, e))?;
        let Some(type_info) =
            find_at_position(&parsed, offset).map_err(|e| WorkspaceError::parse(&declaring, e))?
        else {
            return Err(WorkspaceError::config(format!(
                "no type declaration at {declaring}:{offset}"
            )));
        };
        let name = type_info.name();

        let mut locations: Vec<Location> = parsed
            .identifier_occurrences(name)
            .into_iter()
            .map(|range| Location::new(&declaring, range))
            .collect();

        let candidates = self.candidate_files()?;
        debug!(name, candidates = candidates.len(), "scanning imports");

        let per_file: Vec<Vec<Location>> = candidates
            .par_iter()
            .filter(|candidate| normalize(candidate) != declaring)
            .map_init(Parsers::default, |parsers, candidate| {
                match self.scan_file(parsers, candidate, &declaring, name) {
                    Ok(found) => found,
                    Err(err) => {
                        warn!(error = %err, "skipping file");
                        Vec::new()
                    }
                }
            })
            .collect();

        locations.extend(per_file.into_iter().flatten());
        Ok(locations)
    }

    /// Returns the locations in `path` that use `name` imported from
    /// `declaring`.
    fn scan_file(
        &self,
        parsers: &mut Parsers,
        path: &Utf8Path,
        declaring: &Utf8Path,
        name: &str,
    ) -> Result<Vec<Location>, WorkspaceError> {
        let source = std::fs::read_to_string(path).map_err(|e| WorkspaceError::read(path, e))?;
        if !source.contains(name) {
            return Ok(Vec::new());
        }

        let parsed = parsers
            .for_path(path)
            .and_then(|parser| parser.parse(&source))
            .map_err(|e| WorkspaceError::parse(path, e))?;

        let mut locations = Vec::new();
        for import in parsed.imports() {
            let Some(binding) = import.named_binding(name) else {
                continue;
            };
            let resolved = self
                .aliases
                .resolve_specifier(path, &import.specifier, |p| p.is_file());
            if resolved.as_deref() != Some(declaring) {
                continue;
            }

            locations.extend(
                parsed
                    .identifier_occurrences(binding.local_name())
                    .into_iter()
                    .map(|range| Location::new(path, range)),
            );
        }

        if !locations.is_empty() {
            debug!(%path, count = locations.len(), "file imports the type");
        }
        Ok(locations)
    }
}

impl ReferenceFinder for ImportScanReferenceFinder {
    fn find_references(
        &self,
        path: &Utf8Path,
        offset: usize,
    ) -> Result<Vec<Location>, CapabilityError> {
        self.search(path, offset).map_err(CapabilityError::from)
    }
}

/// Lazily created per-thread parsers, one per dialect.
#[derive(Default)]
struct Parsers {
    typescript: Option<TsParser>,
    tsx: Option<TsParser>,
}

impl Parsers {
    fn for_path(&mut self, path: &Utf8Path) -> Result<&mut TsParser, ParseError> {
        let dialect = Dialect::from_path(path);
        let slot = match dialect {
            Dialect::TypeScript => &mut self.typescript,
            Dialect::Tsx => &mut self.tsx,
        };
        if slot.is_none() {
            *slot = Some(TsParser::for_dialect(dialect)?);
        }
        slot.as_mut().ok_or(ParseError::LanguageInit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tm_core::RefactorConfig;

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        let path = dir.path().canonicalize().expect("canonical temp dir");
        Utf8PathBuf::from_path_buf(path).expect("utf-8 temp dir")
    }

    fn write(root: &Utf8Path, relative: &str, content: &str) -> Utf8PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, content).expect("write");
        path
    }

    fn files_of(locations: &[Location], root: &Utf8Path) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        for location in locations {
            let relative = location
                .path
                .strip_prefix(root)
                .expect("under root")
                .as_str()
                .to_owned();
            if !files.contains(&relative) {
                files.push(relative);
            }
        }
        files
    }

    #[test]
    fn test_finds_relative_and_alias_imports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = utf8_root(&dir);
        write(
            &root,
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": "./src", "paths": { "@/*": ["*"] } } }"#,
        );
        let declaring = write(
            &root,
            "src/models/user.ts",
            "export interface User { id: string }\nexport const make = (u: User) => u;\n",
        );
        write(
            &root,
            "src/views/a.ts",
            "import { User } from '../models/user';\nlet a: User;\n",
        );
        write(
            &root,
            "src/views/b.tsx",
            "import type { User as U } from '@/models/user';\nconst B = (p: U) => <div />;\n",
        );
        write(
            &root,
            "src/views/other.ts",
            "import { User } from './somewhere-else';\nlet c: User;\n",
        );
        write(
            &root,
            "node_modules/pkg/index.ts",
            "import { User } from '../../src/models/user';\n",
        );

        let context = RefactorContext::new(root.clone(), RefactorConfig::default());
        let finder = ImportScanReferenceFinder::new(&context, AliasResolver::load(&context));

        let locations = finder
            .find_references(&declaring, "export interface ".len())
            .expect("search");
        assert_eq!(
            files_of(&locations, &root),
            vec!["src/models/user.ts", "src/views/a.ts", "src/views/b.tsx"]
        );

        let in_declaring = locations.iter().filter(|l| l.path == declaring).count();
        assert_eq!(in_declaring, 2);
    }

    #[test]
    fn test_offset_outside_any_type_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = utf8_root(&dir);
        let declaring = write(&root, "a.ts", "const x = 1;\nexport type A = string;\n");

        let context = RefactorContext::new(root.clone(), RefactorConfig::default());
        let finder = ImportScanReferenceFinder::new(&context, AliasResolver::disabled());

        let err = finder.find_references(&declaring, 2).expect_err("no type");
        assert!(matches!(err, CapabilityError::Search(_)));
    }

    #[test]
    fn test_unreadable_candidate_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = utf8_root(&dir);
        let declaring = write(&root, "a.ts", "export type A = string;\n");
        write(&root, "b.ts", "import { A } from './a';\nlet x: A;\n");

        let context = RefactorContext::new(root.clone(), RefactorConfig::default());
        let finder = ImportScanReferenceFinder::new(&context, AliasResolver::disabled());
        let mut parsers = Parsers::default();

        let missing = root.join("gone.ts");
        let err = finder
            .scan_file(&mut parsers, &missing, &declaring, "A")
            .expect_err("missing file");
        assert!(err.is_recoverable());

        let found = finder
            .scan_file(&mut parsers, &root.join("b.ts"), &declaring, "A")
            .expect("scan");
        assert_eq!(found.len(), 2);
    }
}
