//! Path alias resolution.
//!
//! Import specifiers are computed from a `tsconfig.json` `paths` table when a
//! file lies under one of its targets, and as relative paths otherwise.
//!
//! ```text
//! tsconfig.json                      file                      specifier
//! baseUrl "./src", "@/*": ["*"]      src/utils/helper.ts   ->  @/utils/helper
//! (no match)                         src/c.ts from src/b.ts -> ./c
//! ```
//!
//! Loading never fails. A missing or malformed configuration file disables
//! alias resolution and is logged.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Deserialize;
use tm_core::{ConfigError, RefactorContext};
use tracing::{debug, warn};

/// Extensions removed from a file path when it becomes a specifier.
const STRIPPED_EXTENSIONS: &[&str] = &["ts", "tsx", "vue"];

/// Suffixes probed when turning a specifier back into a file.
const PROBE_SUFFIXES: &[&str] = &[".ts", ".tsx", ".d.ts", "/index.ts", "/index.tsx"];

/// Name searched for when the configured path does not exist.
const TSCONFIG_FILE_NAME: &str = "tsconfig.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TsConfig {
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CompilerOptions {
    base_url: Option<String>,
    paths: IndexMap<String, Vec<String>>,
}

/// The alias table read from a configuration file.
///
/// Patterns keep the order they were written in; the first matching pattern
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConfig {
    base_dir: Utf8PathBuf,
    base_url: Utf8PathBuf,
    path_map: IndexMap<String, Vec<String>>,
}

impl AliasConfig {
    /// Creates a table whose `base_url` is resolved against `base_dir`.
    #[must_use]
    pub fn new(
        base_dir: impl Into<Utf8PathBuf>,
        base_url: &str,
        path_map: IndexMap<String, Vec<String>>,
    ) -> Self {
        let base_dir = base_dir.into();
        let base_url = normalize(&base_dir.join(base_url));
        Self {
            base_dir,
            base_url,
            path_map,
        }
    }

    /// Parses the text of a `tsconfig.json` located at `path`.
    ///
    /// Comments and trailing commas are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Syntax`] if the text is not valid JSON5 or the
    /// `compilerOptions` have the wrong shape.
    pub fn from_tsconfig_str(path: &Utf8Path, text: &str) -> Result<Self, ConfigError> {
        let tsconfig: TsConfig = json5::from_str(text).map_err(|e| ConfigError::Syntax {
            path: path.to_owned(),
            message: e.to_string(),
        })?;

        let base_dir = path.parent().map_or_else(Utf8PathBuf::new, Utf8Path::to_owned);
        let options = tsconfig.compiler_options;
        Ok(Self::new(
            base_dir,
            options.base_url.as_deref().unwrap_or("."),
            options.paths,
        ))
    }

    /// Reads and parses a `tsconfig.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Syntax`] if it cannot be parsed.
    pub fn read(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_tsconfig_str(path, &text)
    }

    /// The directory containing the configuration file.
    #[inline]
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// The absolute directory targets are resolved against.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Utf8Path {
        &self.base_url
    }

    /// Pattern to targets, in insertion order.
    #[inline]
    #[must_use]
    pub fn path_map(&self) -> &IndexMap<String, Vec<String>> {
        &self.path_map
    }
}

/// Computes import specifiers, preferring configured path aliases.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    config: Option<AliasConfig>,
}

impl AliasResolver {
    /// A resolver that knows no aliases and always produces relative paths.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A resolver over an already parsed table.
    #[must_use]
    pub fn from_config(config: AliasConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Loads the alias table for `context`.
    ///
    /// The configured `tsconfigPath` is tried first; when it does not exist,
    /// `tsconfig.json` is searched for upward from the workspace root. The
    /// context's own `pathAliases` are appended after the file's patterns,
    /// with targets relative to the workspace root.
    ///
    /// Failures are logged and leave only the context's own aliases active.
    #[must_use]
    pub fn load(context: &RefactorContext) -> Self {
        let root = context.workspace_root();

        let from_file = match locate_tsconfig(context) {
            Some(path) => match AliasConfig::read(&path) {
                Ok(config) => {
                    debug!(%path, patterns = config.path_map.len(), "loaded path aliases");
                    Some(config)
                }
                Err(err) => {
                    warn!(error = %err, "ignoring alias configuration");
                    None
                }
            },
            None => {
                debug!(%root, "no tsconfig.json found, path aliases disabled");
                None
            }
        };

        let extra = &context.config().path_aliases;
        if extra.is_empty() {
            return Self { config: from_file };
        }

        let mut config = from_file.unwrap_or_else(|| AliasConfig::new(root, ".", IndexMap::new()));
        for (pattern, targets) in extra {
            if config.path_map.contains_key(pattern) {
                debug!(%pattern, "configured alias shadowed by tsconfig.json");
                continue;
            }
            let absolute = targets
                .iter()
                .map(|target| root.join(target).into_string())
                .collect();
            config.path_map.insert(pattern.clone(), absolute);
        }
        Self {
            config: Some(config),
        }
    }

    /// The loaded table, if any.
    #[inline]
    #[must_use]
    pub fn config(&self) -> Option<&AliasConfig> {
        self.config.as_ref()
    }

    /// Returns `true` if at least one alias pattern is known.
    #[must_use]
    pub fn has_aliases(&self) -> bool {
        self.config.as_ref().is_some_and(|c| !c.path_map.is_empty())
    }

    /// Returns the aliased specifier for `file`, if a pattern covers it.
    ///
    /// Patterns are tried in insertion order against their first target.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use indexmap::IndexMap;
    /// use tm_refactor::{AliasConfig, AliasResolver};
    ///
    /// let mut paths = IndexMap::new();
    /// paths.insert("@/*".to_owned(), vec!["*".to_owned()]);
    /// let resolver = AliasResolver::from_config(AliasConfig::new("/repo", "./src", paths));
    ///
    /// assert_eq!(
    ///     resolver.try_match_alias(Utf8Path::new("/repo/src/utils/helper.ts")).as_deref(),
    ///     Some("@/utils/helper")
    /// );
    /// assert_eq!(resolver.try_match_alias(Utf8Path::new("/elsewhere/x.ts")), None);
    /// ```
    #[must_use]
    pub fn try_match_alias(&self, file: &Utf8Path) -> Option<String> {
        let config = self.config.as_ref()?;
        let file = normalize(file);

        config.path_map.iter().find_map(|(pattern, targets)| {
            let target = targets.first()?;
            match (pattern.strip_suffix('*'), target.strip_suffix('*')) {
                (Some(prefix), Some(target_prefix)) => {
                    let target_dir = normalize(&config.base_url.join(target_prefix));
                    let rest = file.strip_prefix(&target_dir).ok()?;
                    let rest = strip_extension(&join_components(rest));
                    (!rest.is_empty()).then(|| format!("{prefix}{rest}"))
                }
                (None, None) => {
                    let target_file = normalize(&config.base_url.join(target));
                    (strip_extension(file.as_str()) == strip_extension(target_file.as_str()))
                        .then(|| pattern.clone())
                }
                _ => None,
            }
        })
    }

    /// Returns the specifier `from` should use to import `to`.
    ///
    /// An alias is used when one matches; otherwise the path is relative to
    /// `from`'s directory and starts with `./` or `../`.
    #[must_use]
    pub fn resolve_import_path(&self, from: &Utf8Path, to: &Utf8Path) -> String {
        if let Some(alias) = self.try_match_alias(to) {
            return alias;
        }
        relative_specifier(from, to)
    }

    /// Returns `true` if `specifier` is managed by an alias pattern.
    #[must_use]
    pub fn should_be_type_only_preserving(&self, specifier: &str) -> bool {
        let Some(config) = &self.config else {
            return false;
        };
        config.path_map.keys().any(|pattern| {
            let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
            !prefix.is_empty() && specifier.starts_with(prefix)
        })
    }

    /// Maps `specifier`, as written in `from`, back to a file.
    ///
    /// Relative specifiers are joined to `from`'s directory; aliased ones are
    /// expanded through every target of the first matching pattern. Each
    /// candidate is probed with the usual TypeScript suffixes through
    /// `exists`. Package imports resolve to `None`.
    pub fn resolve_specifier(
        &self,
        from: &Utf8Path,
        specifier: &str,
        exists: impl Fn(&Utf8Path) -> bool,
    ) -> Option<Utf8PathBuf> {
        if is_relative(specifier) {
            let dir = from.parent().unwrap_or(Utf8Path::new(""));
            return probe(&normalize(&dir.join(specifier)), &exists);
        }

        let config = self.config.as_ref()?;
        let (pattern, targets) = config.path_map.iter().find(|(pattern, _)| {
            match pattern.strip_suffix('*') {
                Some(prefix) => specifier.starts_with(prefix),
                None => specifier == pattern.as_str(),
            }
        })?;

        let rest = pattern
            .strip_suffix('*')
            .and_then(|prefix| specifier.strip_prefix(prefix))
            .unwrap_or("");

        targets.iter().find_map(|target| {
            let expanded = match target.strip_suffix('*') {
                Some(target_prefix) => format!("{target_prefix}{rest}"),
                None => target.clone(),
            };
            probe(&normalize(&config.base_url.join(expanded)), &exists)
        })
    }
}

/// Finds the configuration file for `context`.
fn locate_tsconfig(context: &RefactorContext) -> Option<Utf8PathBuf> {
    let configured = context.tsconfig_path();
    if configured.is_file() {
        return Some(configured);
    }
    context
        .workspace_root()
        .ancestors()
        .map(|dir| dir.join(TSCONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn probe(base: &Utf8Path, exists: &impl Fn(&Utf8Path) -> bool) -> Option<Utf8PathBuf> {
    if base
        .extension()
        .is_some_and(|ext| STRIPPED_EXTENSIONS.contains(&ext))
        && exists(base)
    {
        return Some(base.to_owned());
    }

    // ESM-style `./foo.js` pointing at `foo.ts`
    if base.extension() == Some("js") {
        let ts = base.with_extension("ts");
        if exists(&ts) {
            return Some(ts);
        }
    }

    PROBE_SUFFIXES
        .iter()
        .map(|suffix| Utf8PathBuf::from(format!("{base}{suffix}")))
        .find(|candidate| exists(candidate))
}

/// Builds a `./` or `../` specifier for `to` as seen from `from`'s
/// directory.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use tm_refactor::alias::relative_specifier;
///
/// assert_eq!(relative_specifier(Utf8Path::new("/p/src/b.ts"), Utf8Path::new("/p/src/c.ts")), "./c");
/// assert_eq!(relative_specifier(Utf8Path::new("/p/src/ui/b.ts"), Utf8Path::new("/p/src/c.ts")), "../c");
/// assert_eq!(relative_specifier(Utf8Path::new("/p/b.ts"), Utf8Path::new("/p/src/m/c.tsx")), "./src/m/c");
/// ```
#[must_use]
pub fn relative_specifier(from: &Utf8Path, to: &Utf8Path) -> String {
    let from_dir = normalize(from.parent().unwrap_or(Utf8Path::new("")));
    let to = normalize(to);

    let from_parts: Vec<_> = from_dir.components().collect();
    let to_parts: Vec<_> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat_n("..", from_parts.len() - common));
    parts.extend(to_parts[common..].iter().map(|c| c.as_str()));

    let joined = strip_extension(&parts.join("/"));
    if joined.starts_with("../") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Removes a `.ts`, `.tsx` or `.vue` extension.
fn strip_extension(path: &str) -> String {
    STRIPPED_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext)?.strip_suffix('.'))
        .unwrap_or(path)
        .to_owned()
}

/// Joins the components of a relative path with `/`.
fn join_components(path: &Utf8Path) -> String {
    path.components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolves `.` and `..` components lexically.
#[must_use]
pub fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::RefactorConfig;

    fn resolver(base_url: &str, paths: &[(&str, &[&str])]) -> AliasResolver {
        let map = paths
            .iter()
            .map(|(pattern, targets)| {
                (
                    (*pattern).to_owned(),
                    targets.iter().map(|t| (*t).to_owned()).collect(),
                )
            })
            .collect();
        AliasResolver::from_config(AliasConfig::new("/repo", base_url, map))
    }

    #[test]
    fn test_alias_precedence_over_relative() {
        let resolver = resolver("./src", &[("@/*", &["*"])]);
        let specifier = resolver.resolve_import_path(
            Utf8Path::new("/repo/src/app/main.ts"),
            Utf8Path::new("/repo/src/utils/helper.ts"),
        );
        assert_eq!(specifier, "@/utils/helper");
    }

    #[test]
    fn test_first_pattern_wins() {
        let resolver = resolver(
            ".",
            &[("@models/*", &["src/models/*"]), ("@/*", &["src/*"])],
        );
        assert_eq!(
            resolver
                .try_match_alias(Utf8Path::new("/repo/src/models/user.ts"))
                .as_deref(),
            Some("@models/user")
        );
        assert_eq!(
            resolver
                .try_match_alias(Utf8Path::new("/repo/src/lib/x.tsx"))
                .as_deref(),
            Some("@/lib/x")
        );
    }

    #[test]
    fn test_exact_pattern() {
        let resolver = resolver(".", &[("@config", &["src/config.ts"])]);
        assert_eq!(
            resolver
                .try_match_alias(Utf8Path::new("/repo/src/config.ts"))
                .as_deref(),
            Some("@config")
        );
        assert_eq!(
            resolver.try_match_alias(Utf8Path::new("/repo/src/other.ts")),
            None
        );
    }

    #[test]
    fn test_relative_fallback() {
        let resolver = AliasResolver::disabled();
        assert_eq!(
            resolver.resolve_import_path(
                Utf8Path::new("/repo/src/b.ts"),
                Utf8Path::new("/repo/src/c.ts")
            ),
            "./c"
        );
        assert_eq!(
            resolver.resolve_import_path(
                Utf8Path::new("/repo/src/deep/b.ts"),
                Utf8Path::new("/repo/lib/c.vue")
            ),
            "../../lib/c"
        );
    }

    #[test]
    fn test_should_be_type_only_preserving() {
        let resolver = resolver("./src", &[("@/*", &["*"]), ("~lib", &["lib/index.ts"])]);
        assert!(resolver.should_be_type_only_preserving("@/utils/helper"));
        assert!(resolver.should_be_type_only_preserving("~lib"));
        assert!(!resolver.should_be_type_only_preserving("./c"));
        assert!(!AliasResolver::disabled().should_be_type_only_preserving("@/x"));
    }

    #[test]
    fn test_resolve_specifier_relative_and_alias() {
        let resolver = resolver("./src", &[("@/*", &["*"])]);
        let existing = [
            Utf8PathBuf::from("/repo/src/c.ts"),
            Utf8PathBuf::from("/repo/src/ui/index.tsx"),
        ];
        let exists = |p: &Utf8Path| existing.iter().any(|e| e == p);

        assert_eq!(
            resolver.resolve_specifier(Utf8Path::new("/repo/src/a/b.ts"), "../c", exists),
            Some(Utf8PathBuf::from("/repo/src/c.ts"))
        );
        assert_eq!(
            resolver.resolve_specifier(Utf8Path::new("/repo/src/a/b.ts"), "@/ui", exists),
            Some(Utf8PathBuf::from("/repo/src/ui/index.tsx"))
        );
        assert_eq!(
            resolver.resolve_specifier(Utf8Path::new("/repo/src/b.ts"), "./c.js", exists),
            Some(Utf8PathBuf::from("/repo/src/c.ts"))
        );
        assert_eq!(
            resolver.resolve_specifier(Utf8Path::new("/repo/src/b.ts"), "react", exists),
            None
        );
    }

    #[test]
    fn test_tsconfig_with_comments() {
        let text = r#"{
            // comments and trailing commas are allowed
            "compilerOptions": {
                "baseUrl": "./src",
                "paths": { "@/*": ["*"], "@shared/*": ["../shared/*"], },
            },
        }"#;
        let config =
            AliasConfig::from_tsconfig_str(Utf8Path::new("/repo/tsconfig.json"), text).expect("parse");
        assert_eq!(config.base_url(), Utf8Path::new("/repo/src"));
        let patterns: Vec<_> = config.path_map().keys().map(String::as_str).collect();
        assert_eq!(patterns, vec!["@/*", "@shared/*"]);
    }

    #[test]
    fn test_missing_tsconfig_disables_aliases() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        let context = RefactorContext::new(&root, RefactorConfig::default());

        let resolver = AliasResolver::load(&context);
        // An ancestor directory may contain a tsconfig.json, so only check
        // that loading did not fail and relative paths still work.
        assert_eq!(
            resolver.resolve_import_path(&root.join("src/b.ts"), &root.join("src/c.ts")),
            "./c"
        );
    }

    #[test]
    fn test_invalid_tsconfig_disables_aliases() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        std::fs::write(root.join("tsconfig.json"), "{ not json").expect("write");
        let context = RefactorContext::new(&root, RefactorConfig::default());

        let resolver = AliasResolver::load(&context);
        assert!(resolver.config().is_none());
        assert!(!resolver.has_aliases());
    }

    #[test]
    fn test_configured_aliases_are_appended() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        std::fs::write(
            root.join("tsconfig.json"),
            r#"{ "compilerOptions": { "paths": { "@/*": ["src/*"] } } }"#,
        )
        .expect("write");

        let mut config = RefactorConfig::default();
        config
            .path_aliases
            .insert("@/*".to_owned(), vec!["other/*".to_owned()]);
        config
            .path_aliases
            .insert("#types/*".to_owned(), vec!["types/*".to_owned()]);
        let context = RefactorContext::new(&root, config);

        let resolver = AliasResolver::load(&context);
        let patterns: Vec<_> = resolver
            .config()
            .expect("config")
            .path_map()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(patterns, vec!["@/*", "#types/*"]);
        assert_eq!(
            resolver
                .try_match_alias(&root.join("types/user.ts"))
                .as_deref(),
            Some("#types/user")
        );
        assert_eq!(
            resolver.try_match_alias(&root.join("src/a.ts")).as_deref(),
            Some("@/a")
        );
    }
}
