//! Configuration for the refactoring engine.
//!
//! - [`RefactorConfig`] - User-facing settings, loadable from `.tymove.json`
//! - [`ImportStyle`] - Style used for synthesized imports
//! - [`RefactorContext`] - The explicit context injected into every component
//!
//! Settings are never read from ambient global state: the CLI (or any other
//! front end) builds a [`RefactorContext`] once and passes it to each
//! component's constructor.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the optional per-workspace configuration file.
pub const CONFIG_FILE_NAME: &str = ".tymove.json";

/// Style used when a newly synthesized import has no prior style signal.
///
/// # Examples
///
/// ```
/// use tm_core::ImportStyle;
///
/// assert_eq!(ImportStyle::default(), ImportStyle::Regular);
/// assert!(ImportStyle::Type.is_type_only());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    /// `import { Foo } from "..."`
    #[default]
    Regular,
    /// `import type { Foo } from "..."`
    Type,
}

impl ImportStyle {
    /// Returns `true` for [`ImportStyle::Type`].
    #[inline]
    #[must_use]
    pub const fn is_type_only(self) -> bool {
        matches!(self, Self::Type)
    }
}

impl std::str::FromStr for ImportStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "type" => Ok(Self::Type),
            other => Err(ConfigError::InvalidOption {
                option: "importStyle".to_owned(),
                reason: format!("expected \"regular\" or \"type\", got \"{other}\""),
            }),
        }
    }
}

/// User-facing settings for a move.
///
/// Field names follow the camelCase keys of `.tymove.json`:
///
/// ```json
/// {
///   "tsconfigPath": "./tsconfig.json",
///   "ignoredFolders": ["node_modules", "dist"],
///   "pathAliases": { "~types/*": ["src/types/*"] },
///   "importStyle": "type"
/// }
/// ```
///
/// # Examples
///
/// ```
/// use tm_core::{ImportStyle, RefactorConfig};
///
/// let config = RefactorConfig::default();
/// assert_eq!(config.tsconfig_path, "./tsconfig.json");
/// assert_eq!(config.ignored_folders, vec!["node_modules", "dist"]);
/// assert_eq!(config.import_style, ImportStyle::Regular);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefactorConfig {
    /// Path to the alias configuration file, relative to the workspace root.
    pub tsconfig_path: Utf8PathBuf,

    /// Directory names skipped when searching the workspace.
    pub ignored_folders: Vec<String>,

    /// Extra aliases merged after the configuration file's `paths` table.
    ///
    /// Targets are relative to the workspace root.
    pub path_aliases: IndexMap<String, Vec<String>>,

    /// Style for synthesized imports without a prior style signal.
    pub import_style: ImportStyle,
}

impl Default for RefactorConfig {
    fn default() -> Self {
        Self {
            tsconfig_path: Utf8PathBuf::from("./tsconfig.json"),
            ignored_folders: vec!["node_modules".to_owned(), "dist".to_owned()],
            path_aliases: IndexMap::new(),
            import_style: ImportStyle::Regular,
        }
    }
}

impl RefactorConfig {
    /// Loads `.tymove.json` from `workspace_root`, falling back to defaults
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid JSON.
    pub fn load(workspace_root: &Utf8Path) -> Result<Self, ConfigError> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            tracing::debug!(%path, "no workspace configuration, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
        Ok(config)
    }
}

/// The explicit context handed to every engine component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefactorContext {
    workspace_root: Utf8PathBuf,
    config: RefactorConfig,
}

impl RefactorContext {
    /// Creates a context for `workspace_root` with the given settings.
    #[must_use]
    pub fn new(workspace_root: impl Into<Utf8PathBuf>, config: RefactorConfig) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            config,
        }
    }

    /// The absolute workspace root.
    #[inline]
    #[must_use]
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// The full settings.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RefactorConfig {
        &self.config
    }

    /// The alias configuration path resolved against the workspace root.
    #[must_use]
    pub fn tsconfig_path(&self) -> Utf8PathBuf {
        self.workspace_root.join(&self.config.tsconfig_path)
    }

    /// Directory names skipped by workspace searches.
    #[inline]
    #[must_use]
    pub fn ignored_folders(&self) -> &[String] {
        &self.config.ignored_folders
    }

    /// Style for synthesized imports.
    #[inline]
    #[must_use]
    pub fn import_style(&self) -> ImportStyle {
        self.config.import_style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"importStyle": "type"}"#;
        let config: RefactorConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.import_style, ImportStyle::Type);
        assert_eq!(config.tsconfig_path, "./tsconfig.json");
        assert_eq!(config.ignored_folders, vec!["node_modules", "dist"]);
    }

    #[test]
    fn test_path_aliases_keep_insertion_order() {
        let json = r#"{"pathAliases": {"~z/*": ["z/*"], "~a/*": ["a/*"]}}"#;
        let config: RefactorConfig = serde_json::from_str(json).expect("parse");
        let keys: Vec<_> = config.path_aliases.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["~z/*", "~a/*"]);
    }

    #[test]
    fn test_import_style_from_str() {
        assert_eq!("type".parse::<ImportStyle>().expect("parse"), ImportStyle::Type);
        assert!("inline".parse::<ImportStyle>().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8 tempdir");
        let config = RefactorConfig::load(root).expect("load");
        assert_eq!(config, RefactorConfig::default());
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8 tempdir");
        std::fs::write(root.join(CONFIG_FILE_NAME), "{ not json").expect("write");

        let err = RefactorConfig::load(root).expect_err("invalid json");
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_context_resolves_tsconfig_path() {
        let context = RefactorContext::new("/work", RefactorConfig::default());
        assert_eq!(context.tsconfig_path(), Utf8PathBuf::from("/work/./tsconfig.json"));
    }
}
