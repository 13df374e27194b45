//! Directory traversal for TypeScript files.
//!
//! [`FileWalker`] uses the `ignore` crate, so `.gitignore` and `.ignore`
//! patterns are respected and hidden entries are skipped. Directory names
//! listed in the workspace's `ignoredFolders` are skipped on top of that.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;

use crate::error::WorkspaceError;

/// Directories that never hold project sources.
const SKIP_DIRECTORIES: &[&str] = &[".git", "coverage", ".turbo", ".next", ".nuxt"];

/// TypeScript file extensions to include in the walk.
const TYPESCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Discovers TypeScript files under a workspace root.
///
/// Paths are collected single-threaded first and then handed to rayon by
/// the caller.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use tm_workspace::FileWalker;
///
/// let walker = FileWalker::new(Utf8Path::new("./src"))?.with_skip_dirs(&["generated"]);
/// for path in walker.collect_paths()? {
///     println!("{path}");
/// }
/// # Ok::<(), tm_workspace::WorkspaceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileWalker {
    root: Utf8PathBuf,
    skip_dirs: Vec<String>,
    follow_links: bool,
}

impl FileWalker {
    /// Creates a walker for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Config`] if `root` doesn't exist or isn't a
    /// directory.
    pub fn new(root: &Utf8Path) -> Result<Self, WorkspaceError> {
        if !root.exists() {
            return Err(WorkspaceError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(WorkspaceError::config(format!(
                "root path is not a directory: {root}"
            )));
        }

        Ok(Self {
            root: root.to_owned(),
            skip_dirs: Vec::new(),
            follow_links: false,
        })
    }

    /// Adds directory names to skip, in addition to the built-in list.
    #[must_use]
    pub fn with_skip_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.skip_dirs
            .extend(dirs.iter().map(|dir| dir.as_ref().to_owned()));
        self
    }

    /// Configures whether to follow symbolic links. Off by default.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Collects every `.ts` and `.tsx` file under the root, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Walk`] if traversal fails, or
    /// [`WorkspaceError::NonUtf8Path`] for a path that isn't UTF-8.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, WorkspaceError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path = Utf8Path::from_path(path)
                .ok_or_else(|| WorkspaceError::NonUtf8Path(path.to_owned()))?;

            if is_typescript_file(utf8_path) && !self.should_skip_path(utf8_path) {
                paths.push(utf8_path.to_owned());
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            .standard_filters(true)
            .follow_links(self.follow_links)
            .threads(1)
            .require_git(false)
            .build()
    }

    fn should_skip_path(&self, path: &Utf8Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.components().any(|component| {
            let name = component.as_str();
            SKIP_DIRECTORIES.contains(&name) || self.skip_dirs.iter().any(|d| d == name)
        })
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn is_typescript_file(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| TYPESCRIPT_EXTENSIONS.contains(&ext))
}
