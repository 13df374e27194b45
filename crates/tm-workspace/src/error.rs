//! Error types for the tm-workspace crate.

use camino::Utf8PathBuf;
use tm_core::CapabilityError;

/// Errors raised by the filesystem collaborators.
///
/// # Error Recovery Strategy
///
/// - **Walker errors** ([`WorkspaceError::Walk`]): fatal, the reference search fails
/// - **Read and parse errors**: logged, the file is skipped and the search continues
/// - **Write errors** ([`WorkspaceError::Write`]): surfaced through the edit applier
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// Failed to walk the workspace.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write file {path}: {source}")]
    Write {
        /// The file that couldn't be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TypeScript file.
    #[error("failed to parse file {path}: {source}")]
    Parse {
        /// The file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: tm_ts_parser::ParseError,
    },

    /// The workspace root is unusable.
    #[error("invalid workspace: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl WorkspaceError {
    /// Creates a new [`WorkspaceError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`WorkspaceError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`WorkspaceError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: tm_ts_parser::ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`WorkspaceError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if a workspace-wide operation can skip the file and
    /// continue.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Parse { path, .. } => {
                Some(path)
            }
            Self::Walk(_) | Self::Config(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

impl From<WorkspaceError> for CapabilityError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::Read { path, source } | WorkspaceError::Write { path, source } => {
                Self::Io { path, source }
            }
            other => Self::Search(other.to_string()),
        }
    }
}
