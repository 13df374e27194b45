//! Error types for the tm-core crate.
//!
//! - [`ConfigError`] for loading [`RefactorConfig`](crate::RefactorConfig)
//! - [`EditError`] for invalid edit batches
//! - [`CapabilityError`] for failures reported by external collaborators

use camino::Utf8PathBuf;

use crate::types::ByteRange;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use tm_core::ConfigError;
///
/// let error = ConfigError::InvalidOption {
///     option: "importStyle".to_owned(),
///     reason: "expected \"regular\" or \"type\"".to_owned(),
/// };
/// assert!(error.to_string().contains("importStyle"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// The configuration file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// The configuration file that could not be parsed.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A JSON-with-comments file (such as `tsconfig.json`) is malformed.
    #[error("malformed {path}: {message}")]
    Syntax {
        /// The file that could not be parsed.
        path: Utf8PathBuf,
        /// The parser's description of the problem.
        message: String,
    },
}

/// Errors raised while normalizing or applying a batch of edits to one file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Two edits in the same batch touch overlapping ranges.
    #[error("overlapping edits at {first} and {second}")]
    Overlapping {
        /// The edit with the higher start offset.
        first: ByteRange,
        /// The edit with the lower start offset.
        second: ByteRange,
    },

    /// An edit range extends past the end of the document.
    #[error("edit range {range} is out of bounds for a document of {len} bytes")]
    OutOfBounds {
        /// The offending range.
        range: ByteRange,
        /// The document length in bytes.
        len: usize,
    },

    /// An edit boundary falls inside a multi-byte UTF-8 character.
    #[error("edit range {0} does not fall on character boundaries")]
    NotCharBoundary(ByteRange),

    /// Range edits were added for a file that is already scheduled for a
    /// whole-document write.
    #[error("cannot combine range edits with a whole-document write for {0}")]
    ConflictingOperation(Utf8PathBuf),
}

/// Errors reported by external collaborators (document store, edit applier,
/// reference finder).
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// The requested document does not exist.
    #[error("document not found: {0}")]
    NotFound(Utf8PathBuf),

    /// An I/O error occurred while reading or writing a document.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The document being accessed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The collaborator refused the edit transaction.
    #[error("edit rejected for {path}: {reason}")]
    Rejected {
        /// The document whose transaction was rejected.
        path: Utf8PathBuf,
        /// Why the transaction was rejected.
        reason: String,
    },

    /// The edit batch itself was invalid.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// The reference search could not complete.
    #[error("reference search failed: {0}")]
    Search(String),
}
