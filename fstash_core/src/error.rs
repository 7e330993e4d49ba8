//! Error types for fstash_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using fstash_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during stash operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Stash name fails the character-set check after normalization.
    #[error("invalid stash name: {name:?} (only letters, digits, '-' and '_' are allowed)")]
    InvalidName { name: String },

    /// Referenced stash or source path does not exist.
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// A directory was expected.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Path component is not valid UTF-8.
    #[error("invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Template rendering failed.
    #[error("template error in {file}: {reason}")]
    Template { file: String, reason: String },
}

impl Error {
    /// Create an InvalidName error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Error::InvalidName { name: name.into() }
    }

    /// Create a NotFound error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Error::NotADirectory { path: path.into() }
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Error::InvalidPath { path: path.into() }
    }

    /// Create a Template error.
    pub fn template(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Template {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on.
    pub(crate) fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        Error::Io {
            source: std::io::Error::new(err.kind(), format!("{}: {}", path.display(), err)),
        }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}
