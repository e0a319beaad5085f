//! Error types for manifest operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing manifest files.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read an input file.
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a read error for `path`.
    #[must_use]
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a write error for `path`.
    #[must_use]
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The file this error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }
}
