//! Error types for fetch operations.

use thiserror::Error;

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching a single source.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// Download failed.
    #[error("Failed to download {url}: {message}")]
    Download {
        /// The URL being downloaded.
        url: String,
        /// Error message.
        message: String,
    },

    /// Archive could not be unpacked.
    #[error("Failed to extract {url}: {message}")]
    Extract {
        /// The URL the archive came from.
        url: String,
        /// Error message.
        message: String,
    },

    /// A git subprocess failed.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git subcommand (`clone`, `checkout`).
        operation: String,
        /// Exit status and captured stderr.
        message: String,
    },

    /// Reading the manifest failed.
    #[error(transparent)]
    Manifest(#[from] srcfetch_manifest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extract(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extract {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a git error.
    #[must_use]
    pub fn git(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Git {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
