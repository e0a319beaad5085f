//! Error types for Spack queries.

use thiserror::Error;

/// Result type for Spack queries.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a query run.
#[derive(Error, Debug)]
pub enum Error {
    /// The resolver executable could not be started.
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        /// The command line that was attempted.
        command: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The resolver ran but reported failure.
    #[error("'{command}' failed: {message}")]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// Exit status and captured stderr.
        message: String,
    },

    /// Reading inputs or writing manifests failed.
    #[error(transparent)]
    Manifest(#[from] srcfetch_manifest::Error),
}

impl Error {
    /// Create a command failed error.
    #[must_use]
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}
