//! Access to the external dependency resolver.

use std::ffi::OsString;
use std::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// A dependency resolver that answers in Spack's text formats.
pub trait Resolver {
    /// Resolved dependency tree for `spec`, as printed by `spack spec`.
    fn spec(&self, spec: &str) -> Result<String>;

    /// Package metadata for `package` (`name@version`), as printed by `spack info`.
    fn info(&self, package: &str) -> Result<String>;
}

/// [`Resolver`] backed by the `spack` executable.
#[derive(Debug, Clone)]
pub struct SpackCli {
    program: OsString,
}

impl Default for SpackCli {
    fn default() -> Self {
        Self::new("spack")
    }
}

impl SpackCli {
    /// Use `program` as the Spack executable.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, subcommand: &str, arg: &str) -> Result<String> {
        let command = format!("{} {subcommand} {arg}", self.program.to_string_lossy());
        debug!(%command, "Running resolver");

        let output = Command::new(&self.program)
            .args([subcommand, arg])
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::command_failed(
                command,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Resolver for SpackCli {
    fn spec(&self, spec: &str) -> Result<String> {
        self.run("spec", spec)
    }

    fn info(&self, package: &str) -> Result<String> {
        self.run("info", package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let spack = SpackCli::new("/nonexistent/bin/spack");
        let err = spack.spec("zlib").unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/bin/spack spec zlib"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_command_failed() {
        let spack = SpackCli::new("false");
        let err = spack.info("zlib@1.3.1").unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        // `echo spec zlib` stands in for the resolver
        let spack = SpackCli::new("echo");
        assert_eq!(spack.spec("zlib").unwrap(), "spec zlib\n");
    }
}
