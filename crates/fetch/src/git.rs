//! Git operations for pinned-commit sources.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// Clones repositories and checks out commits.
pub trait GitClient {
    /// Clone `url` into `dest`, which must not exist yet.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Check out `commit` in the working tree at `repo`.
    fn checkout(&self, repo: &Path, commit: &str) -> Result<()>;
}

/// [`GitClient`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    /// Use `program` as the git executable.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, operation: &str, command: &mut Command) -> Result<()> {
        let output = command
            .output()
            .map_err(|e| Error::git(operation, format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::git(
                operation,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }
        Ok(())
    }
}

impl GitClient for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(%url, ?dest, "git clone");
        self.run(
            "clone",
            Command::new(&self.program).arg("clone").arg(url).arg(dest),
        )
    }

    fn checkout(&self, repo: &Path, commit: &str) -> Result<()> {
        debug!(?repo, %commit, "git checkout");
        self.run(
            "checkout",
            Command::new(&self.program)
                .arg("checkout")
                .arg(commit)
                .current_dir(repo),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(["-c", "user.name=srcfetch", "-c", "user.email=srcfetch@localhost"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {args:?} failed");
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    #[test]
    fn test_clone_and_checkout_local_repo() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let origin = temp.path().join("origin");
        std::fs::create_dir(&origin).unwrap();
        git(&origin, &["init", "-q"]);
        std::fs::write(origin.join("VERSION"), "1\n").unwrap();
        git(&origin, &["add", "VERSION"]);
        git(&origin, &["commit", "-q", "-m", "one"]);
        let first = git(&origin, &["rev-parse", "HEAD"]);
        std::fs::write(origin.join("VERSION"), "2\n").unwrap();
        git(&origin, &["commit", "-q", "-am", "two"]);

        let dest = temp.path().join("pkg-1.0");
        let client = GitCli::default();
        client
            .clone_repo(origin.to_str().unwrap(), &dest)
            .unwrap();
        assert_eq!(std::fs::read_to_string(dest.join("VERSION")).unwrap(), "2\n");

        client.checkout(&dest, &first[..12]).unwrap();
        assert_eq!(std::fs::read_to_string(dest.join("VERSION")).unwrap(), "1\n");
    }

    #[test]
    fn test_checkout_unknown_commit_fails() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        git(temp.path(), &["init", "-q"]);
        let err = GitCli::default()
            .checkout(temp.path(), "deadbeef")
            .unwrap_err();
        assert!(matches!(err, Error::Git { ref operation, .. } if operation == "checkout"));
    }

    #[test]
    fn test_missing_git_executable() {
        let temp = TempDir::new().unwrap();
        let err = GitCli::new("/nonexistent/bin/git")
            .clone_repo("https://example.org/repo.git", &temp.path().join("repo"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to run git"));
    }
}
