//! The per-line fetch loop.

use srcfetch_manifest::{LocationError, RecordError, SourceLocation, SourceRecord, read_text};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, GitCli, GitClient, HttpTransport, Result, Transport, unpack_tarball};

/// Where fetched sources land.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory holding one `<name>-<version>` directory per record.
    pub target_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("."),
        }
    }
}

/// Result of handling one manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The source was downloaded and extracted, or cloned and checked out.
    Fetched,
    /// Nothing was fetched: the target exists or the line was not usable.
    Skipped {
        /// Why the line was skipped.
        reason: String,
    },
    /// Fetching was attempted and failed.
    Failed {
        /// What went wrong.
        reason: String,
    },
}

impl FetchOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Outcome of one manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// 1-based line number in the manifest.
    pub line: usize,
    /// `name@version`, or the raw line when it could not be parsed.
    pub label: String,
    /// What happened.
    pub outcome: FetchOutcome,
}

/// Outcomes of a whole manifest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// One entry per processed line, in manifest order.
    pub outcomes: Vec<LineOutcome>,
}

impl FetchReport {
    /// Lines whose source was fetched.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Fetched))
    }

    /// Lines that were skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Skipped { .. }))
    }

    /// Lines that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&FetchOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|l| predicate(&l.outcome)).count()
    }
}

impl fmt::Display for FetchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetched {}, skipped {}, failed {}",
            self.fetched(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Fetches the sources named in a manifest.
#[derive(Debug)]
pub struct Fetcher<T, G> {
    config: FetchConfig,
    transport: T,
    git: G,
}

impl Fetcher<HttpTransport, GitCli> {
    /// A fetcher using HTTP downloads and the `git` executable.
    pub fn with_defaults(config: FetchConfig) -> Result<Self> {
        Ok(Self::new(config, HttpTransport::new()?, GitCli::default()))
    }
}

impl<T: Transport, G: GitClient> Fetcher<T, G> {
    /// Create a fetcher from its collaborators.
    pub fn new(config: FetchConfig, transport: T, git: G) -> Self {
        Self {
            config,
            transport,
            git,
        }
    }

    /// Process every line of the manifest at `path`.
    ///
    /// Only failing to read the manifest is an error; each line's outcome is
    /// in the report.
    pub fn fetch_manifest(&self, path: &Path) -> Result<FetchReport> {
        let text = read_text(path)?;
        Ok(self.fetch_lines(&text))
    }

    /// Process every line of manifest text.
    ///
    /// Blank lines and lines without `->` are ignored and do not appear in
    /// the report.
    pub fn fetch_lines(&self, text: &str) -> FetchReport {
        let mut report = FetchReport::default();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || !line.contains("->") {
                continue;
            }
            let (label, outcome) = self.fetch_line(line);
            report.outcomes.push(LineOutcome {
                line: index + 1,
                label,
                outcome,
            });
        }
        report
    }

    fn fetch_line(&self, line: &str) -> (String, FetchOutcome) {
        match line.parse::<SourceRecord>() {
            Ok(record) => (record.label(), self.fetch_record(&record)),
            Err(RecordError::Location(e @ LocationError::UnparseableGit(_))) => {
                warn!("{e}");
                (line.to_string(), FetchOutcome::skipped(e.to_string()))
            }
            Err(RecordError::Location(e @ LocationError::Unrecognized(_))) => {
                warn!("{e}");
                (line.to_string(), FetchOutcome::skipped(e.to_string()))
            }
            Err(e) => {
                warn!(%line, "Malformed manifest line: {e}");
                (line.to_string(), FetchOutcome::skipped(format!("malformed line: {e}")))
            }
        }
    }

    /// Fetch one record into its target directory.
    pub fn fetch_record(&self, record: &SourceRecord) -> FetchOutcome {
        let target = self.config.target_dir.join(record.target_dir_name());
        if target.exists() {
            info!("[SKIP] {} already exists", target.display());
            return FetchOutcome::skipped(format!("{} already exists", target.display()));
        }

        let result = match &record.location {
            SourceLocation::Tarball { url } => self.fetch_tarball(url, &target),
            SourceLocation::Git { url, commit } => self.fetch_git(url, commit, &target),
        };

        match result {
            Ok(()) => {
                info!(package = %record.label(), "Done");
                FetchOutcome::Fetched
            }
            Err(e) => {
                warn!(package = %record.label(), url = record.location.url(), "{e}");
                FetchOutcome::failed(e.to_string())
            }
        }
    }

    fn fetch_tarball(&self, url: &str, target: &Path) -> Result<()> {
        info!("Downloading tarball: {url}");
        let mut download = tempfile::Builder::new()
            .prefix("srcfetch-")
            .suffix(".tar.gz")
            .tempfile()?;
        self.transport.download(url, download.as_file_mut())?;
        download.as_file_mut().flush()?;

        std::fs::create_dir_all(target)?;
        info!("Extracting to: {}", target.display());
        unpack_tarball(download.path(), target).map_err(|e| Error::extract(url, e.to_string()))?;

        download.close()?;
        Ok(())
    }

    fn fetch_git(&self, url: &str, commit: &str, target: &Path) -> Result<()> {
        info!(
            "Cloning {url} at commit {commit} into {}",
            target.display()
        );
        self.git.clone_repo(url, target)?;
        self.git.checkout(target, commit)
    }
}
