//! Package source records and the manifest line grammar.
//!
//! ```text
//! <name>@<version> -> <location>
//! ```
//!
//! where `<location>` is either a URL ending in `.tar.gz` or
//! `<https git url ending in .git> at commit <7-40 hex chars>`.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Separator between the `name@version` side and the location side.
pub const ARROW: &str = "->";

/// Literal joining a git URL and its commit.
const AT_COMMIT: &str = " at commit ";

#[allow(clippy::expect_used)]
static GIT_COMMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, checked by the tests below.
    Regex::new(r"^(https://\S+\.git)\s+at\s+commit\s+([0-9a-f]{7,40})$")
        .expect("git location pattern is valid")
});

/// Errors from classifying a location string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Looked like a git location but did not match `<url> at commit <hash>`.
    #[error("Could not parse git+commit from: {0}")]
    UnparseableGit(String),

    /// Neither a tarball nor a git location.
    #[error("Unrecognized source format: {0}")]
    Unrecognized(String),
}

/// Errors from parsing a manifest line into a [`SourceRecord`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The line has no `->` separator.
    #[error("missing '->' separator")]
    MissingArrow,

    /// The left side has no `@` between name and version.
    #[error("missing '@' between package name and version in '{0}'")]
    MissingAt(String),

    /// The package name before `@` is empty.
    #[error("empty package name in '{0}'")]
    EmptyName(String),

    /// The location side could not be classified.
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Where a package's source can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLocation {
    /// A gzip-compressed tarball.
    Tarball {
        /// Download URL, ending in `.tar.gz`.
        url: String,
    },
    /// A git repository pinned to a commit.
    Git {
        /// Clone URL, ending in `.git`.
        url: String,
        /// Commit hash to check out (7-40 hex chars).
        commit: String,
    },
}

impl SourceLocation {
    /// A tarball location.
    #[must_use]
    pub fn tarball(url: impl Into<String>) -> Self {
        Self::Tarball { url: url.into() }
    }

    /// A git location.
    #[must_use]
    pub fn git(url: impl Into<String>, commit: impl Into<String>) -> Self {
        Self::Git {
            url: url.into(),
            commit: commit.into(),
        }
    }

    /// The URL part of the location.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Tarball { url } | Self::Git { url, .. } => url,
        }
    }

    /// Classify the location side of a manifest line.
    ///
    /// A `.tar.gz` suffix wins; otherwise a `.git` suffix or the literal
    /// ` at commit ` marks a git location, which must then match the full
    /// `<https url>.git at commit <hash>` form.
    pub fn parse(text: &str) -> Result<Self, LocationError> {
        let text = text.trim();

        if text.ends_with(".tar.gz") {
            return Ok(Self::tarball(text));
        }

        if text.ends_with(".git") || text.contains(AT_COMMIT) {
            return GIT_COMMIT_RE
                .captures(text)
                .map(|caps| Self::git(&caps[1], &caps[2]))
                .ok_or_else(|| LocationError::UnparseableGit(text.to_string()));
        }

        Err(LocationError::Unrecognized(text.to_string()))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tarball { url } => f.write_str(url),
            Self::Git { url, commit } => write!(f, "{url}{AT_COMMIT}{commit}"),
        }
    }
}

/// One manifest entry: a package version and where to fetch its source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRecord {
    /// Package name; the key used for merging.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Source location.
    pub location: SourceLocation,
}

impl SourceRecord {
    /// Create a record.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            location,
        }
    }

    /// Name of the directory the source is materialized in: `<name>-<version>`.
    #[must_use]
    pub fn target_dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// The `name@version` label used in logs and manifest lines.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl fmt::Display for SourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} {ARROW} {}", self.name, self.version, self.location)
    }
}

impl FromStr for SourceRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (left, right) = line.trim().split_once(ARROW).ok_or(RecordError::MissingArrow)?;
        let left = left.trim();
        let (name, version) = left
            .split_once('@')
            .ok_or_else(|| RecordError::MissingAt(left.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(RecordError::EmptyName(left.to_string()));
        }
        let location = SourceLocation::parse(right)?;
        Ok(Self::new(name, version.trim(), location))
    }
}

/// A resolved dependency as written to the parsed-dependency list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Package name.
    pub name: String,
    /// Resolved version.
    pub version: String,
}

impl Dependency {
    /// Create a dependency.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
