//! Parsers for Spack's free-form text output.
//!
//! Both parsers are heuristics over human-oriented output and are tested
//! against captured samples below.

use regex::Regex;
use srcfetch_manifest::{Dependency, SourceLocation};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

#[allow(clippy::expect_used)]
static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\^([^\s@]+)@([^\s%]+)").expect("dependency pattern is valid")
});

#[allow(clippy::expect_used)]
static TARBALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://\S+\.tar\.gz)").expect("tarball pattern is valid"));

#[allow(clippy::expect_used)]
static GIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[git\]\s+(https?://\S+\.git)").expect("git pattern is valid")
});

#[allow(clippy::expect_used)]
static COMMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9a-f]{7,40})\b").expect("commit pattern is valid"));

/// Header that opens the block of versions `spack info` considers safe.
const SAFE_VERSIONS_HEADER: &str = "Safe versions:";

/// Why a dependency reference was flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    /// The line holds more than one `^name@version` reference; only the
    /// first was kept.
    MultipleReferences {
        /// 1-based line number in the resolver output.
        line: usize,
        /// How many references the line holds.
        count: usize,
    },
    /// The name holds characters Spack does not use in package names.
    UnusualName {
        /// 1-based line number in the resolver output.
        line: usize,
        /// The matched name.
        name: String,
    },
    /// The version runs into variant markers (`+`, `~`), so it likely
    /// captured more than the version.
    VariantsInVersion {
        /// 1-based line number in the resolver output.
        line: usize,
        /// The matched version.
        version: String,
    },
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleReferences { line, count } => {
                write!(f, "line {line}: {count} dependency references, kept the first")
            }
            Self::UnusualName { line, name } => {
                write!(f, "line {line}: unusual package name '{name}'")
            }
            Self::VariantsInVersion { line, version } => {
                write!(f, "line {line}: version '{version}' includes variant markers")
            }
        }
    }
}

/// Dependencies found in `spack spec` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSpec {
    /// One entry per matching line, in output order, duplicates kept.
    pub dependencies: Vec<Dependency>,
    /// Matches that may not be what they seem.
    pub ambiguities: Vec<Ambiguity>,
}

/// Extract `(name, version)` pairs from `spack spec` output.
///
/// Each line contributes at most one pair: the first `^name@version`
/// reference, where the version stops at whitespace or `%`.
#[must_use]
pub fn parse_spec_output(output: &str) -> ParsedSpec {
    let mut parsed = ParsedSpec::default();

    for (index, line) in output.lines().enumerate() {
        let line_number = index + 1;
        let mut refs = DEPENDENCY_RE.captures_iter(line);
        let Some(caps) = refs.next() else {
            continue;
        };
        let name = &caps[1];
        let version = &caps[2];

        let extra = refs.count();
        if extra > 0 {
            parsed.ambiguities.push(Ambiguity::MultipleReferences {
                line: line_number,
                count: extra + 1,
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'))
        {
            parsed.ambiguities.push(Ambiguity::UnusualName {
                line: line_number,
                name: name.to_string(),
            });
        }
        if version.contains(['+', '~']) {
            parsed.ambiguities.push(Ambiguity::VariantsInVersion {
                line: line_number,
                version: version.to_string(),
            });
        }

        parsed.dependencies.push(Dependency::new(name, version));
    }

    parsed
}

/// Why no source location was found in `spack info` output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The output has no "Safe versions:" block.
    #[error("no safe versions listed")]
    NoSafeVersions,
    /// The requested version is not in the safe versions block.
    #[error("version {0} is not a safe version")]
    VersionNotListed(String),
    /// The version row carries neither a tarball URL nor a git URL with commit.
    #[error("no tarball or pinned git source for version {0}")]
    NoSourceUrl(String),
}

/// Find the source location of `version` in `spack info` output.
///
/// Scans the "Safe versions:" block, which ends at the first blank line,
/// for a row starting with the version. A row yields either a tarball URL or
/// a `[git]` URL together with the commit hash following it.
pub fn find_source_location(info: &str, version: &str) -> Result<SourceLocation, LookupError> {
    let mut in_safe = false;
    let mut version_listed = false;

    for line in info.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(SAFE_VERSIONS_HEADER) {
            in_safe = true;
            continue;
        }
        if !in_safe {
            continue;
        }
        if trimmed.is_empty() {
            break;
        }
        if !row_has_version(trimmed, version) {
            continue;
        }
        version_listed = true;

        if let Some(caps) = TARBALL_RE.captures(line) {
            return Ok(SourceLocation::tarball(&caps[1]));
        }
        if let Some(git) = GIT_RE.captures(line) {
            let url = &git[1];
            let after_url = git.get(0).map_or(line.len(), |m| m.end());
            if let Some(commit) = COMMIT_RE.captures(&line[after_url..]) {
                return Ok(SourceLocation::git(url, &commit[1]));
            }
        }
    }

    if !in_safe {
        Err(LookupError::NoSafeVersions)
    } else if version_listed {
        Err(LookupError::NoSourceUrl(version.to_string()))
    } else {
        Err(LookupError::VersionNotListed(version.to_string()))
    }
}

/// Whether a trimmed safe-versions row starts with `version` followed by whitespace.
fn row_has_version(row: &str, version: &str) -> bool {
    row.strip_prefix(version)
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}
