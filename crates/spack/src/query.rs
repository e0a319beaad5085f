//! The resolver query pipeline: spec to dependencies to a filtered source manifest.

use srcfetch_manifest::{SourceRecord, read_list, read_name_set, write_dependency_list};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::parse::{Ambiguity, find_source_location, parse_spec_output};
use crate::{Resolver, Result};

/// Name prefix of language-binding packages, which are never fetched.
pub const RESERVED_PREFIX: &str = "py-";

/// Inputs of a query run.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Top-level spec handed to the resolver.
    pub spec: String,
    /// Package names eligible for fetching.
    pub whitelist: BTreeSet<String>,
    /// URL substrings; a location must contain at least one.
    pub allowlist: Vec<String>,
    /// Directory receiving both manifests.
    pub output_dir: PathBuf,
}

impl QueryConfig {
    /// Build a config by reading the whitelist and allowlist files.
    pub fn from_files(
        spec: impl Into<String>,
        whitelist: impl AsRef<Path>,
        allowlist: impl AsRef<Path>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let allowlist = read_list(allowlist.as_ref())?;
        let whitelist = read_name_set(whitelist.as_ref())?;
        Ok(Self {
            spec: spec.into(),
            whitelist,
            allowlist,
            output_dir: output_dir.into(),
        })
    }

    /// Paths of the manifests this config produces.
    #[must_use]
    pub fn outputs(&self) -> QueryOutputs {
        QueryOutputs::for_spec(&self.spec, &self.output_dir)
    }
}

/// Manifest paths written by a query run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutputs {
    /// Raw `name version` dependency list.
    pub parsed: PathBuf,
    /// Filtered `name@version -> location` manifest.
    pub download: PathBuf,
}

impl QueryOutputs {
    /// Manifest paths for `spec` inside `dir`.
    #[must_use]
    pub fn for_spec(spec: &str, dir: &Path) -> Self {
        let suffix = manifest_suffix(spec);
        Self {
            parsed: dir.join(format!("packages_parsed.{suffix}.txt")),
            download: dir.join(format!("packages_to_download.{suffix}.txt")),
        }
    }
}

/// File-name-safe form of a spec: `/`, `@` and `%` become `_`.
#[must_use]
pub fn manifest_suffix(spec: &str) -> String {
    spec.replace(['/', '@', '%'], "_")
}

/// Whether a dependency is eligible for a source lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Look up its source.
    Eligible,
    /// Name starts with [`RESERVED_PREFIX`].
    ReservedPrefix,
    /// Name is not in the whitelist.
    NotWhitelisted,
}

/// Decide whether `name` should be looked up.
#[must_use]
pub fn select(name: &str, whitelist: &BTreeSet<String>) -> Selection {
    if name.starts_with(RESERVED_PREFIX) {
        Selection::ReservedPrefix
    } else if !whitelist.contains(name) {
        Selection::NotWhitelisted
    } else {
        Selection::Eligible
    }
}

/// Whether `url` contains at least one allowlist pattern.
#[must_use]
pub fn url_allowed(url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| url.contains(pattern.as_str()))
}

/// What a query run produced.
#[derive(Debug, Clone, Default)]
pub struct QueryReport {
    /// Manifests written.
    pub outputs: Option<QueryOutputs>,
    /// Dependency references found (duplicates included).
    pub dependencies: usize,
    /// Flagged dependency references.
    pub ambiguities: Vec<Ambiguity>,
    /// Records written to the download manifest, in order.
    pub records: Vec<SourceRecord>,
    /// Dependencies skipped for the reserved prefix.
    pub reserved: usize,
    /// Dependencies skipped for missing from the whitelist.
    pub not_whitelisted: usize,
    /// Eligible dependencies with no usable source location.
    pub unresolved: usize,
    /// Sources dropped because no allowlist pattern matched.
    pub disallowed: usize,
}

/// Run the full query: resolve the spec, write the parsed list, look up
/// sources and write the download manifest.
///
/// `on_record` sees every record as it is written. Only resolving the top
/// spec and file IO are fatal; per-package lookup failures count as
/// unresolved.
pub fn run_query<R, F>(resolver: &R, config: &QueryConfig, mut on_record: F) -> Result<QueryReport>
where
    R: Resolver + ?Sized,
    F: FnMut(&SourceRecord),
{
    let outputs = config.outputs();
    let spec_output = resolver.spec(&config.spec)?;
    let parsed = parse_spec_output(&spec_output);
    for ambiguity in &parsed.ambiguities {
        warn!(%ambiguity, "Ambiguous dependency reference in resolver output");
    }
    info!(
        spec = %config.spec,
        count = parsed.dependencies.len(),
        "Parsed resolver output"
    );

    write_dependency_list(&outputs.parsed, &parsed.dependencies)?;

    let download = &outputs.download;
    let file = File::create(download).map_err(|e| srcfetch_manifest::Error::write(download, e))?;
    let mut writer = BufWriter::new(file);

    let mut report = QueryReport {
        dependencies: parsed.dependencies.len(),
        ..QueryReport::default()
    };

    for dep in &parsed.dependencies {
        match select(&dep.name, &config.whitelist) {
            Selection::ReservedPrefix => {
                report.reserved += 1;
                continue;
            }
            Selection::NotWhitelisted => {
                report.not_whitelisted += 1;
                continue;
            }
            Selection::Eligible => {}
        }

        let package = format!("{}@{}", dep.name, dep.version);
        let info = match resolver.info(&package) {
            Ok(info) => info,
            Err(e) => {
                debug!(%package, error = %e, "Source lookup failed");
                report.unresolved += 1;
                continue;
            }
        };
        let location = match find_source_location(&info, &dep.version) {
            Ok(location) => location,
            Err(e) => {
                debug!(%package, reason = %e, "No source location");
                report.unresolved += 1;
                continue;
            }
        };

        if !url_allowed(location.url(), &config.allowlist) {
            debug!(%package, url = location.url(), "Source URL not in allowlist");
            report.disallowed += 1;
            continue;
        }

        let record = SourceRecord::new(dep.name.as_str(), dep.version.as_str(), location);
        writeln!(writer, "{record}").map_err(|e| srcfetch_manifest::Error::write(download, e))?;
        on_record(&record);
        report.records.push(record);
    }

    writer
        .flush()
        .map_err(|e| srcfetch_manifest::Error::write(download, e))?;
    report.outputs = Some(outputs);
    Ok(report)
}
