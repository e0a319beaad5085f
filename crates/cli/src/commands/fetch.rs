//! `fetch-sources`: materialize every source in a manifest.

use srcfetch_fetch::{FetchConfig, FetchOutcome, FetchReport, Fetcher};
use std::io::Write;
use tracing::{info, instrument};

use crate::cli::{CliError, FetchSourcesArgs};

/// Fetch the manifest's sources and print a summary line.
///
/// Per-line failures are part of the report, not errors.
#[instrument(name = "fetch_sources", skip_all, fields(manifest = %args.manifest.display()))]
pub fn run(args: &FetchSourcesArgs, out: &mut dyn Write) -> Result<FetchReport, CliError> {
    let fetcher = Fetcher::with_defaults(FetchConfig {
        target_dir: args.target_dir.clone(),
    })?;
    let report = fetcher.fetch_manifest(&args.manifest)?;

    for failed in report
        .outcomes
        .iter()
        .filter(|l| matches!(l.outcome, FetchOutcome::Failed { .. }))
    {
        info!(line = failed.line, package = %failed.label, "Not fetched");
    }

    writeln!(out, "{report}").map_err(|e| CliError::output(e.to_string()))?;
    Ok(report)
}
