//! `merge-sources`: combine two download manifests.

use srcfetch_manifest::merge_files;
use std::io::Write;
use tracing::instrument;

use crate::cli::{CliError, MergeSourcesArgs};

/// Merge the manifests and report where the result went.
#[instrument(name = "merge_sources", skip_all)]
pub fn run(args: &MergeSourcesArgs, out: &mut dyn Write) -> Result<usize, CliError> {
    let count = merge_files(&args.first, &args.second, &args.output)?;
    writeln!(out, "Merged output written to: {}", args.output.display())
        .map_err(|e| CliError::output(e.to_string()))?;
    Ok(count)
}
