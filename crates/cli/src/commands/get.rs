//! `get-sources`: resolve a spec and write its source manifests.

use srcfetch_spack::{QueryConfig, QueryReport, SpackCli, run_query};
use std::io::Write;
use tracing::{info, instrument};

use crate::cli::{CliError, GetSourcesArgs};

/// Run the resolver query, echoing each accepted record to `out`.
#[instrument(name = "get_sources", skip_all, fields(spec = %args.spec))]
pub fn run(args: &GetSourcesArgs, out: &mut dyn Write) -> Result<QueryReport, CliError> {
    let config = QueryConfig::from_files(
        args.spec.as_str(),
        &args.whitelist,
        &args.url_filter,
        args.output_dir.as_path(),
    )?;
    let spack = SpackCli::new(args.spack.as_os_str());

    let report = run_query(&spack, &config, |record| {
        // A closed stdout must not stop the manifest from being written
        let _ = writeln!(out, "{record}");
    })?;

    if let Some(outputs) = &report.outputs {
        info!(
            parsed = %outputs.parsed.display(),
            download = %outputs.download.display(),
            "Wrote manifests"
        );
    }
    info!(
        dependencies = report.dependencies,
        selected = report.records.len(),
        reserved = report.reserved,
        not_whitelisted = report.not_whitelisted,
        unresolved = report.unresolved,
        disallowed = report.disallowed,
        ambiguous = report.ambiguities.len(),
        "Query complete"
    );
    Ok(report)
}
