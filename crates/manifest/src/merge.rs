//! Name-keyed merge of two download manifests.
//!
//! Lines are kept verbatim (after trimming). Only lines with a `->` whose
//! left side contains `@` take part; everything else is skipped silently.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::record::ARROW;
use crate::{Result, read_text, write_lines};

/// Output file written by the merge tool unless overridden.
pub const DEFAULT_MERGE_OUTPUT: &str = "merge_to_download.txt";

/// Extract the package name keying a manifest line.
///
/// Returns `None` for lines without `->`, without `@` before it, or with an
/// empty name.
#[must_use]
pub fn package_key(line: &str) -> Option<&str> {
    let (left, _) = line.split_once(ARROW)?;
    let (name, _) = left.split_once('@')?;
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Collect a manifest's lines keyed by package name.
///
/// A later line for the same name replaces an earlier one.
#[must_use]
pub fn read_keyed_lines(text: &str) -> BTreeMap<String, String> {
    let mut lines = BTreeMap::new();
    for line in text.lines().map(str::trim) {
        if let Some(name) = package_key(line) {
            lines.insert(name.to_string(), line.to_string());
        }
    }
    lines
}

/// Merge two manifests; `primary` wins when both name the same package.
///
/// Returns the merged lines sorted by full line text.
#[must_use]
pub fn merge_manifests(primary: &str, secondary: &str) -> Vec<String> {
    let mut merged = read_keyed_lines(secondary);
    merged.extend(read_keyed_lines(primary));

    let mut lines: Vec<String> = merged.into_values().collect();
    lines.sort();
    lines
}

/// Merge the manifests at `primary` and `secondary` into `output`.
///
/// Returns the number of lines written.
pub fn merge_files(primary: &Path, secondary: &Path, output: &Path) -> Result<usize> {
    let first = read_text(primary)?;
    let second = read_text(secondary)?;
    debug!(?primary, ?secondary, "Merging manifests");

    let lines = merge_manifests(&first, &second);
    write_lines(output, &lines)?;
    info!(?output, count = lines.len(), "Wrote merged manifest");
    Ok(lines.len())
}
