//! Package source records and the plain-text manifests that carry them.
//!
//! A manifest holds one record per line:
//!
//! ```text
//! zlib@1.3.1 -> https://zlib.net/fossils/zlib-1.3.1.tar.gz
//! hdf5@1.14.3 -> https://github.com/HDFGroup/hdf5.git at commit 8c3a9f1
//! ```
//!
//! This crate owns that grammar, the `name version` dependency list written
//! next to it, the whitelist/allowlist files used to filter records, and the
//! name-keyed merge of two manifests.

mod error;
mod lists;
mod merge;
mod record;

pub use error::{Error, Result};
pub use lists::{parse_list, read_list, read_name_set};
pub use merge::{DEFAULT_MERGE_OUTPUT, merge_files, merge_manifests, package_key, read_keyed_lines};
pub use record::{Dependency, LocationError, RecordError, SourceLocation, SourceRecord};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write lines to `path`, one per line, replacing any existing file.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = File::create(path).map_err(|e| Error::write(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line.as_ref()).map_err(|e| Error::write(path, e))?;
    }
    writer.flush().map_err(|e| Error::write(path, e))
}

/// Write a parsed-dependency list (`name version` per line).
pub fn write_dependency_list(path: &Path, deps: &[Dependency]) -> Result<()> {
    write_lines(path, deps.iter().map(ToString::to_string))
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::read(path, e))
}
