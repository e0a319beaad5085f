//! Whitelist and allowlist files.
//!
//! Both are plain text with one entry per line. Entries are trimmed; blank
//! lines and lines starting with `#` are ignored.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::{Result, read_text};

/// Parse list entries from text.
#[must_use]
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Read list entries from a file, preserving order.
pub fn read_list(path: &Path) -> Result<Vec<String>> {
    let entries = parse_list(&read_text(path)?);
    debug!(?path, count = entries.len(), "Read list file");
    Ok(entries)
}

/// Read list entries from a file as a set of names.
pub fn read_name_set(path: &Path) -> Result<BTreeSet<String>> {
    Ok(read_list(path)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_list_skips_comments_and_blanks() {
        let text = "# tracked packages\nzlib\n\n  cmake  \n#hdf5\n   \nopenmpi\n";
        assert_eq!(parse_list(text), vec!["zlib", "cmake", "openmpi"]);
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_list("").is_empty());
        assert!(parse_list("# only a comment\n\n").is_empty());
    }

    #[test]
    fn test_read_name_set_dedups() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("whitelist.txt");
        std::fs::write(&path, "zlib\ncmake\nzlib\n").unwrap();

        let names = read_name_set(&path).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("zlib"));
        assert!(names.contains("cmake"));
    }

    #[test]
    fn test_read_list_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read_list(&temp.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, crate::Error::Read { .. }));
    }
}
