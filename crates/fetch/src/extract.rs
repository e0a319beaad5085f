//! Tarball extraction.

use flate2::read::GzDecoder;
use std::fs::File;
use std::path::Path;
use tar::Archive;
use tracing::debug;

use crate::Result;

/// Unpack every entry of the gzip-compressed tarball at `archive` into `dest`.
///
/// `dest` must already exist.
pub fn unpack_tarball(archive: &Path, dest: &Path) -> Result<()> {
    debug!(?archive, ?dest, "Unpacking tarball");
    let file = File::open(archive)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.unpack(dest)?;
    Ok(())
}
