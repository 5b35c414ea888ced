//! Archive expansion
//!
//! Artifacts are distributed as zip archives. Expansion always targets a
//! staging directory owned by the caller; promotion into the cache happens
//! separately so a failed unpack never leaves a half-populated entry.

use crate::error::{CairnError, CairnResult};
use std::fs;
use std::path::Path;

/// Unpack a zip archive into a destination directory, overwriting existing
/// files.
pub fn unpack_zip(archive: &Path, dest: &Path) -> CairnResult<()> {
    let file = fs::File::open(archive)
        .map_err(|e| CairnError::io(format!("opening archive {}", archive.display()), e))?;

    let mut zip = zip::ZipArchive::new(file).map_err(|e| CairnError::Unpack {
        dest: dest.to_path_buf(),
        source: e,
    })?;

    zip.extract(dest).map_err(|e| CairnError::Unpack {
        dest: dest.to_path_buf(),
        source: e,
    })
}
