//! Cache directory layout and entry lifecycle
//!
//! Every artifact URL maps to one directory under the cache root, mirroring
//! the URL's path segments. A download is unpacked into a sibling staging
//! directory (`<entry>-tmp`) and promoted with a single rename, so an entry
//! directory either does not exist or holds a fully unpacked artifact.
//! Each entry carries a `lastused` marker holding a unix-millisecond
//! timestamp that is rewritten on every access.

use crate::artifact::locator;
use crate::error::{CairnError, CairnResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;
use walkdir::WalkDir;

/// Marker file recording the last access time of an entry
pub const LASTUSED_FILE: &str = "lastused";

const STAGING_SUFFIX: &str = "-tmp";

/// One materialized cache entry, as reported by [`ArtifactCache::entries`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Path of the entry directory relative to the cache root
    pub rel_path: PathBuf,
    /// Last recorded access, if the marker is present and well formed
    pub last_used: Option<DateTime<Utc>>,
}

/// Artifact cache rooted at a single base directory
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute entry directory for an artifact URL
    pub fn entry_path(&self, url: &Url) -> CairnResult<PathBuf> {
        Ok(self.root.join(locator::entry_rel_path(url)?))
    }

    /// Staging directory used while unpacking an entry
    pub fn staging_path(entry: &Path) -> PathBuf {
        let mut os = entry.as_os_str().to_os_string();
        os.push(STAGING_SUFFIX);
        PathBuf::from(os)
    }

    /// Create a fresh staging directory for `entry`, discarding any
    /// leftovers from an interrupted run
    pub fn prepare_staging(&self, entry: &Path) -> CairnResult<PathBuf> {
        let staging = Self::staging_path(entry);
        if staging.exists() {
            debug!("Removing stale staging directory {}", staging.display());
            fs::remove_dir_all(&staging)
                .map_err(|e| CairnError::io(format!("clearing {}", staging.display()), e))?;
        }
        fs::create_dir_all(&staging)
            .map_err(|e| CairnError::io(format!("creating {}", staging.display()), e))?;
        Ok(staging)
    }

    /// Atomically activate a staged entry
    pub fn promote(&self, entry: &Path) -> CairnResult<()> {
        let staging = Self::staging_path(entry);
        fs::rename(&staging, entry)
            .map_err(|e| CairnError::io(format!("activating {}", entry.display()), e))
    }

    /// Remove an entry directory and everything under it
    pub fn evict(&self, entry: &Path) -> CairnResult<()> {
        if entry.exists() {
            debug!("Evicting {}", entry.display());
            fs::remove_dir_all(entry)
                .map_err(|e| CairnError::io(format!("evicting {}", entry.display()), e))?;
        }
        Ok(())
    }

    /// Rewrite the entry's access marker with the current time
    pub fn touch_last_used(&self, entry: &Path) -> CairnResult<()> {
        let stamp = Utc::now().timestamp_millis().to_string();
        fs::write(entry.join(LASTUSED_FILE), stamp)
            .map_err(|e| CairnError::io(format!("touching {}", entry.display()), e))
    }

    /// Read the entry's access marker, if present and parseable
    pub fn read_last_used(entry: &Path) -> Option<DateTime<Utc>> {
        let raw = fs::read_to_string(entry.join(LASTUSED_FILE)).ok()?;
        let millis: i64 = raw.trim().parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }

    /// List all materialized entries, sorted by relative path
    pub fn entries(&self) -> CairnResult<Vec<CacheEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for step in WalkDir::new(&self.root).min_depth(1) {
            let step = step.map_err(|e| {
                CairnError::io(
                    format!("scanning {}", self.root.display()),
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk aborted")),
                )
            })?;

            if !step.file_type().is_dir() {
                continue;
            }
            let path = step.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(STAGING_SUFFIX))
            {
                continue;
            }
            if !path.join(LASTUSED_FILE).is_file() {
                continue;
            }

            let rel_path = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_path_buf();
            found.push(CacheEntry {
                rel_path,
                last_used: Self::read_last_used(path),
            });
        }

        found.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(found)
    }
}
